use std::fmt;

use thiserror::Error;

/// Which record check rejected an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatLocation {
    Idx,
    Abstract,
    Subjects,
    SubmitDate,
}

impl FormatLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatLocation::Idx => "idx",
            FormatLocation::Abstract => "Abstract",
            FormatLocation::Subjects => "Subjects",
            FormatLocation::SubmitDate => "SubmitDate",
        }
    }
}

impl fmt::Display for FormatLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The requested subject code is not part of the registry.
    #[error("Subject Not Found Error! '{0}' is not a known subject, see https://arxiv.org/ for more information")]
    SubjectNotFound(String),

    /// A page could not be fetched.
    #[error("page unavailable: {url}: {reason}")]
    PageUnavailable { url: String, reason: String },

    /// A page was fetched but is not in the expected shape.
    #[error("Illegal HTML Page Error, page may not be in the expected format: {0}")]
    IllegalPage(String),

    #[error("Article {0} Format Error!")]
    Format(FormatLocation),

    #[error("Article SubmitDate Format Error! unknown month abbreviation '{0}'")]
    UnknownMonth(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build BibLaTeX entry: {0}")]
    Biblatex(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for every failure raised while validating a record.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::Format(_) | Error::UnknownMonth(_))
    }

    /// The failing check, if this is a record format error.
    pub fn location(&self) -> Option<FormatLocation> {
        match self {
            Error::Format(loc) => Some(*loc),
            Error::UnknownMonth(_) => Some(FormatLocation::SubmitDate),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_names_location() {
        let err = Error::Format(FormatLocation::Idx);
        assert_eq!(err.to_string(), "Article idx Format Error!");
        let err = Error::Format(FormatLocation::SubmitDate);
        assert_eq!(err.to_string(), "Article SubmitDate Format Error!");
    }

    #[test]
    fn unknown_month_counts_as_format_error() {
        let err = Error::UnknownMonth("Foo".to_string());
        assert!(err.is_format_error());
        assert_eq!(err.location(), Some(FormatLocation::SubmitDate));
        assert!(err.to_string().contains("Foo"));
    }

    #[test]
    fn subject_not_found_is_not_a_format_error() {
        let err = Error::SubjectNotFound("cs.ZZ".to_string());
        assert!(!err.is_format_error());
        assert!(err.location().is_none());
        assert!(err.to_string().contains("cs.ZZ"));
    }
}
