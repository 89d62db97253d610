use std::{fs, path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// arXiv host to crawl, e.g. a mirror
    #[arg(long, value_name = "URL", global = true, default_value = arxiv_crawler::config::ARXIV_BASE_URL)]
    pub base_url: url::Url,

    /// Overall per-request timeout in seconds
    #[arg(long, value_name = "SECS", global = true, default_value_t = arxiv_crawler::config::GLOBAL_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl the past-week listing of a subject and print every valid record
    List {
        /// Subject code, e.g. cs.CL
        #[arg(value_name = "SUBJECT")]
        subject: String,
        /// Only crawl the first N listed papers
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fetch the records of one or more papers
    Fetch {
        #[arg(value_name = "SRC", required = true)]
        from: Vec<Source>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the known subject codes
    Subjects,
}

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Record serialization
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
    /// Write records to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Biblatex,
}

#[derive(Clone, Debug)]
/// Where a record comes from, which can either be
///
/// - an arXiv identifier (bare, `arXiv:`-prefixed or an abs/pdf URL), or
/// - a saved abstract page on disk.
pub enum Source {
    Identifier(String),
    File(PathBuf),
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // An existing path wins; anything else is treated as an identifier and checked later.
        if let Ok(path) = fs::canonicalize(s) {
            Ok(Source::File(path))
        } else {
            Ok(Source::Identifier(s.to_string()))
        }
    }
}
