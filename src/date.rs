use chrono::NaiveDate;

use crate::error::{Error, FormatLocation, Result};

/// Month number for an English month abbreviation as printed on abstract pages.
fn month_number(abbrev: &str) -> Option<u32> {
    Some(match abbrev {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        // arXiv prints "Sep"; older pages used "Sept".
        "Sep" | "Sept" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    })
}

/// Parse a submission date such as `"21 Jul 2020"`.
///
/// Returns `Ok(None)` when the text is not made of exactly three whitespace-separated
/// tokens. An unknown month is [`Error::UnknownMonth`]; a non-numeric day or year, or a
/// day outside the month, is a `SubmitDate` format error.
pub fn parse_submit_date(text: &str) -> Result<Option<NaiveDate>> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [day, month, year] = tokens.as_slice() else {
        return Ok(None);
    };

    let month = month_number(month).ok_or_else(|| Error::UnknownMonth(month.to_string()))?;
    let day: u32 = day
        .parse()
        .map_err(|_| Error::Format(FormatLocation::SubmitDate))?;
    let year: i32 = year
        .parse()
        .map_err(|_| Error::Format(FormatLocation::SubmitDate))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or(Error::Format(FormatLocation::SubmitDate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    #[test]
    fn parses_three_token_date() {
        let d = parse_submit_date("21 Jul 2020").unwrap().unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2020, 7, 21));
    }

    #[test]
    fn sept_and_sep_both_map_to_september() {
        let a = parse_submit_date("3 Sept 2019").unwrap().unwrap();
        let b = parse_submit_date("3 Sep 2019").unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.month(), 9);
    }

    #[test]
    fn wrong_token_count_is_absent() {
        assert_eq!(parse_submit_date("").unwrap(), None);
        assert_eq!(parse_submit_date("Jul 2020").unwrap(), None);
        assert_eq!(parse_submit_date("21 Jul 2020 (v1)").unwrap(), None);
        assert_eq!(parse_submit_date("Tue, 21 Jul 2020 17:59:59").unwrap(), None);
    }

    #[test]
    fn unknown_month_is_an_error() {
        match parse_submit_date("21 July 2020") {
            Err(Error::UnknownMonth(m)) => assert_eq!(m, "July"),
            other => panic!("expected UnknownMonth, got {other:?}"),
        }
        assert!(parse_submit_date("21 jul 2020").is_err());
    }

    #[test]
    fn bad_numbers_are_format_errors() {
        for text in ["xx Jul 2020", "21 Jul twenty", "31 Feb 2020", "0 Jan 2020"] {
            let err = parse_submit_date(text).unwrap_err();
            assert_eq!(err.location(), Some(FormatLocation::SubmitDate), "{text}");
        }
    }

    #[test]
    fn any_valid_calendar_date_round_trips() {
        proptest::proptest!(|(year in 1991i32..2100, month in 1u32..=12, day in 1u32..=28)| {
            let text = format!("{} {} {}", day, MONTHS[(month - 1) as usize], year);
            let parsed = parse_submit_date(&text).unwrap().unwrap();
            proptest::prop_assert_eq!(parsed, NaiveDate::from_ymd_opt(year, month, day).unwrap());
        })
    }
}
