//! Display formatting for stored CDR values
//!
//! Stored values are text. Durations are strict (a malformed one is an
//! error for the caller to handle); dates are lenient and fall back to the
//! zero date so a single bad row never breaks a results page.

use crate::error::FormatError;
use chrono::{NaiveDate, NaiveDateTime};

/// Display of an unparseable date
pub const ZERO_DATE: &str = "1 Jan 0001";

/// Display of an unparseable timestamp
pub const ZERO_DATETIME: &str = "1 Jan 0001 12:00am Mon";

const DATE_LAYOUT: &str = "%Y-%m-%d";
const DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";

const DISPLAY_DATE: &str = "%-d %b %Y";
const DISPLAY_DATETIME: &str = "%-d %b %Y %-I:%M%P %a";

/// Render `n` with `,` between every group of three digits
///
/// ```
/// use oldvrs_core::format::format_thousands;
/// assert_eq!(format_thousands(1234567), "1,234,567");
/// ```
pub fn format_thousands(n: i64) -> String {
    group_digits(&n.to_string())
}

/// Insert thousands separators into every run of digits in `text`
///
/// Runs of three digits or fewer are left alone, so the function is
/// idempotent: `group_digits(&group_digits(s)) == group_digits(s)`.
pub fn group_digits(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 3);
    let mut run = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() {
            run.push(c);
        } else {
            push_grouped(&mut out, &run);
            run.clear();
            out.push(c);
        }
    }
    push_grouped(&mut out, &run);

    out
}

fn push_grouped(out: &mut String, digits: &str) {
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
}

/// Render an `H:M:S` duration as `"1h 2m 3s "`
///
/// Minutes are always shown once hours are; zero seconds are omitted, so
/// `"0:0:0"` renders as an empty string.
pub fn format_duration(raw: &str) -> Result<String, FormatError> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [h, m, s] = parts[..] else {
        return Err(FormatError::Duration(raw.to_string()));
    };

    let parse = |part: &str| {
        part.parse::<u64>()
            .map_err(|_| FormatError::Duration(raw.to_string()))
    };
    let (h, m, s) = (parse(h)?, parse(m)?, parse(s)?);

    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{}h {}m ", h, m));
    } else if m > 0 {
        out.push_str(&format!("{}m ", m));
    }
    if s > 0 {
        out.push_str(&format!("{}s ", s));
    }

    Ok(out)
}

/// Render `YYYY-MM-DD` as `"2 Jan 2021"`
pub fn format_date(raw: &str) -> String {
    parse_date(raw).map_or_else(|| ZERO_DATE.to_string(), display_date)
}

/// Render a parsed date as `"2 Jan 2021"`
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE).to_string()
}

/// Render `YYYY-MM-DDTHH:MM:SSZ` as `"2 Jan 2021 3:04pm Sat"`
pub fn format_datetime(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, DATETIME_LAYOUT)
        .map(|dt| dt.format(DISPLAY_DATETIME).to_string())
        .unwrap_or_else(|_| ZERO_DATETIME.to_string())
}

/// Parse a `YYYY-MM-DD` filter date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_LAYOUT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(-98765), "-98,765");
    }

    #[test]
    fn test_group_digits_is_idempotent() {
        for n in [0_i64, 12, 1234, 100000, 1234567890] {
            let once = format_thousands(n);
            assert_eq!(group_digits(&once), once);
        }
        assert_eq!(group_digits("37 found"), "37 found");
        assert_eq!(group_digits("12345 found"), "12,345 found");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration("0:0:0").unwrap(), "");
        assert_eq!(format_duration("1:2:3").unwrap(), "1h 2m 3s ");
        assert_eq!(format_duration("0:5:0").unwrap(), "5m ");
        assert_eq!(format_duration("2:0:0").unwrap(), "2h 0m ");
        assert_eq!(format_duration("0:0:42").unwrap(), "42s ");
        assert_eq!(format_duration("00:01:07").unwrap(), "1m 7s ");
    }

    #[test]
    fn test_format_duration_rejects_malformed() {
        for raw in ["", "1:2", "1:2:3:4", "a:b:c", "-1:0:0", "1::3"] {
            assert_eq!(
                format_duration(raw),
                Err(FormatError::Duration(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2021-01-02"), "2 Jan 2021");
        assert_eq!(format_date("2021-03-05"), "5 Mar 2021");
        assert_eq!(format_date("not a date"), ZERO_DATE);
        assert_eq!(format_date(""), ZERO_DATE);
    }

    #[test]
    fn test_range_dates_share_the_display_layout() {
        let date = parse_date("2021-03-05").unwrap();
        assert_eq!(display_date(date), "5 Mar 2021");
        assert_eq!(display_date(date), format_date("2021-03-05"));
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime("2021-01-02T15:04:05Z"),
            "2 Jan 2021 3:04pm Sat"
        );
        assert_eq!(
            format_datetime("2021-01-04T00:30:00Z"),
            "4 Jan 2021 12:30am Mon"
        );
        assert_eq!(format_datetime("2021-01-02 15:04:05"), ZERO_DATETIME);
    }
}
