//! Lookup filter
//!
//! Turns the loosely-typed lookup form into a typed filter. Nothing in here
//! fails: malformed input degrades to "unfiltered" for that field.

use crate::format::{display_date, parse_date};
use chrono::NaiveDate;
use tracing::warn;

/// Value of the `dates` field that disables date filtering
pub const ALL_DATES: &str = "all";

/// Time appended to the upper date bound to make it end-of-day inclusive
pub const END_OF_DAY: &str = "T23:59:59";

/// Raw lookup form fields, exactly as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawLookupParams {
    /// Number substring to look for in either party
    pub tel: Option<String>,

    /// `"all"` for every date, anything else for a date range
    pub dates: Option<String>,

    /// Lower date bound, `YYYY-MM-DD`
    pub fromdate: Option<String>,

    /// Upper date bound, `YYYY-MM-DD`
    pub todate: Option<String>,

    /// Zero-based row offset of the page
    pub offset: Option<String>,
}

impl RawLookupParams {
    /// Pick the lookup fields out of decoded `(name, value)` pairs
    ///
    /// The first occurrence of a field wins; unknown fields are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        };

        Self {
            tel: first("tel"),
            dates: first("dates"),
            fromdate: first("fromdate"),
            todate: first("todate"),
            offset: first("offset"),
        }
    }
}

/// Normalized lookup filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdrFilter {
    number: Option<String>,
    date_range: bool,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    offset: i64,
    page_size: i64,
    raw: RawLookupParams,
}

impl CdrFilter {
    /// Normalize raw form input
    ///
    /// `page_size` is the process-wide page size and must be positive.
    pub fn from_params(raw: RawLookupParams, page_size: i64) -> Self {
        let number = raw
            .tel
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let date_range = raw.dates.as_deref() != Some(ALL_DATES);

        let (from_date, to_date) = if date_range {
            (
                parse_bound("fromdate", raw.fromdate.as_deref()),
                parse_bound("todate", raw.todate.as_deref()),
            )
        } else {
            (None, None)
        };

        let offset = raw
            .offset
            .as_deref()
            .and_then(|o| o.trim().parse::<i64>().ok())
            .filter(|o| *o >= 0)
            .unwrap_or(0);

        Self {
            number,
            date_range,
            from_date,
            to_date,
            offset,
            page_size,
            raw,
        }
    }

    /// Number substring, `None` when every number matches
    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// Whether date bounds apply at all
    pub fn date_range_enabled(&self) -> bool {
        self.date_range
    }

    /// Lower date bound, only when the date range is enabled
    pub fn from_date(&self) -> Option<NaiveDate> {
        self.from_date
    }

    /// Upper date bound, only when the date range is enabled
    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_date
    }

    /// Inclusive lower bound compared against the connection timestamp
    pub fn from_bound(&self) -> Option<String> {
        self.from_date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Inclusive end-of-day upper bound compared against the connection timestamp
    pub fn to_bound(&self) -> Option<String> {
        self.to_date
            .map(|d| format!("{}{}", d.format("%Y-%m-%d"), END_OF_DAY))
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// The form fields as submitted, for round-tripping into page links
    pub fn raw(&self) -> &RawLookupParams {
        &self.raw
    }

    /// Human description of the active date range
    ///
    /// `None` when no date bound applies.
    pub fn describe_dates(&self) -> Option<String> {
        match (self.from_date, self.to_date) {
            (None, None) => None,
            (None, Some(to)) => Some(format!("upto {}", display_date(to))),
            (Some(from), None) => Some(format!("{} onwards", display_date(from))),
            (Some(from), Some(to)) if from == to => Some(display_date(from)),
            (Some(from), Some(to)) => Some(format!(
                "{} - {}",
                display_date(from),
                display_date(to)
            )),
        }
    }
}

fn parse_bound(field: &str, raw: Option<&str>) -> Option<NaiveDate> {
    let value = raw.map(str::trim).filter(|v| !v.is_empty())?;
    let parsed = parse_date(value);
    if parsed.is_none() {
        warn!("Ignoring unparseable {} {:?}", field, value);
    }
    parsed
}
