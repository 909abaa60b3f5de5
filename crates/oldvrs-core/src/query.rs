//! Lookup query construction
//!
//! Builds the count and page statements for a [`CdrFilter`]. Every filter
//! value travels as a bound parameter; the only text spliced into the SQL is
//! the table and column names, which [`AppConfig::validate`] restricts to
//! plain identifiers.
//!
//! [`AppConfig::validate`]: crate::config::AppConfig::validate

use crate::config::{CdrColumns, LookupConfig};
use crate::filter::CdrFilter;

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    Integer(i64),
}

/// Statements and parameters for one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdrQuery {
    /// The `WHERE` predicate, without the keyword
    pub predicate: String,

    /// Parameters for the placeholders in `predicate`, in order
    pub predicate_params: Vec<BindValue>,

    /// `SELECT COUNT(1) ...` over the predicate
    pub count_sql: String,

    /// Page select over the predicate, ending in `LIMIT ?, ?`
    pub page_sql: String,

    /// Row offset of the page
    pub offset: i64,

    /// Rows per page
    pub limit: i64,
}

impl CdrQuery {
    /// Parameters for `count_sql`
    pub fn count_params(&self) -> &[BindValue] {
        &self.predicate_params
    }

    /// Parameters for `page_sql`: the predicate values, then offset and limit
    pub fn page_params(&self) -> Vec<BindValue> {
        let mut params = self.predicate_params.clone();
        params.push(BindValue::Integer(self.offset));
        params.push(BindValue::Integer(self.limit));
        params
    }
}

/// Builds [`CdrQuery`] values against a configured table layout
#[derive(Debug, Clone)]
pub struct CdrQueryBuilder {
    table: String,
    columns: CdrColumns,
}

impl CdrQueryBuilder {
    pub fn new(table: impl Into<String>, columns: CdrColumns) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new(config.table.clone(), config.columns.clone())
    }

    /// Build the count and page statements for `filter`
    pub fn build(&self, filter: &CdrFilter) -> CdrQuery {
        let cols = &self.columns;
        let mut terms = Vec::new();
        let mut params = Vec::new();

        if let Some(number) = filter.number() {
            terms.push(format!(
                r"({caller} LIKE ? ESCAPE '\' OR {callee} LIKE ? ESCAPE '\')",
                caller = cols.caller,
                callee = cols.callee,
            ));
            let pattern = format!("%{}%", escape_like(number));
            params.push(BindValue::Text(pattern.clone()));
            params.push(BindValue::Text(pattern));
        }

        if filter.date_range_enabled() {
            if let Some(from) = filter.from_bound() {
                terms.push(format!("{} >= ?", cols.connected));
                params.push(BindValue::Text(from));
            }
            if let Some(to) = filter.to_bound() {
                terms.push(format!("{} <= ?", cols.connected));
                params.push(BindValue::Text(to));
            }
        }

        let predicate = if terms.is_empty() {
            "1=1".to_string()
        } else {
            terms.join(" AND ")
        };

        let count_sql = format!(
            "SELECT COUNT(1) FROM {} WHERE {}",
            self.table, predicate
        );

        let page_sql = format!(
            "SELECT {} FROM {} WHERE {} LIMIT ?, ?",
            self.select_list(),
            self.table,
            predicate
        );

        CdrQuery {
            predicate,
            predicate_params: params,
            count_sql,
            page_sql,
            offset: filter.offset(),
            limit: filter.page_size(),
        }
    }

    /// `SELECT COUNT(1)` over the whole table
    pub fn total_sql(&self) -> String {
        format!("SELECT COUNT(1) FROM {}", self.table)
    }

    fn select_list(&self) -> String {
        let cols = &self.columns;
        format!(
            "IFNULL(CAST({} AS TEXT), '') AS id, \
             IFNULL(CAST({} AS TEXT), '') AS direction, \
             IFNULL(CAST({} AS TEXT), '') AS duration, \
             IFNULL(CAST({} AS TEXT), '') AS connected, \
             IFNULL(CAST({} AS TEXT), '') AS caller_number, \
             IFNULL(CAST({} AS TEXT), '') AS callee_number, \
             IFNULL({}, 0) AS folder_id",
            cols.id,
            cols.direction,
            cols.duration,
            cols.connected,
            cols.caller,
            cols.callee,
            cols.folder
        )
    }
}

/// Escape `LIKE` wildcards so `needle` matches literally under `ESCAPE '\'`
pub fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Offsets for the previous/next page controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLinks {
    /// Offset of the previous page, when not on the first page
    pub previous: Option<i64>,

    /// Offset of the next page, when more rows follow this one
    pub next: Option<i64>,
}

impl PageLinks {
    pub fn compute(offset: i64, page_size: i64, total: i64) -> Self {
        let previous = (offset > 0).then(|| (offset - page_size).max(0));
        let next = (total - offset > page_size).then(|| offset + page_size);
        Self { previous, next }
    }
}
