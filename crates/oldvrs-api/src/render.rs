//! HTML rendering for the lookup and config pages
//!
//! Pages are fragments appended after the operator's head and lookup
//! templates. Every interpolated value is escaped.

use oldvrs_core::{
    filter::{CdrFilter, RawLookupParams},
    format::{format_datetime, format_duration, format_thousands},
    models::{AppSettings, Cdr, Folder, RecordingPaths},
    query::PageLinks,
};
use tracing::warn;

/// Heading shown when the dataset has no display name yet
pub const UNNAMED_DATASET: &str = "*unknown*";

/// One results row, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdrView {
    pub duration: String,
    pub connected: String,
    pub direction: String,
    pub caller: String,
    pub callee: String,
    pub recording_url: String,
}

impl CdrView {
    pub fn new(cdr: &Cdr, paths: &RecordingPaths) -> Self {
        // one corrupt row shouldn't take the page down
        let duration = format_duration(&cdr.duration).unwrap_or_else(|e| {
            warn!("CDR {}: {}", cdr.id, e);
            cdr.duration.clone()
        });

        Self {
            duration,
            connected: format_datetime(&cdr.connected),
            direction: cdr.direction.clone(),
            caller: cdr.caller_number.clone(),
            callee: cdr.callee_number.clone(),
            recording_url: paths.recording_url(cdr.folder_id, &cdr.id),
        }
    }
}

/// A rendered page of lookup results
#[derive(Debug, Clone)]
pub struct LookupPage {
    /// Searched number, or "all calls"
    pub searched: String,

    /// Active date range description
    pub dates: Option<String>,

    /// Rows matching the filter across all pages
    pub total: i64,

    /// Rows on this page
    pub rows: Vec<CdrView>,

    pub links: PageLinks,

    raw: RawLookupParams,
}

impl LookupPage {
    pub fn new(filter: &CdrFilter, total: i64, rows: &[Cdr], paths: &RecordingPaths) -> Self {
        Self {
            searched: filter.number().unwrap_or("all calls").to_string(),
            dates: filter.describe_dates(),
            total,
            rows: rows.iter().map(|cdr| CdrView::new(cdr, paths)).collect(),
            links: PageLinks::compute(filter.offset(), filter.page_size(), total),
            raw: filter.raw().clone(),
        }
    }

    /// Text of the results header line
    pub fn summary(&self) -> String {
        let mut line = format!("Showing {}", self.searched);
        if let Some(dates) = &self.dates {
            line.push_str("; Call date ");
            line.push_str(dates);
        }
        line.push_str(&format!("; {} found", format_thousands(self.total)));
        line
    }

    /// Render the header line, results table and page controls
    ///
    /// `sql` is echoed as an HTML comment when given.
    pub fn to_html(&self, sql: Option<&str>) -> String {
        let mut html = format!("<p>{}</p>", escape_html(&self.summary()));

        if let Some(sql) = sql {
            html.push_str(&format!("\n<!-- {} -->\n", sql.replace("--", "- -")));
        }

        html.push_str("<table id=\"results\"><thead><tr>");
        html.push_str("<th class=\"duration\">Duration</th>");
        html.push_str("<th class=\"connected\">Connected</th>");
        html.push_str("<th class=\"direction\">I/O</th>");
        html.push_str("<th class=\"aphone\">From</th>");
        html.push_str("<th class=\"bphone\">To</th>");
        html.push_str("<th class=\"audio\"></th></tr></thead><tbody>");

        for row in &self.rows {
            html.push_str(&format!(
                "<tr><td class=\"duration\">{}</td><td class=\"connected\">{}</td>\
                 <td class=\"direction\">{}</td><td class=\"aphone\">{}</td>\
                 <td class=\"bphone\">{}</td><td class=\"audio\"><audio controls>\
                 <source src=\"{}\" type=\"audio/mpeg\"></audio></td></tr>",
                escape_html(&row.duration),
                escape_html(&row.connected),
                escape_html(&row.direction),
                escape_html(&row.caller),
                escape_html(&row.callee),
                escape_html(&row.recording_url),
            ));
        }
        html.push_str("</tbody></table>");

        if let Some(offset) = self.links.previous {
            html.push_str(&self.page_form(offset, "&NestedLessLess;"));
        }
        if let Some(offset) = self.links.next {
            html.push_str(&self.page_form(offset, "&NestedGreaterGreater;"));
        }

        html
    }

    fn page_form(&self, offset: i64, label: &str) -> String {
        let field = |name: &str, value: Option<&String>| {
            format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
                name,
                escape_html(value.map(String::as_str).unwrap_or(""))
            )
        };

        format!(
            "<form action=\"lookup\" method=\"post\">{}{}{}{}\
             <input type=\"hidden\" name=\"offset\" value=\"{}\">\
             <input type=\"submit\" value=\"{}\"> </form>",
            field("tel", self.raw.tel.as_ref()),
            field("dates", self.raw.dates.as_ref()),
            field("fromdate", self.raw.fromdate.as_ref()),
            field("todate", self.raw.todate.as_ref()),
            offset,
            label
        )
    }
}

/// Heading with the dataset's display name
pub fn dataset_heading(settings: &AppSettings) -> String {
    format!("<h2>{}</h2>", escape_html(settings.display_name("")))
}

/// Settings form listing the display name and every recording folder
pub fn config_form(settings: &AppSettings, folders: &[Folder], notice: Option<&str>) -> String {
    let mut html = String::from("<h2>Database configuration</h2>");

    if let Some(notice) = notice {
        html.push_str(&format!("<p class=\"notice\">{}</p>", escape_html(notice)));
    }

    html.push_str("<div id=\"dbconfig\"><form action=\"config\" method=\"post\">");
    html.push_str("<label for=\"dbname\">DB description: </label>");
    html.push_str(&format!(
        "<input type=\"text\" id=\"dbname\" name=\"dbname\" value=\"{}\">",
        escape_html(settings.display_name(UNNAMED_DATASET))
    ));

    html.push_str("<p>Folders containing voice recordings</p><ul id=\"folderlist\">");
    for folder in folders {
        html.push_str(&format!(
            "<li><input type=\"text\" name=\"folderid\" value=\"{}\" readonly> : \
             <input type=\"text\" name=\"datapath\" value=\"{}\"></li>",
            folder.folder_id,
            escape_html(&folder.datapath)
        ));
    }
    html.push_str("</ul>");

    html.push_str("<input type=\"submit\" value=\"Update\"></form></div>");
    html
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
