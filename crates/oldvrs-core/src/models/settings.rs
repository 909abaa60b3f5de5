//! Dataset settings stored in the `params` table

use serde::{Deserialize, Serialize};

/// Single-row settings record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Display name of the dataset, shown as the page heading
    pub dbname: Option<String>,
}

impl AppSettings {
    /// Display name, or `fallback` when none has been stored
    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.dbname.as_deref().unwrap_or(fallback)
    }
}
