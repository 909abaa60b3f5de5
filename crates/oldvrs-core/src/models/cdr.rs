//! CDR (Call Detail Record) model
//!
//! Rows are written by an external recorder; this system only reads them.

use serde::{Deserialize, Serialize};

/// CDR (Call Detail Record)
///
/// Values are kept as the raw stored text so the formatters decide how
/// lenient to be with each one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cdr {
    /// Opaque record identifier, also the recording file stem
    pub id: String,

    /// Call direction as stored
    pub direction: String,

    /// Call duration as `H:M:S`
    pub duration: String,

    /// Connection timestamp as `YYYY-MM-DDTHH:MM:SSZ`
    pub connected: String,

    /// Calling party, empty when not recorded
    pub caller_number: String,

    /// Called party, empty when not recorded
    pub callee_number: String,

    /// Folder holding the recording
    pub folder_id: i64,
}

impl Cdr {
    /// Check if either party number contains `needle`
    pub fn involves(&self, needle: &str) -> bool {
        self.caller_number.contains(needle) || self.callee_number.contains(needle)
    }
}
