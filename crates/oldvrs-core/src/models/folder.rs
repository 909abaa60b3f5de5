//! Recording folder model
//!
//! A folder is a directory of recording files, served under its own URL prefix.

use serde::{Deserialize, Serialize};

/// Persisted `folderid -> datapath` mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Folder identifier referenced by CDR rows
    pub folder_id: i64,

    /// Filesystem directory holding the recordings
    pub datapath: String,
}

/// Builds folder mount prefixes and recording URLs from configured templates
///
/// Templates substitute `{folder}` with the folder id and `{id}` with the
/// percent-encoded record id; everything else is literal. The default recording template
/// `/cdr{folder}/{{id}}.osf` therefore yields `/cdr3/{ABC}.osf`.
#[derive(Debug, Clone)]
pub struct RecordingPaths {
    folder_prefix: String,
    recording_template: String,
}

impl RecordingPaths {
    pub fn new(folder_prefix: impl Into<String>, recording_template: impl Into<String>) -> Self {
        Self {
            folder_prefix: folder_prefix.into(),
            recording_template: recording_template.into(),
        }
    }

    /// URL prefix the folder's directory is mounted under
    pub fn mount_prefix(&self, folder_id: i64) -> String {
        self.folder_prefix
            .replace("{folder}", &folder_id.to_string())
    }

    /// URL of the recording for one record
    pub fn recording_url(&self, folder_id: i64, record_id: &str) -> String {
        self.recording_template
            .replace("{folder}", &folder_id.to_string())
            .replace("{id}", &urlencoding::encode(record_id))
    }
}

impl Default for RecordingPaths {
    fn default() -> Self {
        Self::new("/cdr{folder}", "/cdr{folder}/{{id}}.osf")
    }
}
