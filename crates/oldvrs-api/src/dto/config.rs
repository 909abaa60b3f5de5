//! Config form submission
//!
//! The config form lists every folder as a `folderid`/`datapath` pair, so the
//! body repeats both keys. Pairs are matched up by position.

use tracing::warn;

/// Parsed config form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSubmission {
    /// New display name, when a non-empty one was submitted
    pub dbname: Option<String>,

    /// `(folder id, new path)` for every pair with a non-empty path
    pub folders: Vec<(i64, String)>,
}

impl ConfigSubmission {
    /// Build from the decoded form fields, in submission order
    ///
    /// Empty values and unparseable folder ids are skipped.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let dbname = values(pairs, "dbname")
            .find(|v| !v.is_empty())
            .map(str::to_string);

        let folders = values(pairs, "folderid")
            .zip(values(pairs, "datapath"))
            .filter(|(_, path)| !path.is_empty())
            .filter_map(|(id, path)| match id.parse::<i64>() {
                Ok(id) => Some((id, path.to_string())),
                Err(_) => {
                    warn!("Ignoring folder update with id {:?}", id);
                    None
                }
            })
            .collect();

        Self { dbname, folders }
    }

    /// True when there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.dbname.is_none() && self.folders.is_empty()
    }
}

fn values<'a>(pairs: &'a [(String, String)], key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    pairs
        .iter()
        .filter(move |(k, _)| k.as_str() == key)
        .map(|(_, v)| v.trim())
}
