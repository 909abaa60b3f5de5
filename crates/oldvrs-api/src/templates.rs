//! HTML fragment templates
//!
//! The page head and the lookup form are plain HTML files edited by the
//! operator. They are read from disk on every request so edits show up
//! without a restart.

use oldvrs_core::{AppError, AppResult};
use std::path::PathBuf;
use tracing::error;

/// Shared `<head>` and page header
pub const HEAD_TEMPLATE: &str = "htmlhead.html";

/// Lookup form shown above the results
pub const LOOKUP_TEMPLATE: &str = "htmllookup.html";

/// Template directory
#[derive(Debug, Clone)]
pub struct Templates {
    dir: PathBuf,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Check every template exists, for failing fast at startup
    pub fn verify(&self) -> AppResult<()> {
        for name in [HEAD_TEMPLATE, LOOKUP_TEMPLATE] {
            let path = self.dir.join(name);
            if !path.is_file() {
                return Err(AppError::Template(format!(
                    "missing template {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }

    /// Read a template verbatim
    pub async fn load(&self, name: &str) -> AppResult<String> {
        let path = self.dir.join(name);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            error!("Failed to read template {}: {}", path.display(), e);
            AppError::Template(format!("{}: {}", path.display(), e))
        })
    }

    pub async fn head(&self) -> AppResult<String> {
        self.load(HEAD_TEMPLATE).await
    }

    pub async fn lookup_shell(&self) -> AppResult<String> {
        self.load(LOOKUP_TEMPLATE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let templates = Templates::new(dir.path());
        assert!(matches!(templates.verify(), Err(AppError::Template(_))));

        std::fs::write(dir.path().join(HEAD_TEMPLATE), "<head></head>").unwrap();
        assert!(templates.verify().is_err());

        std::fs::write(dir.path().join(LOOKUP_TEMPLATE), "<form></form>").unwrap();
        templates.verify().unwrap();
        assert_eq!(templates.head().await.unwrap(), "<head></head>");
        assert_eq!(templates.lookup_shell().await.unwrap(), "<form></form>");
    }
}
