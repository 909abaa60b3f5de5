//! Settings and recording folder repository
//!
//! Backs the config page: the single `params` row and the `folders` table.
//! Writes are single statements; folder and settings updates are independent.

use async_trait::async_trait;
use oldvrs_core::{
    models::{AppSettings, Folder},
    traits::ConfigRepository,
    AppError, AppResult,
};
use sqlx::SqlitePool;
use tracing::{debug, error, info, instrument};

/// SQLite implementation of ConfigRepository
#[derive(Clone)]
pub struct SqliteConfigRepository {
    pool: SqlitePool,
}

impl SqliteConfigRepository {
    /// Create a new config repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigRepository for SqliteConfigRepository {
    #[instrument(skip(self))]
    async fn settings(&self) -> AppResult<AppSettings> {
        let row: Option<(Option<String>,)> = sqlx::query_as("SELECT dbname FROM params LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error reading params: {}", e);
                AppError::Database(format!("Failed to read settings: {}", e))
            })?;

        Ok(AppSettings {
            dbname: row.and_then(|(name,)| name),
        })
    }

    #[instrument(skip(self))]
    async fn update_display_name(&self, name: &str) -> AppResult<()> {
        debug!("Updating display name to {:?}", name);

        let result = sqlx::query("UPDATE params SET dbname = ?")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating params: {}", e);
                AppError::Database(format!("Failed to update display name: {}", e))
            })?;

        if result.rows_affected() == 0 {
            sqlx::query("INSERT INTO params (dbname) VALUES (?)")
                .bind(name)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error inserting params: {}", e);
                    AppError::Database(format!("Failed to store display name: {}", e))
                })?;
        }

        info!("Display name set to {:?}", name);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT folderid, IFNULL(datapath, '') FROM folders ORDER BY folderid",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing folders: {}", e);
            AppError::Database(format!("Failed to list folders: {}", e))
        })?;

        Ok(rows
            .into_iter()
            .map(|(folder_id, datapath)| Folder {
                folder_id,
                datapath,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn update_folder(&self, folder_id: i64, datapath: &str) -> AppResult<bool> {
        debug!("Updating folder {} to {:?}", folder_id, datapath);

        let result = sqlx::query("UPDATE folders SET datapath = ? WHERE folderid = ?")
            .bind(datapath)
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating folder {}: {}", folder_id, e);
                AppError::Database(format!("Failed to update folder: {}", e))
            })?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Folder {} now points at {:?}", folder_id, datapath);
        } else {
            debug!("No folder {} to update", folder_id);
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::create_pool_with_options;
    use sqlx::sqlite::SqliteConnectOptions;
    use std::str::FromStr;

    async fn repo_with(params_row: Option<&str>) -> SqliteConfigRepository {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = create_pool_with_options(options, 1).await.unwrap();

        sqlx::query("CREATE TABLE params (dbname TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE folders (folderid INTEGER PRIMARY KEY, datapath TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO folders VALUES (2, '/srv/vr2'), (1, '/srv/vr1')")
            .execute(&pool)
            .await
            .unwrap();
        if let Some(name) = params_row {
            sqlx::query("INSERT INTO params VALUES (?)")
                .bind(name)
                .execute(&pool)
                .await
                .unwrap();
        }

        SqliteConfigRepository::new(pool)
    }

    #[tokio::test]
    async fn test_folders_are_ordered_by_id() {
        let repo = repo_with(None).await;
        let folders = repo.list_folders().await.unwrap();

        assert_eq!(
            folders,
            vec![
                Folder { folder_id: 1, datapath: "/srv/vr1".to_string() },
                Folder { folder_id: 2, datapath: "/srv/vr2".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_update_folder() {
        let repo = repo_with(None).await;

        assert!(repo.update_folder(2, "/mnt/archive").await.unwrap());
        assert!(repo.update_folder(2, "/mnt/archive").await.unwrap());
        let folders = repo.list_folders().await.unwrap();
        assert_eq!(folders[1].datapath, "/mnt/archive");
    }

    #[tokio::test]
    async fn test_update_unknown_folder_is_noop() {
        let repo = repo_with(None).await;

        assert!(!repo.update_folder(9, "/mnt/elsewhere").await.unwrap());
        assert_eq!(repo.list_folders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_display_name_update_and_insert() {
        let repo = repo_with(Some("Sales line")).await;
        assert_eq!(repo.settings().await.unwrap().dbname.as_deref(), Some("Sales line"));

        repo.update_display_name("Support line").await.unwrap();
        assert_eq!(repo.settings().await.unwrap().dbname.as_deref(), Some("Support line"));

        let empty = repo_with(None).await;
        assert_eq!(empty.settings().await.unwrap(), AppSettings::default());
        empty.update_display_name("Fresh").await.unwrap();
        empty.update_display_name("Fresh").await.unwrap();
        assert_eq!(empty.settings().await.unwrap().dbname.as_deref(), Some("Fresh"));
    }
}
