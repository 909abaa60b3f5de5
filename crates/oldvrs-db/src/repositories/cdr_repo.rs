//! CDR (Call Detail Record) repository implementation
//!
//! Executes the statements produced by [`CdrQueryBuilder`] against SQLite.
//! Uses runtime queries (not compile-time macros) because the table and
//! column names come from configuration.

use async_trait::async_trait;
use oldvrs_core::{
    models::Cdr,
    query::{BindValue, CdrQuery, CdrQueryBuilder},
    traits::CdrRepository,
    AppError, AppResult,
};
use sqlx::{query::QueryAs, sqlite::SqliteArguments, Sqlite, SqlitePool};
use tracing::{debug, error, instrument};

/// SQLite implementation of CdrRepository
#[derive(Clone)]
pub struct SqliteCdrRepository {
    pool: SqlitePool,
    builder: CdrQueryBuilder,
}

impl SqliteCdrRepository {
    /// Create a new CDR repository reading the builder's table
    pub fn new(pool: SqlitePool, builder: CdrQueryBuilder) -> Self {
        Self { pool, builder }
    }

    /// Query builder for the configured table layout
    pub fn builder(&self) -> &CdrQueryBuilder {
        &self.builder
    }
}

fn bind_params<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: &[BindValue],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            BindValue::Text(text) => query.bind(text.clone()),
            BindValue::Integer(n) => query.bind(*n),
        };
    }
    query
}

#[async_trait]
impl CdrRepository for SqliteCdrRepository {
    #[instrument(skip(self))]
    async fn count_all(&self) -> AppResult<i64> {
        let sql = self.builder.total_sql();
        let result: (i64,) = sqlx::query_as(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting CDRs: {}", e);
                AppError::Database(format!("Failed to count CDRs: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, query), fields(predicate = %query.predicate))]
    async fn count_matching(&self, query: &CdrQuery) -> AppResult<i64> {
        debug!("Counting CDRs: {}", query.count_sql);

        let result = bind_params(
            sqlx::query_as::<Sqlite, (i64,)>(&query.count_sql),
            query.count_params(),
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error counting filtered CDRs: {}", e);
            AppError::Database(format!("Failed to count CDRs: {}", e))
        })?;

        Ok(result.0)
    }

    #[instrument(skip(self, query), fields(offset = query.offset, limit = query.limit))]
    async fn fetch_page(&self, query: &CdrQuery) -> AppResult<Vec<Cdr>> {
        debug!("Fetching CDR page: {}", query.page_sql);

        let rows = bind_params(
            sqlx::query_as::<Sqlite, CdrRow>(&query.page_sql),
            &query.page_params(),
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching filtered CDRs: {}", e);
            AppError::Database(format!("Failed to fetch CDRs: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows to domain model
#[derive(Debug, sqlx::FromRow)]
struct CdrRow {
    id: String,
    direction: String,
    duration: String,
    connected: String,
    caller_number: String,
    callee_number: String,
    folder_id: i64,
}

impl From<CdrRow> for Cdr {
    fn from(row: CdrRow) -> Self {
        Self {
            id: row.id,
            direction: row.direction,
            duration: row.duration,
            connected: row.connected,
            caller_number: row.caller_number,
            callee_number: row.callee_number,
            folder_id: row.folder_id,
        }
    }
}
