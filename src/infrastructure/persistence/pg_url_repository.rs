//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::entities::{ShortCode, UrlMapping};
use crate::domain::repositories::{RepositoryError, UrlRepository};

/// Unique constraint protecting the `original_url` column.
const ORIGINAL_URL_CONSTRAINT: &str = "urls_original_url_key";

/// Default deadline applied to each storage call.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL repository for the code/URL bijection.
///
/// Uniqueness of both columns is enforced by the schema. `save` is a single
/// statement, so the outcome is classified from the row the database returns
/// rather than from a second query. Every call is bounded by `timeout`;
/// hitting it yields [`RepositoryError::Storage`] and never leaves half a
/// mapping behind, because each write touches exactly one row.
#[derive(Debug, Clone)]
pub struct PgUrlRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self::with_timeout(pool, DEFAULT_STATEMENT_TIMEOUT)
    }

    /// Creates a repository whose calls fail after `timeout`.
    pub fn with_timeout(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Number of stored mappings.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls").fetch_one(&self.pool),
        )
        .await
    }

    /// Most recently created mappings, newest first.
    pub async fn list_recent(
        &self,
        limit: i64,
    ) -> Result<Vec<(UrlMapping, DateTime<Utc>)>, RepositoryError> {
        let rows = self
            .bounded(
                sqlx::query_as::<_, (String, String, DateTime<Utc>)>(
                    r#"
                    SELECT short_code, original_url, created_at
                    FROM urls
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter()
            .map(|(code, url, created_at)| {
                Ok((UrlMapping::new(parse_stored_code(code)?, url), created_at))
            })
            .collect()
    }

    /// Administrative wipe of every mapping.
    pub async fn clear(&self) -> Result<u64, RepositoryError> {
        let result = self
            .bounded(sqlx::query("DELETE FROM urls").execute(&self.pool))
            .await?;
        Ok(result.rows_affected())
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Storage call timed out");
                Err(RepositoryError::Storage(format!(
                    "operation timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }
}

fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

fn is_original_url_violation(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some(ORIGINAL_URL_CONSTRAINT)
}

fn parse_stored_code(code: String) -> Result<ShortCode, RepositoryError> {
    ShortCode::parse(code).map_err(|e| RepositoryError::Storage(e.to_string()))
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn save(&self, code: &ShortCode, original_url: &str) -> Result<(), RepositoryError> {
        // On a code conflict the no-op update locks and returns the row that
        // owns the code, including rows committed by concurrent transactions.
        let insert = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO urls (short_code, original_url)
            VALUES ($1, $2)
            ON CONFLICT (short_code) DO UPDATE SET short_code = EXCLUDED.short_code
            RETURNING original_url
            "#,
        )
        .bind(code.as_str())
        .bind(original_url)
        .fetch_one(&self.pool);

        let owner = match tokio::time::timeout(self.timeout, insert).await {
            Ok(Ok(owner)) => owner,
            Ok(Err(e)) if is_original_url_violation(&e) => {
                // The non-arbiter URL index can fire before ON CONFLICT applies
                // when an identical pair is inserted concurrently.
                return match self.get_by_original(original_url).await {
                    Ok(existing) if existing == *code => Ok(()),
                    Ok(_) => Err(RepositoryError::Duplicate {
                        original_url: original_url.to_string(),
                    }),
                    Err(e) => Err(e),
                };
            }
            Ok(Err(e)) => return Err(map_sqlx_error(e)),
            Err(_) => {
                warn!(code = %code, "Save timed out");
                return Err(RepositoryError::Storage(format!(
                    "save timed out after {:?}",
                    self.timeout
                )));
            }
        };

        if owner == original_url {
            debug!(code = %code, "Mapping stored");
            Ok(())
        } else {
            Err(RepositoryError::AlreadyExists {
                code: code.to_string(),
            })
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<String, RepositoryError> {
        self.bounded(
            sqlx::query_scalar::<_, String>("SELECT original_url FROM urls WHERE short_code = $1")
                .bind(code.as_str())
                .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_original(&self, original_url: &str) -> Result<ShortCode, RepositoryError> {
        let code = self
            .bounded(
                sqlx::query_scalar::<_, String>(
                    "SELECT short_code FROM urls WHERE original_url = $1",
                )
                .bind(original_url)
                .fetch_optional(&self.pool),
            )
            .await?
            .ok_or(RepositoryError::NotFound)?;

        parse_stored_code(code)
    }

    async fn close(&self) -> Result<(), RepositoryError> {
        self.pool.close().await;
        debug!("PostgreSQL pool closed");
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }
}
