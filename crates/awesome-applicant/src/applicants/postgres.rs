//! PostgreSQL implementation of the applicant store.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Postgres;
use tracing::info;

use super::domain::{Applicant, ApplicantDraft, ApplicantId};
use super::store::{ApplicantConnection, ApplicantStore, StoreError};
use crate::config::DatabaseConfig;

/// Builds the process-wide pool. Connections are opened lazily on first acquire.
pub fn connection_pool(config: &DatabaseConfig) -> PgPool {
    info!(database = %config, "configuring connection pool");
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy_with(config.connect_options())
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Applicant store backed by a [`PgPool`].
#[derive(Debug, Clone)]
pub struct PgApplicantStore {
    pool: PgPool,
}

impl PgApplicantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicantStore for PgApplicantStore {
    type Connection = PgApplicantConnection;

    async fn acquire(&self) -> Result<Self::Connection, StoreError> {
        let conn = self.pool.acquire().await?;
        Ok(PgApplicantConnection { conn })
    }
}

/// Pooled connection lease; dropping it hands the connection back to the pool.
#[derive(Debug)]
pub struct PgApplicantConnection {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl ApplicantConnection for PgApplicantConnection {
    async fn select_all(&mut self) -> Result<Vec<Applicant>, StoreError> {
        let rows = sqlx::query_as::<_, Applicant>("SELECT id, name, email, profile FROM applicants")
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(rows)
    }

    async fn insert(&mut self, draft: &ApplicantDraft) -> Result<Applicant, StoreError> {
        let row = sqlx::query_as::<_, Applicant>(
            r#"
              INSERT INTO applicants (name, email, profile) VALUES ($1, $2, $3)
              RETURNING id, name, email, profile
            "#,
        )
        .bind(draft.name.as_deref())
        .bind(draft.email.as_deref())
        .bind(draft.profile.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(row)
    }

    async fn select_by_id(&mut self, id: ApplicantId) -> Result<Option<Applicant>, StoreError> {
        let row = sqlx::query_as::<_, Applicant>(
            "SELECT id, name, email, profile FROM applicants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    async fn update_by_id(
        &mut self,
        id: ApplicantId,
        draft: &ApplicantDraft,
    ) -> Result<Option<Applicant>, StoreError> {
        let row = sqlx::query_as::<_, Applicant>(
            r#"
              UPDATE applicants SET name = $1, email = $2, profile = $3
              WHERE id = $4
              RETURNING id, name, email, profile
            "#,
        )
        .bind(draft.name.as_deref())
        .bind(draft.email.as_deref())
        .bind(draft.profile.as_deref())
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    async fn delete_by_id(&mut self, id: ApplicantId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM applicants WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected())
    }
}
