//! src/store/postgres.rs
use super::{StoreError, SubscriptionStore};
use crate::domain::SubscriberEmail;
use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// SQLSTATE raised by Postgres on a unique index violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for PostgresStore {
    #[tracing::instrument(
        name = "Saving new subscriber details in the database",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    async fn insert(&self, email: &SubscriberEmail) -> Result<(), StoreError> {
        sqlx::query(
            r#"
    INSERT INTO subscriptions (id, email, subscribed_at)
    VALUES ($1, $2, $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email.as_ref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let error = StoreError::from(e);
            log_unexpected(&error);
            error
        })?;

        Ok(())
    }
}

/// Duplicates are an expected outcome and are reported by the caller.
fn log_unexpected(error: &StoreError) {
    if let StoreError::Unexpected(e) = error {
        tracing::error!(error.cause_chain = ?e, "Failed to execute query");
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Duplicate
            }
            _ => StoreError::Unexpected(
                anyhow::Error::new(e).context("Failed to insert new subscriber"),
            ),
        }
    }
}
