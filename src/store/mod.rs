//! src/store/mod.rs
use crate::domain::SubscriberEmail;
use crate::utils::error_chain_fmt;

mod memory;
pub use memory::InMemoryStore;

mod postgres;
pub use postgres::PostgresStore;

#[derive(thiserror::Error)]
pub enum StoreError {
    #[error("The email is already subscribed")]
    Duplicate,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// A collection of email addresses with a uniqueness constraint on the
/// address. Inserting an address that is already present must fail with
/// `StoreError::Duplicate` and leave the collection unchanged.
#[async_trait::async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn insert(&self, email: &SubscriberEmail) -> Result<(), StoreError>;
}
