//! src/store/memory.rs
use super::{StoreError, SubscriptionStore};
use crate::domain::SubscriberEmail;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Process-local store with the same uniqueness rule as the `subscriptions`
/// table.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    emails: Mutex<HashSet<SubscriberEmail>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|e| e.as_ref() == email)
    }

    pub fn len(&self) -> usize {
        self.emails.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn insert(&self, email: &SubscriberEmail) -> Result<(), StoreError> {
        let mut emails = self.emails.lock().unwrap_or_else(PoisonError::into_inner);
        if emails.insert(email.clone()) {
            Ok(())
        } else {
            Err(StoreError::Duplicate)
        }
    }
}
