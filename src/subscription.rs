//! src/subscription.rs
//!
//! The email-capture flow as a per-session state machine:
//!
//! ```text
//! ShowForm --submit(valid)--> Submitting --inserted-----------> ShowConfirmation
//!    ^                             |
//!    +-----duplicate / failure-----+
//! ```
//!
//! `ShowConfirmation` is terminal for the session. A `submit` that arrives
//! while the session is `Submitting` or `ShowConfirmation` is ignored.
//!
//! The controller only tracks in-flight submissions. Whether a visitor is
//! confirmed lives with the visitor (the HTTP session), and the caller records
//! it once `submit` returns `SubmitOutcome::Subscribed`.
use crate::domain::{SubscriberEmail, ValidationError};
use crate::notify::{Notice, Notifier, Severity};
use crate::store::{StoreError, SubscriptionStore};
use crate::utils::error_chain_fmt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// What the controller needs to know about the visitor behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visitor {
    pub session: SessionId,
    pub confirmed: bool,
}

impl Visitor {
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            confirmed: false,
        }
    }

    pub fn confirmed(self) -> Self {
        Self {
            confirmed: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    ShowForm,
    Submitting,
    ShowConfirmation,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("The email is already subscribed")]
    Duplicate,
    #[error("Failed to store the subscription")]
    Transient(#[source] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for SubscribeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate => SubscribeError::Duplicate,
            StoreError::Unexpected(e) => SubscribeError::Transient(e),
        }
    }
}

impl SubscribeError {
    pub fn notice(&self) -> Notice {
        match self {
            SubscribeError::Validation(ValidationError::Empty) => Notice::new(
                Severity::Error,
                "Email Required",
                "Please enter your email address",
            ),
            SubscribeError::Validation(ValidationError::Invalid(_)) => Notice::new(
                Severity::Error,
                "Invalid Email",
                "Please enter a valid email address",
            ),
            SubscribeError::Duplicate => Notice::new(
                Severity::Warning,
                "Already Subscribed",
                "This email is already on our list. Keep an eye on your inbox!",
            ),
            SubscribeError::Transient(_) => Notice::new(
                Severity::Error,
                "Subscription Failed",
                "Please try again in a moment.",
            ),
        }
    }
}

pub fn welcome_notice() -> Notice {
    Notice::new(
        Severity::Success,
        "Welcome to TrendAI News!",
        "You'll receive your first AI-curated newsletter soon.",
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the store was not contacted.
    Rejected,
    Subscribed,
    AlreadySubscribed,
    Failed,
    /// A submission is in flight or the session is already confirmed.
    Ignored,
}

pub struct SubscriptionController {
    store: Arc<dyn SubscriptionStore>,
    in_flight: Mutex<HashSet<SessionId>>,
}

impl SubscriptionController {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn view(&self, visitor: &Visitor) -> View {
        if visitor.confirmed {
            View::ShowConfirmation
        } else if self.is_in_flight(visitor.session) {
            View::Submitting
        } else {
            View::ShowForm
        }
    }

    #[tracing::instrument(name = "Submitting subscription form", skip(self, email, notifier))]
    pub async fn submit(
        &self,
        visitor: &Visitor,
        email: &str,
        notifier: &dyn Notifier,
    ) -> SubmitOutcome {
        let (email, _in_flight) = match self.begin(visitor, email) {
            Ok(Some(started)) => started,
            Ok(None) => return SubmitOutcome::Ignored,
            Err(e) => {
                tracing::info!("Rejected subscription form: {}", e);
                notifier.notify(e.notice());
                return SubmitOutcome::Rejected;
            }
        };

        // `_in_flight` returns the session to the form when dropped, including
        // when this future is dropped while the insert is pending.
        let result = self
            .store
            .insert(&email)
            .await
            .map_err(SubscribeError::from);

        match result {
            Ok(()) => {
                tracing::info!("New subscriber has been saved");
                notifier.notify(welcome_notice());
                SubmitOutcome::Subscribed
            }
            Err(e) => {
                let outcome = match e {
                    SubscribeError::Duplicate => {
                        tracing::info!("Email is already subscribed");
                        SubmitOutcome::AlreadySubscribed
                    }
                    _ => {
                        tracing::error!(
                            error.cause_chain = ?e,
                            error.message = %e,
                            "Failed to store subscription"
                        );
                        SubmitOutcome::Failed
                    }
                };
                notifier.notify(e.notice());
                outcome
            }
        }
    }

    fn is_in_flight(&self, session: SessionId) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&session)
    }

    /// Validates and marks the session as `Submitting` under a single lock.
    /// `Ok(None)` means the call must be ignored.
    fn begin(
        &self,
        visitor: &Visitor,
        email: &str,
    ) -> Result<Option<(SubscriberEmail, InFlight<'_>)>, SubscribeError> {
        if visitor.confirmed {
            tracing::warn!(view = ?View::ShowConfirmation, "Ignoring submission");
            return Ok(None);
        }

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight.contains(&visitor.session) {
            tracing::warn!(view = ?View::Submitting, "Ignoring submission");
            return Ok(None);
        }

        let email = SubscriberEmail::parse(email.to_owned())?;
        in_flight.insert(visitor.session);

        Ok(Some((
            email,
            InFlight {
                sessions: &self.in_flight,
                session: visitor.session,
            },
        )))
    }
}

/// Clears a session's `Submitting` mark when dropped.
struct InFlight<'a> {
    sessions: &'a Mutex<HashSet<SessionId>>,
    session: SessionId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.session);
    }
}
