//! src/domain/mod.rs
mod subscriber_email;
pub use subscriber_email::{is_valid_email, SubscriberEmail, ValidationError};
