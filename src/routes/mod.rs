//! src/routes/mod.rs
mod health_check;
pub use health_check::*;

mod subscriptions;
pub use subscriptions::*;

mod home;
pub use home::*;
