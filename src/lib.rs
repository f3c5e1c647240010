pub mod configuration;
pub mod domain;
pub mod notify;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod store;
pub mod subscription;
pub mod telemetry;
pub mod utils;
