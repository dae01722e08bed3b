// === PUBLIC CONTRACT ===
// Wire models shared by every layer.
pub mod contract;

pub use contract::model;

// === MODULE DEFINITION ===
pub mod config;
pub mod module;
pub use config::FeastConfig;
pub use module::{Backend, Feast};

pub use domain::error::DomainError;

// === INTERNAL MODULES ===
// Exposed for the CLI and for integration tests. Prefer `Feast` and `contract` for stable use.
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
