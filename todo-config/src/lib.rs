//! Configuration management for the todo backend.
//!
//! Provides environment detection, layered configuration loading from YAML
//! files and environment variables, secret handling, and shared configuration
//! types used by the service.

mod environment;
mod load;
mod secret;
pub mod shared;

pub use environment::*;
pub use load::*;
pub use secret::*;
