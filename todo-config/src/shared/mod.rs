//! Shared configuration types used across the service.

mod connection;
mod sentry;

pub use connection::*;
pub use sentry::*;
