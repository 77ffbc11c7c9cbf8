//! Tower middleware layers for the pgrst transport.
//!
//! Layers wrap the [`HyperClient`](crate::HyperClient) service and see every
//! request a [`Db`](crate::Db) dispatches, after the bearer token and
//! `Prefer` header have been attached.
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Any other tower layer with matching request/response types can be added
//! through [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer).

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
