//! # Chapter 3: Transport & Logging
//!
//! Tune the HTTP transport and see what goes over the wire.
//!
//! ## Timeouts and Pooling
//!
//! ```ignore
//! use pgrst::{ClientConfig, Session, SigningKey};
//! use std::time::Duration;
//!
//! let session = Session::builder()
//!     .url("http://localhost:3000")
//!     .role("web_anon")
//!     .signing_key(SigningKey::hmac("reallyreallyreallyreallyverysafe")?)
//!     .client_config(
//!         ClientConfig::builder()
//!             .timeout(Duration::from_secs(5))
//!             .pool_idle_per_host(8),
//!     )
//!     .user_agent("todos/1.0")
//!     .build()?;
//! ```
//!
//! The timeout covers the whole exchange, body download included.
//!
//! ## Asymmetric Keys
//!
//! ```ignore
//! use pgrst::{Algorithm, SigningKey};
//!
//! let key = SigningKey::from_pem(Algorithm::RS256, include_bytes!("private.pem"))?;
//! ```
//!
//! Public keys are refused: this client only signs tokens.
//!
//! ## Logging
//!
//! pgrst logs through `tracing` and never installs a subscriber. Install one
//! in your binary:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("pgrst=debug")
//!     .init();
//! ```
//!
//! `debug()` on a builder logs the status and body of its responses at info
//! level:
//!
//! ```ignore
//! session.select().table("todos").debug().output(Output::rows(&mut todos)).exec().await?;
//! ```
//!
//! ## Middleware
//!
//! Bring your own transport to add Tower layers:
//!
//! ```ignore
//! use pgrst::{HyperClient, Session, SigningKey};
//! use pgrst::middleware::LoggingLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(LoggingLayer::debug())
//!     .build();
//!
//! let session = Session::builder()
//!     .url("http://localhost:3000")
//!     .signing_key(SigningKey::hmac("reallyreallyreallyreallyverysafe")?)
//!     .build_with(client)?;
//! ```
//!
//! The logging layer records method, path, status and elapsed time. At debug
//! level it adds the query string and headers, with `Authorization`
//! redacted.
//!
//! ## Custom Transports
//!
//! Any [`HttpClient`](crate::HttpClient) works with
//! [`SessionBuilder::build_with`](crate::SessionBuilder::build_with), which
//! is how the unit tests of this crate record requests without a network.
//!
//! ## Summary
//!
//! - Configure the transport through `client_config` or `build_with`
//! - Log with `tracing`; `debug()` for a single query
//! - Layers are applied in order: first added = innermost
