//! PostgREST query-builder client.
//!
//! Build a query with a fluent chain, sign a short-lived bearer token, send
//! it over a pooled hyper transport and decode the answer into your own
//! types.
//!
//! # Example
//!
//! ```ignore
//! use pgrst::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Todo {
//!     id: u64,
//!     task: String,
//!     done: bool,
//! }
//!
//! let session = Session::new(
//!     "http://localhost:3000",
//!     "web_anon",
//!     "reallyreallyreallyreallyverysafe",
//!     Duration::from_secs(300),
//! )?;
//!
//! let mut todos: Vec<Todo> = Vec::new();
//! let outcome = session
//!     .select()
//!     .table("todos")
//!     .filter("done", Filter::Equal, "false")
//!     .with_count(CountMode::Exact)
//!     .output(Output::rows(&mut todos))
//!     .exec()
//!     .await?;
//!
//! println!("{} of {} todos", todos.len(), outcome.count());
//! ```
//!
//! See the [tutorial][_tutorial] for a complete guide.

pub mod _tutorial;
mod classify;
mod client;
mod config;
mod connector;
mod db;
pub mod middleware;
mod outcome;
mod output;
pub mod prelude;
mod query;
mod session;
mod token;

// Re-export client types
pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};

// Re-export query building and execution
pub use classify::{Disposition, NOTHING_MATCHED, Range, classify};
pub use db::{Db, Target, Verb};
pub use outcome::Outcome;
pub use output::{Output, RecordSink, SequenceSink, bind};
pub use query::{CountMode, Filter, Query};
pub use session::{DEFAULT_TOKEN_LIFETIME, Session, SessionBuilder};
pub use token::{Claims, SharedTokenCache, SigningKey, TokenCache, TokenSigner};

// Re-export the signing algorithm selector
pub use jsonwebtoken::Algorithm;

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use pgrst_core::{
    DbResponse, Error, HttpClient, HttpClientExt, JSON_CONTENT_TYPE, Method, Request,
    RequestBuilder, Response, Result, TransportError, from_json, to_json,
};

// Re-export http types for status codes and headers
pub use pgrst_core::{HeaderMap, StatusCode, header};

pub use url;
