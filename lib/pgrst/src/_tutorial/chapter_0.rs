//! # Chapter 0: Getting Started
//!
//! Your first PostgREST query in 5 minutes.
//!
//! ## What You'll Learn
//!
//! - Create a [`Session`](crate::Session) from an address, a role and a JWT secret
//! - Read rows with [`select`](crate::Session::select)
//! - Decode them into your own types with [`Output`](crate::Output)
//!
//! ## Prerequisites
//!
//! A PostgREST instance configured with a `jwt-secret`, and in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pgrst = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Your First Query
//!
//! ```ignore
//! use pgrst::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Todo {
//!     pub id: u64,
//!     pub task: String,
//!     pub done: bool,
//! }
//!
//! #[tokio::main]
//! async fn main() -> pgrst::Result<()> {
//!     let session = Session::new(
//!         "http://localhost:3000",
//!         "web_anon",
//!         "reallyreallyreallyreallyverysafe",
//!         Duration::from_secs(300),
//!     )?;
//!
//!     let mut todos: Vec<Todo> = Vec::new();
//!     session
//!         .select()
//!         .table("todos")
//!         .output(Output::rows(&mut todos))
//!         .exec()
//!         .await?;
//!
//!     println!("Todos: {todos:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## What Happens on `exec`
//!
//! ```text
//! session.select()    Db { verb: SELECT, query: empty }
//!   .table("todos")   GET /todos
//!   .output(..)       where the JSON array goes
//!   .exec()           sign token → send → classify → bind
//! ```
//!
//! The token carries the session role and is reused until 80% of its
//! lifetime has elapsed, so most queries never sign anything.
//!
//! ## Next Steps
//!
//! - [Chapter 1: Filters & Payloads][super::chapter_1] - Filters, pagination, writes
