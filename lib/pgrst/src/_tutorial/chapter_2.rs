//! # Chapter 2: Outcomes & Errors
//!
//! What [`exec`](crate::Db::exec) tells you about a query.
//!
//! ## Outcomes
//!
//! A completed query returns an [`Outcome`](crate::Outcome):
//!
//! ```ignore
//! let outcome = session
//!     .update()
//!     .table("todos")
//!     .filter("id", Filter::Equal, "404")
//!     .input(&serde_json::json!({ "done": true }))
//!     .exec()
//!     .await?;
//!
//! if !outcome.is_success() {
//!     // PostgREST answered `Content-Range: */*`: nothing matched the filter.
//! }
//! ```
//!
//! | Status | Result |
//! |--------|--------|
//! | 200, 201, 204, 206 | `Ok(outcome)`, body bound into the output |
//! | 409 | `Ok(outcome)` with `outcome.db_response()` set |
//! | anything else | `Err(Error::Request(record))` |
//!
//! ## Conflicts
//!
//! A unique violation is a business outcome, not a failure:
//!
//! ```ignore
//! let outcome = session.insert().table("todos").input(&todo).exec().await?;
//!
//! if let Some(record) = outcome.db_response() {
//!     if record.code() == Some("23505") {
//!         println!("already there: {record}");
//!     }
//! }
//! ```
//!
//! ## Errors
//!
//! ```ignore
//! use pgrst::Error;
//!
//! match session.select().table("nope").output(Output::rows(&mut rows)).exec().await {
//!     Ok(outcome) => println!("{} rows", outcome.count()),
//!     Err(Error::Request(record)) => {
//!         println!("HTTP {}: {:?}", record.http_status_code, record.message());
//!     }
//!     Err(err) if err.is_timeout() => println!("timed out"),
//!     Err(err) => return Err(err),
//! }
//! ```
//!
//! | Variant | When |
//! |---------|------|
//! | `Serialization` | the input cannot be encoded as JSON |
//! | `Signing` | no token could be signed |
//! | `NoVerbSelected` | `exec` on a builder from [`Session::db`](crate::Session::db) |
//! | `MissingOutput` | a select without an output |
//! | `Transport` | connection, TLS or timeout failure |
//! | `OutputBinding` | the body does not fit the output |
//! | `Request` | any other status, with the decoded error record |
//!
//! Nothing is retried: every error reaches the caller of `exec`.
//!
//! ## Next Steps
//!
//! - [Chapter 3: Transport & Logging][super::chapter_3] - Timeouts and tracing
