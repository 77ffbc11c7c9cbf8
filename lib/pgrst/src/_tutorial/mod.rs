//! # Tutorial: Querying PostgREST with pgrst
//!
//! Learn to read and write a PostgREST API step by step.
//!
//! ## Chapters
//!
//! 1. [Getting Started][chapter_0] - A session and your first select
//! 2. [Filters & Payloads][chapter_1] - Filters, pagination, inserts, updates
//! 3. [Outcomes & Errors][chapter_2] - Success, conflicts, counts and failures
//! 4. [Transport & Logging][chapter_3] - Timeouts, middleware, tracing
//!
//! Ready? Start with [Chapter 0: Getting Started][chapter_0].

pub mod chapter_0;
pub mod chapter_1;
pub mod chapter_2;
pub mod chapter_3;
