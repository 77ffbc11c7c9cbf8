//! Core types and traits for the pgrst PostgREST client.
//!
//! This crate provides the foundational types used by pgrst:
//! - [`Method`] - HTTP method enum (the four verbs PostgREST understands)
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type with multi-value headers
//! - [`Error`], [`TransportError`] and [`Result`] - Error handling
//! - [`DbResponse`] - Structured error record sent by PostgREST
//! - [`HttpClient`] - Core client trait for HTTP execution
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
mod db_response;
mod error;
mod method;
pub mod prelude;
mod request;
mod response;

pub use body::{JSON_CONTENT_TYPE, from_json, to_json};
pub use client::{HttpClient, HttpClientExt};
pub use db_response::DbResponse;
pub use error::{Error, Result, TransportError};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};
