//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use pgrst_core::prelude::*;
//! ```

pub use crate::{
    DbResponse, Error, HttpClient, HttpClientExt, Method, Request, RequestBuilder, Response,
    Result, TransportError, from_json, to_json,
};
