//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for glob importing:
//!
//! ```ignore
//! use pgrst::prelude::*;
//! ```

pub use crate::{
    CountMode, Db, DbResponse, Error, Filter, HttpClient, HyperClient, Outcome, Output, Result,
    Session, SessionBuilder, SigningKey, Verb,
};
pub use serde::{Deserialize, Serialize};
