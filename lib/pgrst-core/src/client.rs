//! HTTP client traits.
//!
//! - [`HttpClient`] - Low-level HTTP execution
//! - [`HttpClientExt`] - The four verbs used against PostgREST
//!
//! Implement [`HttpClient`] to plug a custom transport (or a recording
//! client in tests) under a `pgrst` session.

use std::collections::HashMap;
use std::future::Future;

use bytes::Bytes;
use url::Url;

use crate::{Method, Request, Response, Result};

/// Core HTTP client trait.
///
/// This trait defines the interface for executing HTTP requests.
/// Timeouts and cancellation belong to the implementation.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Any status code is a response; only a failure to obtain one is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] if the request fails:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

/// Extension trait for [`HttpClient`] with one method per verb.
pub trait HttpClientExt: HttpClient {
    /// Execute a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn get(
        &self,
        url: Url,
        headers: HashMap<String, String>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        let request = Request::builder(Method::Get, url).headers(headers).build();
        self.execute(request)
    }

    /// Execute a POST request with an optional body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn post(
        &self,
        url: Url,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        let request = Request::builder(Method::Post, url)
            .headers(headers)
            .maybe_body(body)
            .build();
        self.execute(request)
    }

    /// Execute a PATCH request with an optional body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn patch(
        &self,
        url: Url,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        let request = Request::builder(Method::Patch, url)
            .headers(headers)
            .maybe_body(body)
            .build();
        self.execute(request)
    }

    /// Execute a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn delete(
        &self,
        url: Url,
        headers: HashMap<String, String>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        let request = Request::builder(Method::Delete, url)
            .headers(headers)
            .build();
        self.execute(request)
    }
}

// Blanket implementation for all HttpClient implementors
impl<T: HttpClient> HttpClientExt for T {}
