//! HTTP method types.

use derive_more::Display;

/// HTTP request method used against a PostgREST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - read rows or call a read-only function.
    #[display("GET")]
    Get,
    /// POST method - insert or upsert rows, call a function.
    #[display("POST")]
    Post,
    /// PATCH method - update rows matching the filters.
    #[display("PATCH")]
    Patch,
    /// DELETE method - delete rows matching the filters.
    #[display("DELETE")]
    Delete,
}

impl Method {
    /// Returns `true` if the method does not modify rows.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Get)
    }

    /// Returns `true` if a request with this method may carry a body.
    #[must_use]
    pub const fn accepts_body(&self) -> bool {
        matches!(self, Self::Post | Self::Patch)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Patch => Self::PATCH,
            Method::Delete => Self::DELETE,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = crate::Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        match method {
            http::Method::GET => Ok(Self::Get),
            http::Method::POST => Ok(Self::Post),
            http::Method::PATCH => Ok(Self::Patch),
            http::Method::DELETE => Ok(Self::Delete),
            other => Err(crate::Error::invalid_request(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}
