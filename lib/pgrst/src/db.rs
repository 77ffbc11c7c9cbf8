//! Query builder and execution.
//!
//! A [`Db`] is one query: a [`Verb`], a [`Target`], accumulated parameters,
//! an optional input payload and an optional [`Output`] destination.
//! [`Db::exec`] signs (or reuses) a bearer token, sends the request,
//! classifies the answer and binds the body into the destination.
//!
//! # Example
//!
//! ```ignore
//! use pgrst::{Filter, Output, Session};
//!
//! let mut todos: Vec<Todo> = Vec::new();
//! let outcome = session
//!     .select()
//!     .table("todos")
//!     .filter("done", Filter::Equal, "false")
//!     .limit(10)
//!     .output(Output::rows(&mut todos))
//!     .exec()
//!     .await?;
//! ```

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use derive_more::Display;
use http::header::CONTENT_RANGE;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::{
    CountMode, DbResponse, Disposition, Error, Filter, HttpClient, HttpClientExt, HyperClient,
    JSON_CONTENT_TYPE, Method, Outcome, Output, Query, Range, Result, Session, bind, classify,
    to_json,
};

const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const PREFER: &str = "Prefer";

/// Operation selected on a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Verb {
    /// Read rows.
    #[display("SELECT")]
    Select,
    /// Insert rows.
    #[display("INSERT")]
    Insert,
    /// Insert rows, merging with existing ones on key conflicts.
    #[display("UPSERT")]
    Upsert,
    /// Update the rows matched by the filters.
    #[display("UPDATE")]
    Update,
    /// Delete the rows matched by the filters.
    #[display("DELETE")]
    Delete,
}

impl Verb {
    /// HTTP method sent for this verb.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::Select => Method::Get,
            Self::Insert | Self::Upsert => Method::Post,
            Self::Update => Method::Patch,
            Self::Delete => Method::Delete,
        }
    }
}

/// Endpoint a builder operates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A table or view: `/<name>`.
    Table(String),
    /// A database function: `/rpc/<name>`.
    Rpc(String),
}

impl Target {
    fn segments(&self) -> [&str; 2] {
        match self {
            Self::Table(name) => ["", name],
            Self::Rpc(name) => ["rpc", name],
        }
    }
}

type Encoder<'a> = Box<dyn Fn() -> Result<Bytes> + Send + Sync + 'a>;

/// A single PostgREST query.
///
/// Built from a [`Session`] verb shortcut. Builder methods consume and
/// return the builder; [`exec`](Self::exec) borrows it, so the same query
/// can be sent again with identical parameters.
///
/// Deriving another verb from a builder ([`select`](Self::select),
/// [`insert`](Self::insert), ...) keeps the session, target, role and debug
/// flag, and starts from empty parameters with no input or output.
pub struct Db<'a, C = HyperClient> {
    session: Session<C>,
    verb: Option<Verb>,
    target: Option<Target>,
    role: String,
    query: Query,
    input: Option<Encoder<'a>>,
    output: Option<Output<'a>>,
    debug: bool,
}

impl<C> fmt::Debug for Db<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("verb", &self.verb)
            .field("target", &self.target)
            .field("role", &self.role)
            .field("query", &self.query)
            .field("has_input", &self.input.is_some())
            .field("output", &self.output)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl<'a, C> Db<'a, C> {
    pub(crate) fn new(session: Session<C>) -> Self {
        let role = session.role().to_string();
        Self {
            session,
            verb: None,
            target: None,
            role,
            query: Query::new(),
            input: None,
            output: None,
            debug: false,
        }
    }

    pub(crate) fn with_verb(mut self, verb: Verb) -> Self {
        self.verb = Some(verb);
        self
    }

    /// Selected verb, if any.
    #[must_use]
    pub const fn verb(&self) -> Option<Verb> {
        self.verb
    }

    /// Selected endpoint, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Role the bearer token is signed for.
    #[must_use]
    pub fn current_role(&self) -> &str {
        &self.role
    }

    /// Parameters, header overrides and preferences accumulated so far.
    #[must_use]
    pub const fn accumulated(&self) -> &Query {
        &self.query
    }

    // ========================================================================
    // Endpoint and Identity
    // ========================================================================

    /// Operate on a table or view.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.target = Some(Target::Table(name.into()));
        self
    }

    /// Call a database function.
    #[must_use]
    pub fn rpc(mut self, name: impl Into<String>) -> Self {
        self.target = Some(Target::Rpc(name.into()));
        self
    }

    /// Sign the token for another role. Inherited by derived builders.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Log the status and body of every response at info level.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    // ========================================================================
    // Query Parameters
    // ========================================================================

    /// Restrict the returned columns (`select=a,b`).
    #[must_use]
    pub fn columns<I, V>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.query.columns(columns);
        self
    }

    /// Add a `field=<op>.<value>` filter.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, op: Filter, value: impl AsRef<str>) -> Self {
        self.query.filter(field, op, value.as_ref());
        self
    }

    /// Add a `field=in.(...)` filter.
    #[must_use]
    pub fn filter_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.query.filter_in(field, values);
        self
    }

    /// Return at most `limit` rows.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit(limit);
        self
    }

    /// Skip the first `offset` rows.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset(offset);
        self
    }

    /// Ask for the total row count in `Content-Range`.
    #[must_use]
    pub fn with_count(mut self, mode: CountMode) -> Self {
        self.query.count(mode);
        self
    }

    /// Add a `Prefer` preference (`return=representation`, `tx=rollback`, ...).
    #[must_use]
    pub fn prefer(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.prefer(key, value);
        self
    }

    /// Add a raw query parameter (`order`, `or`, ...).
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(key, value);
        self
    }

    /// Set a raw request header, replacing a previous value.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.set(name, value);
        self
    }

    // ========================================================================
    // Payload
    // ========================================================================

    /// Send `value` as the JSON body. Serialized when the query runs.
    #[must_use]
    pub fn input<T>(mut self, value: &'a T) -> Self
    where
        T: Serialize + Sync + ?Sized,
    {
        self.input = Some(Box::new(move || to_json(value)));
        self
    }

    /// Write the response body into `output`.
    #[must_use]
    pub fn output(mut self, output: Output<'a>) -> Self {
        self.output = Some(output);
        self
    }
}

impl<C: Clone> Db<'_, C> {
    fn derive<'b>(&self, verb: Verb) -> Db<'b, C> {
        Db {
            session: self.session.clone(),
            verb: Some(verb),
            target: self.target.clone(),
            role: self.role.clone(),
            query: Query::new(),
            input: None,
            output: None,
            debug: self.debug,
        }
    }

    /// Derive a read on the same endpoint.
    #[must_use]
    pub fn select<'b>(&self) -> Db<'b, C> {
        self.derive(Verb::Select)
    }

    /// Derive an insert on the same endpoint.
    #[must_use]
    pub fn insert<'b>(&self) -> Db<'b, C> {
        self.derive(Verb::Insert)
    }

    /// Derive an upsert on the same endpoint.
    #[must_use]
    pub fn upsert<'b>(&self) -> Db<'b, C> {
        self.derive(Verb::Upsert)
    }

    /// Derive an update on the same endpoint.
    #[must_use]
    pub fn update<'b>(&self) -> Db<'b, C> {
        self.derive(Verb::Update)
    }

    /// Derive a delete on the same endpoint.
    #[must_use]
    pub fn delete<'b>(&self) -> Db<'b, C> {
        self.derive(Verb::Delete)
    }
}

/// Insert a header, dropping any value stored under another casing.
fn put_header(headers: &mut HashMap<String, String>, name: &str, value: String) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value);
}

fn take_header(headers: &mut HashMap<String, String>, name: &str) -> Option<String> {
    let key = headers
        .keys()
        .find(|key| key.eq_ignore_ascii_case(name))
        .cloned()?;
    headers.remove(&key)
}

impl<C: HttpClient> Db<'_, C> {
    /// Send the query.
    ///
    /// Returns the [`Outcome`] of completed operations and of conflicts
    /// (HTTP 409, see [`Outcome::db_response`]).
    ///
    /// # Errors
    ///
    /// - [`Error::Serialization`] if the input cannot be encoded,
    /// - [`Error::Signing`] if no token can be signed,
    /// - [`Error::NoVerbSelected`] / [`Error::MissingOutput`] on misuse,
    /// - [`Error::Transport`] if the request cannot be sent,
    /// - [`Error::OutputBinding`] if the body does not fit the output,
    /// - [`Error::Request`] for any other non-success status.
    pub async fn exec(&mut self) -> Result<Outcome> {
        let body = self.input.as_ref().map(|encode| encode()).transpose()?;

        let token = self
            .session
            .tokens()
            .token(&self.role, self.session.token_lifetime())?;

        let Some(verb) = self.verb else {
            return Err(Error::NoVerbSelected);
        };
        let method = verb.method();
        if method == Method::Get && self.output.is_none() {
            return Err(Error::MissingOutput);
        }

        let headers = self.headers(verb, &token, body.is_some());
        let url = self.url();
        debug!(%verb, %method, %url, "dispatching request");

        let client = self.session.client();
        let response = match method {
            Method::Get => client.get(url, headers).await?,
            Method::Post => client.post(url, headers, body).await?,
            Method::Patch => client.patch(url, headers, body).await?,
            Method::Delete => client.delete(url, headers).await?,
        };

        let status = response.status();
        let content_range = match response.header_values(CONTENT_RANGE.as_str()).as_slice() {
            [value] => Some((*value).to_string()),
            _ => None,
        };
        let disposition = classify(method, status, content_range.as_deref());

        if self.debug {
            info!(status, body = %response.text_lossy(), "response received");
        } else {
            debug!(status, ?disposition, ?content_range, "response classified");
        }

        match disposition {
            Disposition::Completed { success } => {
                let range = content_range
                    .as_deref()
                    .map(Range::parse)
                    .unwrap_or_default();
                bind(response.body(), self.output.as_mut()).map_err(Error::output_binding)?;
                Ok(Outcome::completed(status, success, range))
            }
            Disposition::Conflict => Ok(Outcome::conflict(DbResponse::from_body(
                status,
                response.body(),
            ))),
            Disposition::Failed => Err(Error::Request(DbResponse::from_body(
                status,
                response.body(),
            ))),
        }
    }

    fn headers(&self, verb: Verb, token: &str, has_body: bool) -> HashMap<String, String> {
        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in self
            .session
            .default_headers()
            .iter()
            .chain(self.query.headers())
        {
            put_header(&mut headers, name, value.clone());
        }

        if has_body
            && !headers
                .keys()
                .any(|name| name.eq_ignore_ascii_case(CONTENT_TYPE))
        {
            headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
        }

        let extra: &[(&str, &str)] = match verb {
            Verb::Upsert => &[("resolution", "merge-duplicates")],
            _ => &[],
        };
        let raw = take_header(&mut headers, PREFER);
        if let Some(prefer) = self.query.prefer_header(raw.as_deref(), extra) {
            headers.insert(PREFER.to_string(), prefer);
        }

        put_header(&mut headers, AUTHORIZATION, format!("Bearer {token}"));
        headers
    }

    fn url(&self) -> Url {
        let mut url = self.session.base_url().clone();

        if let Some(target) = &self.target {
            let mut path = url.path().trim_end_matches('/').to_string();
            for segment in target.segments().into_iter().filter(|s| !s.is_empty()) {
                path.push('/');
                path.push_str(segment);
            }
            url.set_path(&path);
        }

        let encoded = self.query.encode();
        url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));
        url
    }
}
