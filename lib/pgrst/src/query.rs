//! Query-parameter accumulation.
//!
//! A [`Query`] collects everything a builder chain adds before `exec`:
//! multi-valued URL parameters (`select`, filters, `limit`, ...), single
//! header overrides, and `Prefer` preferences such as `count=exact`.
//!
//! # Example
//!
//! ```
//! use pgrst::{Filter, Query};
//!
//! let mut query = Query::new();
//! query
//!     .filter("age", Filter::GreaterThanOrEqual, "18")
//!     .filter_in("status", ["active", "pending"]);
//!
//! assert_eq!(query.values("age"), ["gte.18"]);
//! assert_eq!(query.values("status"), ["in.(active,pending)"]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use derive_more::Display;

/// Comparison operator of a column filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Filter {
    /// `eq`: column equals the literal.
    #[display("eq")]
    Equal,
    /// `gt`: column is greater than the literal.
    #[display("gt")]
    GreaterThan,
    /// `gte`: column is greater than or equal to the literal.
    #[display("gte")]
    GreaterThanOrEqual,
    /// `lt`: column is less than the literal.
    #[display("lt")]
    LessThan,
    /// `lte`: column is less than or equal to the literal.
    #[display("lte")]
    LessThanOrEqual,
    /// `neq`: column differs from the literal.
    #[display("neq")]
    NotEqual,
}

/// Counting strategy requested through `Prefer: count=<mode>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum CountMode {
    /// Exact `count(*)`; slow on large tables.
    #[display("exact")]
    Exact,
    /// Planner estimate.
    #[display("planned")]
    Planned,
    /// Exact below the server's `max-rows`, planned above.
    #[display("estimated")]
    Estimated,
}

/// Accumulated query parameters, header overrides, and preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, Vec<String>>,
    headers: BTreeMap<String, String>,
    preferences: BTreeMap<String, String>,
}

impl Query {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when nothing was accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.headers.is_empty() && self.preferences.is_empty()
    }

    /// Append a value to a query parameter.
    ///
    /// Values of one key keep their insertion order.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Set a header, replacing any previous value.
    ///
    /// Names compare case-insensitively; the latest call keeps its casing.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Set a `Prefer` preference, replacing any previous value of that key.
    pub fn prefer(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.preferences.insert(key.into(), value.into());
        self
    }

    /// Add a `field=<op>.<literal>` filter.
    pub fn filter(&mut self, field: impl Into<String>, op: Filter, value: &str) -> &mut Self {
        self.add(field, format!("{op}.{value}"))
    }

    /// Add a `field=in.(a,b,c)` membership filter.
    pub fn filter_in<I, V>(&mut self, field: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let joined = values
            .into_iter()
            .map(|value| value.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(",");
        self.add(field, format!("in.({joined})"))
    }

    /// Add a `select` parameter listing the requested columns.
    pub fn columns<I, V>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let joined = columns
            .into_iter()
            .map(|column| column.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(",");
        self.add("select", joined)
    }

    /// Add a `limit` parameter.
    pub fn limit(&mut self, limit: usize) -> &mut Self {
        self.add("limit", limit.to_string())
    }

    /// Add an `offset` parameter.
    pub fn offset(&mut self, offset: usize) -> &mut Self {
        self.add("offset", offset.to_string())
    }

    /// Request a row count with the given strategy.
    pub fn count(&mut self, mode: CountMode) -> &mut Self {
        self.prefer("count", mode.to_string())
    }

    /// Values of a query parameter, in insertion order.
    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.params.get(key).map_or(&[], Vec::as_slice)
    }

    /// Header overrides.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// `Prefer` preferences, keyed by preference name.
    #[must_use]
    pub fn preferences(&self) -> &BTreeMap<String, String> {
        &self.preferences
    }

    /// Render the preferences as a `Prefer` header value, if there are any.
    ///
    /// The accumulated preferences come first, then the comma-separated
    /// entries of `raw` (a `Prefer` header set by hand), then `extra`.
    /// An entry whose key was already rendered is skipped.
    #[must_use]
    pub fn prefer_header(&self, raw: Option<&str>, extra: &[(&str, &str)]) -> Option<String> {
        let mut rendered: Vec<String> = Vec::new();
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut push = |key: &str, entry: String| {
            if seen.insert(key.trim().to_ascii_lowercase()) {
                rendered.push(entry);
            }
        };

        for (key, value) in &self.preferences {
            push(key, format!("{key}={value}"));
        }
        for entry in raw
            .into_iter()
            .flat_map(|raw| raw.split(','))
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
        {
            let key = entry.split_once('=').map_or(entry, |(key, _)| key);
            push(key, entry.to_string());
        }
        for (key, value) in extra {
            push(key, format!("{key}={value}"));
        }

        (!rendered.is_empty()).then(|| rendered.join(","))
    }

    /// URL-encode the parameters as `key=value&...`.
    ///
    /// Keys are emitted in sorted order; values of one key keep their
    /// insertion order.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.params {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}
