//! Output destinations and response body binding.
//!
//! A query writes its response body into one of three destination shapes:
//!
//! - [`Output::Text`]: the raw body as a string,
//! - [`Output::Rows`]: a JSON array decoded into a sequence,
//! - [`Output::Row`]: the single element of a one-element JSON array.
//!
//! PostgREST always answers table reads with an array, even when the filter
//! selects one row; [`Output::Row`] unwraps that array and ignores answers
//! with zero or several rows instead of failing.
//!
//! # Example
//!
//! ```
//! use pgrst::{Output, bind};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize, PartialEq)]
//! struct Todo {
//!     id: u32,
//!     task: String,
//! }
//!
//! let mut todo = Todo::default();
//! bind(br#"[{"id":1,"task":"write docs"}]"#, Some(&mut Output::row(&mut todo)))?;
//! assert_eq!(todo.id, 1);
//!
//! let mut todos: Vec<Todo> = Vec::new();
//! bind(br#"[{"id":1,"task":"a"},{"id":2,"task":"b"}]"#, Some(&mut Output::rows(&mut todos)))?;
//! assert_eq!(todos.len(), 2);
//! # Ok::<(), pgrst::Error>(())
//! ```

use std::fmt;

use serde::de::DeserializeOwned;

use crate::{Result, from_json, to_json};

/// Destination receiving a whole JSON array.
pub trait SequenceSink: Send {
    /// Replace the content with the decoded array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) when `body` is not a
    /// matching JSON array.
    fn fill(&mut self, body: &[u8]) -> Result<()>;
}

impl<T> SequenceSink for Vec<T>
where
    T: DeserializeOwned + Send,
{
    fn fill(&mut self, body: &[u8]) -> Result<()> {
        *self = from_json(body)?;
        Ok(())
    }
}

/// Destination receiving a single JSON record.
pub trait RecordSink: Send {
    /// Replace the content with the decoded record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) when `record` does not
    /// match the destination type.
    fn fill(&mut self, record: &[u8]) -> Result<()>;
}

impl<T> RecordSink for T
where
    T: DeserializeOwned + Send,
{
    fn fill(&mut self, record: &[u8]) -> Result<()> {
        *self = from_json(record)?;
        Ok(())
    }
}

/// Where a query writes its response body.
pub enum Output<'a> {
    /// Raw body as text.
    Text(&'a mut String),
    /// Whole JSON array.
    Rows(&'a mut dyn SequenceSink),
    /// Single element of a one-element JSON array.
    Row(&'a mut dyn RecordSink),
}

impl fmt::Debug for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Rows(_) => f.write_str("Rows(..)"),
            Self::Row(_) => f.write_str("Row(..)"),
        }
    }
}

impl<'a> Output<'a> {
    /// Write the body into a string.
    pub fn text(text: &'a mut String) -> Self {
        Self::Text(text)
    }

    /// Decode the body as a sequence.
    pub fn rows(rows: &'a mut impl SequenceSink) -> Self {
        Self::Rows(rows)
    }

    /// Decode the single row of the body.
    pub fn row(row: &'a mut impl RecordSink) -> Self {
        Self::Row(row)
    }
}

/// Write a response body into a destination.
///
/// An empty body, a JSON `null` body, or a missing destination is a no-op.
///
/// # Errors
///
/// Returns [`Error::Decode`](crate::Error::Decode) when the body does not
/// match the destination shape.
pub fn bind(body: &[u8], output: Option<&mut Output<'_>>) -> Result<()> {
    let Some(output) = output else {
        return Ok(());
    };
    if body.is_empty() || body.trim_ascii() == b"null" {
        return Ok(());
    }

    match output {
        Output::Text(text) => **text = String::from_utf8_lossy(body).into_owned(),
        Output::Rows(rows) => rows.fill(body)?,
        Output::Row(row) => {
            let records: Vec<serde_json::Value> = from_json(body)?;
            if let [record] = records.as_slice() {
                row.fill(&to_json(record)?)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};
    use serde::Deserialize;

    use super::*;
    use crate::Error;

    #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
    struct Item {
        id: u32,
        name: String,
    }

    fn item(id: u32, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn single_row_is_unwrapped() {
        let mut row = Item::default();
        bind(br#"[{"id":1,"name":"a"}]"#, Some(&mut Output::row(&mut row))).expect("bound");

        check!(row == item(1, "a"));
    }

    #[test]
    fn zero_or_many_rows_leave_record_untouched() {
        let mut row = item(9, "kept");

        bind(b"[]", Some(&mut Output::row(&mut row))).expect("no-op");
        check!(row == item(9, "kept"));

        bind(
            br#"[{"id":1,"name":"a"},{"id":2,"name":"b"}]"#,
            Some(&mut Output::row(&mut row)),
        )
        .expect("no-op");
        check!(row == item(9, "kept"));
    }

    #[test]
    fn sequence_receives_every_row() {
        let mut rows = vec![item(9, "stale")];
        bind(
            br#"[{"id":1,"name":"a"},{"id":2,"name":"b"}]"#,
            Some(&mut Output::rows(&mut rows)),
        )
        .expect("bound");

        check!(rows == vec![item(1, "a"), item(2, "b")]);
    }

    #[test]
    fn record_can_be_a_map() {
        let mut row: HashMap<String, serde_json::Value> = HashMap::new();
        bind(br#"[{"id":1,"name":"a"}]"#, Some(&mut Output::row(&mut row))).expect("bound");

        check!(row.get("id") == Some(&serde_json::json!(1)));
    }

    #[test]
    fn text_takes_raw_body() {
        let mut text = String::new();
        bind(br#"{"now":"2024-01-01"}"#, Some(&mut Output::text(&mut text))).expect("bound");

        check!(text == r#"{"now":"2024-01-01"}"#);
    }

    #[test]
    fn text_ignores_literal_null() {
        let mut text = "previous".to_string();
        bind(b"null", Some(&mut Output::text(&mut text))).expect("bound");

        check!(text == "previous");
    }

    #[test]
    fn null_body_leaves_rows_and_record_untouched() {
        let mut rows = vec![item(1, "a")];
        bind(b"null", Some(&mut Output::rows(&mut rows))).expect("no-op");
        check!(rows == vec![item(1, "a")]);

        let mut row = item(9, "kept");
        bind(b"null\n", Some(&mut Output::row(&mut row))).expect("no-op");
        check!(row == item(9, "kept"));
    }

    #[test]
    fn missing_body_or_destination_is_noop() {
        bind(br#"[{"id":1,"name":"a"}]"#, None).expect("no destination");

        let mut rows: Vec<Item> = Vec::new();
        bind(b"", Some(&mut Output::rows(&mut rows))).expect("no body");
        check!(rows.is_empty());
    }

    #[test]
    fn shape_mismatch_is_a_decode_error() {
        let mut rows: Vec<Item> = Vec::new();
        let_assert!(
            Err(Error::Decode { path, .. }) =
                bind(br#"[{"id":"x","name":"a"}]"#, Some(&mut Output::rows(&mut rows)))
        );
        check!(path == "[0].id");

        let mut row = Item::default();
        let_assert!(
            Err(Error::Decode { .. }) = bind(br#"{"id":1}"#, Some(&mut Output::row(&mut row)))
        );
        let_assert!(
            Err(Error::Decode { path, .. }) =
                bind(br#"[{"id":1}]"#, Some(&mut Output::row(&mut row)))
        );
        check!(path == ".");
    }

    #[test]
    fn output_is_debug() {
        let mut rows: Vec<Item> = Vec::new();
        check!(format!("{:?}", Output::rows(&mut rows)) == "Rows(..)");
    }
}
