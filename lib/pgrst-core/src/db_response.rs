//! Structured error record returned by PostgREST.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error body sent by the API on a conflict or failure status.
///
/// PostgREST answers failures with `{code, details, hint, message}`. The
/// HTTP status code is not part of that body; it is filled in after decoding
/// so that the record is self-describing once detached from the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbResponse {
    /// PostgreSQL or PostgREST error code (e.g. `23505`, `PGRST116`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Additional details about the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Hint on how to fix the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTTP status of the response that carried this record.
    #[serde(rename = "httpStatusCode", skip_serializing_if = "is_zero")]
    pub http_status_code: u16,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(value: &u16) -> bool {
    *value == 0
}

impl DbResponse {
    /// Decode an error body, falling back to an empty record when the body
    /// is not a PostgREST error object, then stamp the HTTP status.
    #[must_use]
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let mut record: Self = crate::from_json(body).unwrap_or_default();
        record.http_status_code = status;
        record
    }

    /// Returns `true` if the record carries a non-empty error code.
    #[must_use]
    pub fn has_code(&self) -> bool {
        self.code.as_deref().is_some_and(|code| !code.is_empty())
    }

    /// Error code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Error message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Renders the record as compact JSON.
impl fmt::Display for DbResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn from_body_decodes_postgrest_error() {
        let body = br#"{"code":"23505","details":"Key (id)=(1) already exists.","hint":null,"message":"duplicate key"}"#;
        let record = DbResponse::from_body(409, body);

        check!(record.code() == Some("23505"));
        check!(record.message() == Some("duplicate key"));
        check!(record.hint.is_none());
        check!(record.http_status_code == 409);
        check!(record.has_code());
    }

    #[test]
    fn from_body_tolerates_garbage() {
        let record = DbResponse::from_body(502, b"<html>Bad Gateway</html>");

        check!(record == DbResponse {
            http_status_code: 502,
            ..DbResponse::default()
        });
        check!(!record.has_code());
    }

    #[test]
    fn empty_code_is_not_a_code() {
        let record = DbResponse {
            code: Some(String::new()),
            ..DbResponse::default()
        };
        check!(!record.has_code());
    }

    #[test]
    fn display_is_compact_json() {
        let record = DbResponse {
            code: Some("PGRST116".to_string()),
            message: Some("JSON object requested, multiple rows returned".to_string()),
            http_status_code: 406,
            ..DbResponse::default()
        };

        assert_eq!(
            record.to_string(),
            r#"{"code":"PGRST116","message":"JSON object requested, multiple rows returned","httpStatusCode":406}"#
        );
        assert_eq!(DbResponse::default().to_string(), "{}");
    }
}
