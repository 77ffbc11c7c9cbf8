//! Result of an executed query.

use crate::{DbResponse, Disposition, Range};

/// What `exec` observed once the response was classified.
///
/// Returned for every response that is not raised as an error: completed
/// operations and conflicts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    status: u16,
    success: bool,
    range: Range,
    db_response: Option<DbResponse>,
}

impl Outcome {
    pub(crate) fn completed(status: u16, success: bool, range: Range) -> Self {
        Self {
            status,
            success,
            range,
            db_response: None,
        }
    }

    pub(crate) fn conflict(record: DbResponse) -> Self {
        Self {
            status: record.http_status_code,
            success: false,
            range: Range::default(),
            db_response: Some(record),
        }
    }

    /// Returns `true` if the operation completed and affected something.
    ///
    /// An update whose filter matched no row completes without success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns `true` for a 409 answer; see [`db_response`](Self::db_response).
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        self.db_response.is_some()
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Total row count from `Content-Range`, zero when absent.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.range.total
    }

    /// First and last row indexes from `Content-Range`, zero when absent.
    #[must_use]
    pub const fn range(&self) -> (u64, u64) {
        (self.range.start, self.range.end)
    }

    /// Full pagination counters.
    #[must_use]
    pub const fn content_range(&self) -> Range {
        self.range
    }

    /// Error record sent with a conflict.
    #[must_use]
    pub const fn db_response(&self) -> Option<&DbResponse> {
        self.db_response.as_ref()
    }

    /// Disposition this outcome was built from.
    #[must_use]
    pub const fn disposition(&self) -> Disposition {
        if self.db_response.is_some() {
            Disposition::Conflict
        } else {
            Disposition::Completed {
                success: self.success,
            }
        }
    }
}
