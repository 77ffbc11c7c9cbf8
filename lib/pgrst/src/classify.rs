//! Response classification.
//!
//! Maps a PostgREST answer (status code, method, optional `Content-Range`)
//! to a [`Disposition`] and the pagination [`Range`].

use crate::Method;

/// The `Content-Range` value PostgREST sends when an update matched no row.
pub const NOTHING_MATCHED: &str = "*/*";

/// Pagination counters read from `Content-Range: <start>-<end>/<total>`.
///
/// Counters that could not be read stay at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// Index of the first returned row.
    pub start: u64,
    /// Index of the last returned row.
    pub end: u64,
    /// Total row count, when the server computed one.
    pub total: u64,
}

impl Range {
    /// Read a `Content-Range` value.
    ///
    /// Fields are read left to right and reading stops at the first one
    /// that does not match: `0-24/*` yields `start = 0, end = 24, total = 0`,
    /// `bogus` yields all zeros. Malformed values never fail.
    ///
    /// ```
    /// use pgrst::Range;
    ///
    /// let range = Range::parse("0-9/20");
    /// assert_eq!((range.start, range.end, range.total), (0, 9, 20));
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut range = Self::default();
        let mut rest = value.trim();

        let Some((start, tail)) = leading_number(rest) else {
            return range;
        };
        range.start = start;
        rest = tail;

        let Some(tail) = rest.strip_prefix('-') else {
            return range;
        };
        let Some((end, tail)) = leading_number(tail) else {
            return range;
        };
        range.end = end;
        rest = tail;

        let Some(tail) = rest.strip_prefix('/') else {
            return range;
        };
        if let Some((total, _)) = leading_number(tail) {
            range.total = total;
        }

        range
    }
}

fn leading_number(input: &str) -> Option<(u64, &str)> {
    let digits = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, rest) = input.split_at(digits);
    number.parse().ok().map(|value| (value, rest))
}

/// What `exec` does with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// 200, 201, 204 or 206: bind the body. `success` is `false` only for an
    /// update that matched nothing.
    Completed {
        /// Whether the operation affected something.
        success: bool,
    },
    /// 409: a business outcome (such as a unique violation), recorded but
    /// not raised.
    Conflict,
    /// Any other status: raised as a request error.
    Failed,
}

impl Disposition {
    /// Returns `true` for a completed and successful operation.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Completed { success: true })
    }
}

/// Classify a response.
///
/// ```
/// use pgrst::{Disposition, Method, classify};
///
/// assert_eq!(
///     classify(Method::Patch, 204, Some("*/*")),
///     Disposition::Completed { success: false }
/// );
/// assert_eq!(classify(Method::Post, 409, None), Disposition::Conflict);
/// ```
#[must_use]
pub fn classify(method: Method, status: u16, content_range: Option<&str>) -> Disposition {
    match status {
        200 | 201 | 204 | 206 => {
            let success = match method {
                Method::Patch => content_range != Some(NOTHING_MATCHED),
                Method::Get | Method::Post | Method::Delete => true,
            };
            Disposition::Completed { success }
        }
        409 => Disposition::Conflict,
        _ => Disposition::Failed,
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn parse_full_range() {
        check!(
            Range::parse("0-9/20")
                == Range {
                    start: 0,
                    end: 9,
                    total: 20
                }
        );
    }

    #[test]
    fn parse_malformed_range_is_zero() {
        check!(Range::parse("bogus") == Range::default());
        check!(Range::parse("") == Range::default());
        check!(Range::parse(NOTHING_MATCHED) == Range::default());
    }

    #[test]
    fn parse_unknown_total_keeps_bounds() {
        check!(
            Range::parse("0-24/*")
                == Range {
                    start: 0,
                    end: 24,
                    total: 0
                }
        );
    }

    #[test]
    fn parse_stops_at_first_mismatch() {
        check!(Range::parse("5").start == 5);
        check!(Range::parse("5-x/9").end == 0);
        check!(Range::parse("5-x/9").total == 0);
        check!(Range::parse("*/42").total == 0);
    }

    #[test]
    fn success_statuses() {
        for status in [200, 201, 204, 206] {
            for method in [Method::Get, Method::Post, Method::Delete, Method::Patch] {
                check!(classify(method, status, None).is_success());
            }
        }
    }

    #[test]
    fn update_matching_nothing_is_not_successful() {
        check!(
            classify(Method::Patch, 204, Some("*/*")) == Disposition::Completed { success: false }
        );
        check!(
            classify(Method::Patch, 204, Some("0-0/1")) == Disposition::Completed { success: true }
        );
    }

    #[test]
    fn sentinel_only_matters_for_update() {
        check!(classify(Method::Delete, 204, Some("*/*")).is_success());
        check!(classify(Method::Post, 201, Some("*/*")).is_success());
    }

    #[test]
    fn conflict_and_failure() {
        check!(classify(Method::Post, 409, None) == Disposition::Conflict);
        check!(classify(Method::Get, 404, None) == Disposition::Failed);
        check!(classify(Method::Get, 202, None) == Disposition::Failed);
        check!(classify(Method::Patch, 500, Some("*/*")) == Disposition::Failed);
        check!(!Disposition::Conflict.is_success());
    }
}
