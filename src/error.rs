//! Failures produced by [`Join`](crate::concurrent::Join).
//!
//! A join can fail for two reasons: one of its inputs rejected, or the
//! continuation itself rejected. Both carry the original reason untouched.

use std::fmt;

use thiserror::Error;

/// Error returned by a failed join.
///
/// # Examples
///
/// ```
/// use conjoin::{JoinError, FailureOrigin};
///
/// let err: JoinError<&str> = JoinError::Input("bad");
/// assert_eq!(err.origin(), FailureOrigin::Input);
/// assert_eq!(err.into_reason(), "bad");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum JoinError<E> {
    /// The first input future (or decorated input) to fail.
    #[error("join input failed: {0}")]
    Input(E),
    /// The continuation returned an error or a rejected future.
    #[error("join continuation failed: {0}")]
    Continuation(E),
}

impl<E> JoinError<E> {
    /// Where the failure came from.
    pub const fn origin(&self) -> FailureOrigin {
        match self {
            JoinError::Input(_) => FailureOrigin::Input,
            JoinError::Continuation(_) => FailureOrigin::Continuation,
        }
    }

    /// Returns `true` if an input rejected before the continuation ran.
    #[inline]
    pub const fn is_input(&self) -> bool {
        matches!(self, JoinError::Input(_))
    }

    /// Returns `true` if the continuation itself failed.
    #[inline]
    pub const fn is_continuation(&self) -> bool {
        matches!(self, JoinError::Continuation(_))
    }

    /// Borrows the original rejection reason.
    pub fn reason(&self) -> &E {
        match self {
            JoinError::Input(e) | JoinError::Continuation(e) => e,
        }
    }

    /// Consumes the error, returning the original rejection reason.
    pub fn into_reason(self) -> E {
        match self {
            JoinError::Input(e) | JoinError::Continuation(e) => e,
        }
    }

    /// Maps the rejection reason, keeping the origin.
    pub fn map_reason<E2, F>(self, f: F) -> JoinError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            JoinError::Input(e) => JoinError::Input(f(e)),
            JoinError::Continuation(e) => JoinError::Continuation(f(e)),
        }
    }
}

/// The fault origin of a join failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureOrigin {
    /// An input (possibly decorated) rejected.
    Input,
    /// The continuation rejected.
    Continuation,
}

impl fmt::Display for FailureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureOrigin::Input => write!(f, "input"),
            FailureOrigin::Continuation => write!(f, "continuation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_is_kept_verbatim() {
        let err = JoinError::Continuation(String::from("boom"));
        assert_eq!(err.reason(), "boom");
        assert!(err.is_continuation());
        assert!(!err.is_input());
        assert_eq!(err.into_reason(), "boom");
    }

    #[test]
    fn test_map_reason_keeps_origin() {
        let err: JoinError<u32> = JoinError::Input(7);
        let mapped = err.map_reason(|code| format!("code {code}"));
        assert_eq!(mapped, JoinError::Input("code 7".to_string()));
    }

    #[test]
    fn test_display_names_origin() {
        let err: JoinError<&str> = JoinError::Input("bad");
        assert_eq!(err.to_string(), "join input failed: bad");

        let err: JoinError<&str> = JoinError::Continuation("worse");
        assert_eq!(err.to_string(), "join continuation failed: worse");
        assert_eq!(err.origin().to_string(), "continuation");
    }
}
