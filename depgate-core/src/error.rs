//! Error types.
//!
//! Every failure is a contract violation by the caller, detected before the
//! registry is touched.

use thiserror::Error;

/// A precondition of `run_effect` that the caller broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// The identifier was falsy.
    #[error("must specify an effect identifier")]
    MissingIdentifier,

    /// Dependencies were neither an array nor null/undefined.
    #[error("`dependencies` must be an array, or null/undefined (got {0})")]
    DependenciesNotSequence(&'static str),

    /// The action was not a function.
    #[error("`action` must be a function (got {0})")]
    ActionNotCallable(&'static str),

    /// The comparator was not a function.
    #[error("`comparator` must be a function (got {0})")]
    ComparatorNotCallable(&'static str),
}

/// Errors returned by the effect registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A precondition was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}

/// Result alias for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_distinct() {
        let messages = [
            Error::from(InvalidArgument::MissingIdentifier).to_string(),
            Error::from(InvalidArgument::DependenciesNotSequence("number")).to_string(),
            Error::from(InvalidArgument::ActionNotCallable("string")).to_string(),
            Error::from(InvalidArgument::ComparatorNotCallable("null")).to_string(),
        ];

        for (i, a) in messages.iter().enumerate() {
            assert!(a.starts_with("invalid argument: "));
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn message_names_offending_type() {
        let err = Error::from(InvalidArgument::DependenciesNotSequence("string"));
        assert!(err.to_string().contains("got string"));
    }
}
