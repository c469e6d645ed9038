//! Errors raised by the core primitives themselves.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failure of a core primitive: parsing an `Amount` or an id, checking an
/// expected version, or a counter running out of room.
///
/// Marketplace rejections (unknown item, sold item, short payment) are not
/// here; they belong to `MarketError`, which wraps this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input text did not describe a valid value, e.g. a negative amount.
    #[error("validation failed: {0}")]
    Validation(String),

    /// State the aggregate guarantees could not be kept, e.g. id exhaustion.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Text did not parse as an account or aggregate id.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// An aggregate was at a different version than the caller expected.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountId, Amount, ExpectedVersion};

    #[test]
    fn each_kind_comes_from_a_core_primitive() {
        assert!(matches!(
            "-1".parse::<Amount>(),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            "not-a-uuid".parse::<AccountId>(),
            Err(DomainError::InvalidId(_))
        ));
        assert!(matches!(
            ExpectedVersion::Exact(2).check(3),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn display_prefixes_the_kind() {
        assert_eq!(
            DomainError::invariant("item id space exhausted").to_string(),
            "invariant violated: item id space exhausted"
        );
        assert_eq!(DomainError::conflict("stale").to_string(), "conflict: stale");
    }
}
