//! Error types shared by every subnet operation.

use crate::net::Family;

/// Failures reported by the address-space calculator.
///
/// Every operation is a pure function of its inputs, so an error returned once
/// is returned again for the same input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrError {
    #[error("invalid {what} '{input}': {reason}")]
    Parse {
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("address family mismatch: expected {expected}, got {found}")]
    FamilyMismatch { expected: Family, found: Family },

    #[error("prefix would exceed {width} bits")]
    PrefixOverflow { width: u8 },

    #[error("insufficient address space for {0}")]
    InsufficientSpace(String),

    #[error("host count must be > 0 (got {0})")]
    InvalidHostCount(u64),

    #[error("subnet count must be > 0")]
    InvalidSubnetCount,

    #[error("invalid prefix length {0} for IPv4 embedding; allowed: 32, 40, 48, 56, 64, 96")]
    InvalidEmbeddingPrefix(u8),

    #[error("{operation} is not supported for {family} networks")]
    Unsupported {
        operation: &'static str,
        family: Family,
    },
}

impl CidrError {
    pub(crate) fn parse(what: &'static str, input: &str, reason: impl ToString) -> Self {
        CidrError::Parse {
            what,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CidrError>;
