//! Error types for balance and settlement calculation

use expense_core::{Currency, ExpenseId, MemberId};
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid expense record
    #[error("Expense error: {0}")]
    Expense(#[from] expense_core::Error),

    /// Expense references a member missing from the roster
    #[error("Expense {expense_id} references unknown member {member_id}")]
    UnknownMember {
        /// Offending expense
        expense_id: ExpenseId,
        /// Member not found in the roster
        member_id: MemberId,
    },

    /// Expense recorded in a different currency than the rest of the group
    #[error("Expense {expense_id} is in {found}, expected {expected}")]
    CurrencyMismatch {
        /// Offending expense
        expense_id: ExpenseId,
        /// Currency of the first expense
        expected: Currency,
        /// Currency of the offending expense
        found: Currency,
    },

    /// Invariant violation (balances not summing to zero, etc.)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
