//! Error types for expense records

use crate::types::ExpenseId;
use thiserror::Error;

/// Result type for expense operations
pub type Result<T> = std::result::Result<T, Error>;

/// Expense errors
#[derive(Error, Debug)]
pub enum Error {
    /// Expense cannot be split (empty split set, non-positive amount)
    #[error("Invalid expense {expense_id}: {reason}")]
    InvalidExpense {
        /// Offending expense
        expense_id: ExpenseId,
        /// What is wrong with it
        reason: String,
    },

    /// Unsupported currency code
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// Unknown expense category
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

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
