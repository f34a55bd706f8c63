//! Expense Core
//!
//! Plain-data records for shared group expenses: members, groups, expenses
//! and the categories and currencies they are recorded in.
//!
//! # Invariants
//!
//! - An expense is immutable once recorded
//! - Every expense is split between at least one member
//! - Amounts are exact decimals in the expense currency

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    Currency, Expense, ExpenseCategory, ExpenseId, Group, GroupId, Member, MemberId,
};
