//! Balance Settlement Engine
//!
//! Turns a group's shared expenses into per-member net balances and a short
//! list of member-to-member transfers that settle them.
//!
//! # Architecture
//!
//! Data flows one way, every step a pure function of its input:
//!
//! 1. **Balances**: Fold expenses into one net balance per member
//! 2. **Matching**: Pair debtors with creditors, greedy and in input order
//! 3. **Reporting**: Totals per category, per month and per member
//!
//! Loading expenses and members, rendering and persistence belong to the
//! caller.
//!
//! # Example
//!
//! ```
//! use balance_settlement::{calculate_balances, calculate_settlements};
//! use chrono::Utc;
//! use expense_core::{Currency, Expense, ExpenseCategory, ExpenseId, GroupId, Member, MemberId};
//! use rust_decimal::Decimal;
//!
//! let members = vec![Member::new("x", "Xavi"), Member::new("y", "Yara")];
//! let expenses = vec![Expense {
//!     id: ExpenseId::new("e1"),
//!     group_id: GroupId::new("g1"),
//!     title: "Groceries".to_string(),
//!     amount: Decimal::new(4000, 2),
//!     currency: Currency::USD,
//!     paid_by: MemberId::new("x"),
//!     split_between: vec![MemberId::new("x"), MemberId::new("y")],
//!     category: ExpenseCategory::Food,
//!     date: Utc::now(),
//!     description: None,
//! }];
//!
//! let balances = calculate_balances(&expenses, &members)?;
//! let settlements = calculate_settlements(&balances);
//!
//! assert_eq!(settlements.len(), 1);
//! assert_eq!(settlements[0].from, MemberId::new("y"));
//! assert_eq!(settlements[0].amount, Decimal::new(2000, 2));
//! # Ok::<(), balance_settlement::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod balance;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod report;
pub mod types;

// Re-exports
pub use balance::{calculate_balances, BalanceCalculator};
pub use config::{Config, MemberPolicy};
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use matcher::{apply_settlements, calculate_settlements, check_zero_sum, SettlementMatcher};
pub use report::{
    monthly_totals, total_expenses, totals_by_category, user_net_total, user_owed_total,
    user_paid_total,
};
pub use types::*;
