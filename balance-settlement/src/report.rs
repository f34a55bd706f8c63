//! Aggregate reporters
//!
//! Read-only folds over an expense list for summary and export views.
//! All of them are total: an empty list yields zero or an empty map, and
//! sums saturate at `Decimal::MAX` instead of overflowing.

use crate::types::{round_money, CategoryTotals};
use expense_core::{Expense, MemberId};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Sum of all expense amounts
pub fn total_expenses(expenses: &[Expense]) -> Decimal {
    expenses
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

/// Sum per category, in first-seen category order
pub fn totals_by_category(expenses: &[Expense]) -> CategoryTotals {
    let mut totals = CategoryTotals::default();
    for expense in expenses {
        totals.add(expense.category, expense.amount);
    }
    totals
}

/// Sum of amounts `member` paid
pub fn user_paid_total(expenses: &[Expense], member: &MemberId) -> Decimal {
    expenses
        .iter()
        .filter(|e| &e.paid_by == member)
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

/// Sum of the shares `member` owes, rounded to cents at the end
pub fn user_owed_total(expenses: &[Expense], member: &MemberId) -> Decimal {
    let owed: Decimal = expenses
        .iter()
        .filter(|e| e.is_shared_by(member))
        .map(|e| e.amount / Decimal::from(e.participants().len()))
        .fold(Decimal::ZERO, Decimal::saturating_add);
    round_money(owed, 2)
}

/// What `member` paid minus what they owe
pub fn user_net_total(expenses: &[Expense], member: &MemberId) -> Decimal {
    user_paid_total(expenses, member).saturating_sub(user_owed_total(expenses, member))
}

/// Sum per calendar month, keyed `YYYY-MM` (UTC)
pub fn monthly_totals(expenses: &[Expense]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        let total = totals.entry(expense.month_key()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(expense.amount);
    }
    totals
}
