//! Core types for balance and settlement calculation

use chrono::{DateTime, Utc};
use expense_core::{Currency, Expense, ExpenseCategory, Group, GroupId, Member, MemberId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Round a money amount half away from zero
pub fn round_money(amount: Decimal, decimal_places: u32) -> Decimal {
    amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Net position of one member
///
/// Positive: the group owes the member. Negative: the member owes the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Member
    pub member_id: MemberId,

    /// Net amount
    pub amount: Decimal,

    /// Currency
    pub currency: Currency,
}

impl Balance {
    /// Create new balance
    pub fn new(member_id: impl Into<String>, amount: Decimal, currency: Currency) -> Self {
        Self {
            member_id: MemberId::new(member_id),
            amount,
            currency,
        }
    }

    /// Check if member owes money
    pub fn is_debtor(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Check if member is owed money
    pub fn is_creditor(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// Suggested transfer between two members
///
/// Not a record of a real payment; recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedSettlement {
    /// Member who pays
    pub from: MemberId,

    /// Member who receives
    pub to: MemberId,

    /// Amount to transfer
    pub amount: Decimal,

    /// Currency
    pub currency: Currency,
}

/// Expense totals per category, in first-seen category order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals(Vec<(ExpenseCategory, Decimal)>);

impl CategoryTotals {
    /// Add `amount` to `category`
    pub fn add(&mut self, category: ExpenseCategory, amount: Decimal) {
        match self.0.iter_mut().find(|(c, _)| *c == category) {
            Some((_, total)) => *total = total.saturating_add(amount),
            None => self.0.push((category, amount)),
        }
    }

    /// Total for `category`, if any expense had it
    pub fn get(&self, category: ExpenseCategory) -> Option<Decimal> {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, total)| *total)
    }

    /// Iterate in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, Decimal)> + '_ {
        self.0.iter().copied()
    }

    /// Number of categories seen
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no category was seen
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, total) in &self.0 {
            map.serialize_entry(category, total)?;
        }
        map.end()
    }
}

/// Everything a caller needs to load before summarizing a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// Group document
    pub group: Group,

    /// Member documents
    pub members: Vec<Member>,

    /// Expense documents
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// Balance labelled for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceLine {
    /// Member
    pub member_id: MemberId,

    /// Display name ("Unknown" when not in the roster)
    pub display_name: String,

    /// Net amount
    pub amount: Decimal,

    /// Currency of the amount
    pub currency: Currency,
}

/// Settlement labelled for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementLine {
    /// Member who pays
    pub from: MemberId,

    /// Payer display name
    pub from_name: String,

    /// Member who receives
    pub to: MemberId,

    /// Receiver display name
    pub to_name: String,

    /// Amount to transfer
    pub amount: Decimal,

    /// Currency of the amount
    pub currency: Currency,
}

/// Group summary used by export views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReport {
    /// Group
    pub group_id: GroupId,

    /// Group name
    pub group_name: String,

    /// Group currency
    pub currency: Currency,

    /// Display symbol for `currency`
    pub currency_symbol: String,

    /// Sum of all expenses
    pub total_expenses: Decimal,

    /// Number of expenses
    pub expense_count: usize,

    /// Number of members in the roster
    pub member_count: usize,

    /// Per-member balances
    pub balances: Vec<BalanceLine>,

    /// Totals per category
    pub category_totals: CategoryTotals,

    /// Totals per calendar month (`YYYY-MM`)
    pub monthly_totals: BTreeMap<String, Decimal>,

    /// Suggested transfers
    pub settlements: Vec<SettlementLine>,

    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl GroupReport {
    /// Sum of all suggested transfers
    pub fn total_settled(&self) -> Decimal {
        self.settlements
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(0.025), 2), dec!(0.03));
        assert_eq!(round_money(dec!(-0.025), 2), dec!(-0.03));
        assert_eq!(round_money(dec!(0.035), 2), dec!(0.04));
        assert_eq!(round_money(dec!(33.3333333), 2), dec!(33.33));
        assert_eq!(round_money(dec!(-66.6666667), 2), dec!(-66.67));
    }

    #[test]
    fn test_balance_sign() {
        let owed = Balance::new("alice", dec!(12.50), Currency::USD);
        let owes = Balance::new("bob", dec!(-12.50), Currency::USD);
        let even = Balance::new("carol", Decimal::ZERO, Currency::USD);

        assert!(owed.is_creditor() && !owed.is_debtor());
        assert!(owes.is_debtor() && !owes.is_creditor());
        assert!(!even.is_debtor() && !even.is_creditor());
    }

    #[test]
    fn test_category_totals_keep_first_seen_order() {
        let mut totals = CategoryTotals::default();
        totals.add(ExpenseCategory::Rent, dec!(500));
        totals.add(ExpenseCategory::Food, dec!(10));
        totals.add(ExpenseCategory::Rent, dec!(20));

        let order: Vec<ExpenseCategory> = totals.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![ExpenseCategory::Rent, ExpenseCategory::Food]);
        assert_eq!(totals.get(ExpenseCategory::Rent), Some(dec!(520)));
        assert_eq!(totals.get(ExpenseCategory::Health), None);

        let json = serde_json::to_string(&totals).unwrap();
        assert_eq!(json, r#"{"rent":"520","food":"10"}"#);
    }
}
