//! Balance calculation
//!
//! Folds a group's expenses into one net balance per member.
//!
//! # Algorithm
//!
//! 1. Start every roster member at zero
//! 2. Credit each expense's full amount to its payer
//! 3. Debit each participant an equal, unrounded share
//! 4. Round once, at the end
//!
//! # Example
//!
//! ```text
//! Expense: 90.00 paid by X, split between X, Y, Z (share 30.00)
//!
//!   X: +90 - 30 = +60
//!   Y:       -30 = -30
//!   Z:       -30 = -30
//! ```
//!
//! Balances always sum to zero before rounding.

use crate::{
    config::MemberPolicy,
    types::{round_money, Balance},
    Error, Result,
};
use expense_core::{Currency, Expense, Member, MemberId};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Balance calculator
#[derive(Debug, Clone)]
pub struct BalanceCalculator {
    /// Unknown member handling
    member_policy: MemberPolicy,

    /// Output rounding
    decimal_places: u32,

    /// Currency when there are no expenses
    default_currency: Currency,
}

impl Default for BalanceCalculator {
    fn default() -> Self {
        Self::new(MemberPolicy::Strict, 2, Currency::USD)
    }
}

impl BalanceCalculator {
    /// Create new balance calculator
    pub fn new(
        member_policy: MemberPolicy,
        decimal_places: u32,
        default_currency: Currency,
    ) -> Self {
        Self {
            member_policy,
            decimal_places,
            default_currency,
        }
    }

    /// Use `currency` for balances when there are no expenses
    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    /// Compute rounded balances, one per roster member in roster order
    pub fn calculate(&self, expenses: &[Expense], members: &[Member]) -> Result<Vec<Balance>> {
        let balances = self
            .calculate_raw(expenses, members)?
            .into_iter()
            .map(|b| Balance {
                amount: round_money(b.amount, self.decimal_places),
                ..b
            })
            .collect();
        Ok(balances)
    }

    /// Compute unrounded balances
    pub fn calculate_raw(&self, expenses: &[Expense], members: &[Member]) -> Result<Vec<Balance>> {
        let currency = expenses
            .first()
            .map(|e| e.currency)
            .unwrap_or(self.default_currency);

        let mut sheet = BalanceSheet::new(members);

        for expense in expenses {
            let share = expense.share()?;
            self.check_currency(expense, currency)?;

            let paid = self.slot(&mut sheet, expense, &expense.paid_by)?;
            *paid = checked(paid.checked_add(expense.amount), expense)?;

            for participant in expense.participants() {
                let owed = self.slot(&mut sheet, expense, participant)?;
                *owed = checked(owed.checked_sub(share), expense)?;
            }
        }

        tracing::debug!(
            expenses = expenses.len(),
            members = sheet.order.len(),
            "Calculated balances"
        );

        Ok(sheet.into_balances(currency))
    }

    fn check_currency(&self, expense: &Expense, expected: Currency) -> Result<()> {
        if expense.currency == expected {
            return Ok(());
        }
        match self.member_policy {
            MemberPolicy::Strict => Err(Error::CurrencyMismatch {
                expense_id: expense.id.clone(),
                expected,
                found: expense.currency,
            }),
            MemberPolicy::Extend => {
                tracing::warn!(
                    expense_id = %expense.id,
                    "Adding {} amount into {} balances",
                    expense.currency,
                    expected
                );
                Ok(())
            }
        }
    }

    fn slot<'a>(
        &self,
        sheet: &'a mut BalanceSheet,
        expense: &Expense,
        member: &MemberId,
    ) -> Result<&'a mut Decimal> {
        if !sheet.contains(member) {
            match self.member_policy {
                MemberPolicy::Strict => {
                    return Err(Error::UnknownMember {
                        expense_id: expense.id.clone(),
                        member_id: member.clone(),
                    });
                }
                MemberPolicy::Extend => {
                    tracing::warn!(
                        expense_id = %expense.id,
                        member_id = %member,
                        "Expense references member outside the roster"
                    );
                    sheet.insert(member.clone());
                }
            }
        }
        sheet.get_mut(member).ok_or_else(|| {
            Error::InvariantViolation(format!("No balance slot for member {}", member))
        })
    }
}

fn checked(amount: Option<Decimal>, expense: &Expense) -> Result<Decimal> {
    amount.ok_or_else(|| {
        Error::InvariantViolation(format!("Balance overflow applying expense {}", expense.id))
    })
}

/// Running balances keyed by member, in insertion order
struct BalanceSheet {
    order: Vec<MemberId>,
    index: HashMap<MemberId, usize>,
    amounts: Vec<Decimal>,
}

impl BalanceSheet {
    fn new(members: &[Member]) -> Self {
        let mut sheet = Self {
            order: Vec::with_capacity(members.len()),
            index: HashMap::with_capacity(members.len()),
            amounts: Vec::with_capacity(members.len()),
        };
        for member in members {
            if !sheet.contains(&member.id) {
                sheet.insert(member.id.clone());
            }
        }
        sheet
    }

    fn contains(&self, member: &MemberId) -> bool {
        self.index.contains_key(member)
    }

    fn insert(&mut self, member: MemberId) {
        self.index.insert(member.clone(), self.order.len());
        self.order.push(member);
        self.amounts.push(Decimal::ZERO);
    }

    fn get_mut(&mut self, member: &MemberId) -> Option<&mut Decimal> {
        let idx = *self.index.get(member)?;
        self.amounts.get_mut(idx)
    }

    fn into_balances(self, currency: Currency) -> Vec<Balance> {
        self.order
            .into_iter()
            .zip(self.amounts)
            .map(|(member_id, amount)| Balance {
                member_id,
                amount,
                currency,
            })
            .collect()
    }
}

/// Compute balances with the default calculator (strict, 2 decimal places)
pub fn calculate_balances(expenses: &[Expense], members: &[Member]) -> Result<Vec<Balance>> {
    BalanceCalculator::default().calculate(expenses, members)
}
