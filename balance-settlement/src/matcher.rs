//! Settlement matching
//!
//! Turns net balances into a short list of member-to-member transfers.
//!
//! # Algorithm
//!
//! 1. Split balances into debtors (negative) and creditors (positive),
//!    skipping anyone within epsilon of zero
//! 2. Walk both lists with one cursor each, in the order members were found
//! 3. Move `min(debt, credit)` from the current debtor to the current creditor
//! 4. Advance every cursor whose remaining amount fell under epsilon
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: +30   B: +20   C: -25   D: -25
//!
//! Transfers:
//!   C pays A: 25   (C done, A has 5 left)
//!   D pays A: 5    (A done, D has 20 left)
//!   D pays B: 20   (both done)
//! ```
//!
//! Lists are not sorted. Output order follows the input.

use crate::{
    types::{round_money, Balance, SuggestedSettlement},
    Error, Result,
};
use expense_core::{Currency, MemberId};
use rust_decimal::Decimal;

/// Settlement matcher
#[derive(Debug, Clone)]
pub struct SettlementMatcher {
    /// Zero tolerance
    epsilon: Decimal,

    /// Rounding of emitted amounts
    decimal_places: u32,
}

impl Default for SettlementMatcher {
    fn default() -> Self {
        Self {
            epsilon: Decimal::new(1, 2),
            decimal_places: 2,
        }
    }
}

/// Open position during matching
struct Position<'a> {
    member_id: &'a MemberId,
    currency: Currency,
    remaining: Decimal,
}

impl SettlementMatcher {
    /// Create new settlement matcher
    ///
    /// `epsilon` must be positive: cursors only advance once a remainder
    /// drops below it.
    pub fn new(epsilon: Decimal, decimal_places: u32) -> Result<Self> {
        if epsilon <= Decimal::ZERO {
            return Err(Error::Config(format!(
                "epsilon must be positive, got {}",
                epsilon
            )));
        }
        Ok(Self {
            epsilon,
            decimal_places,
        })
    }

    /// Zero tolerance in use
    pub fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Compute suggested transfers, debtor-major
    ///
    /// Expects balances that sum to zero. Unbalanced input is logged and
    /// leaves an unmatched remainder on one side.
    pub fn match_balances(&self, balances: &[Balance]) -> Vec<SuggestedSettlement> {
        let tolerance = self.epsilon * Decimal::from(balances.len().max(1));
        if let Err(err) = check_zero_sum(balances, tolerance) {
            tracing::warn!(error = %err, "Matching unbalanced input");
        }

        let (mut debtors, mut creditors) = self.partition(balances);

        let mut settlements = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];

            let amount = debtor.remaining.min(creditor.remaining);

            if amount > self.epsilon {
                settlements.push(SuggestedSettlement {
                    from: debtor.member_id.clone(),
                    to: creditor.member_id.clone(),
                    amount: round_money(amount, self.decimal_places),
                    currency: debtor.currency,
                });
            }

            debtor.remaining -= amount;
            creditor.remaining -= amount;

            if debtor.remaining < self.epsilon {
                i += 1;
            }
            if creditor.remaining < self.epsilon {
                j += 1;
            }
        }

        tracing::debug!(
            balances = balances.len(),
            debtors = debtors.len(),
            creditors = creditors.len(),
            transfers = settlements.len(),
            "Matched settlements"
        );

        settlements
    }

    /// Split into (debtors, creditors) with positive remaining amounts
    fn partition<'a>(&self, balances: &'a [Balance]) -> (Vec<Position<'a>>, Vec<Position<'a>>) {
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for balance in balances {
            if balance.amount.abs() < self.epsilon {
                continue;
            }
            let position = Position {
                member_id: &balance.member_id,
                currency: balance.currency,
                remaining: balance.amount.abs(),
            };
            if balance.is_debtor() {
                debtors.push(position);
            } else if balance.is_creditor() {
                creditors.push(position);
            }
        }

        (debtors, creditors)
    }
}

/// Compute suggested transfers with a one-cent epsilon
pub fn calculate_settlements(balances: &[Balance]) -> Vec<SuggestedSettlement> {
    SettlementMatcher::default().match_balances(balances)
}

/// Check that balances sum to zero within `tolerance`
pub fn check_zero_sum(balances: &[Balance], tolerance: Decimal) -> Result<()> {
    let sum: Decimal = balances.iter().map(|b| b.amount).sum();
    if sum.abs() > tolerance {
        return Err(Error::InvariantViolation(format!(
            "Balances sum to {} (tolerance {})",
            sum, tolerance
        )));
    }
    Ok(())
}

/// Balances after every transfer is paid
///
/// The payer's balance rises by the amount, the receiver's falls by it.
pub fn apply_settlements(
    balances: &[Balance],
    settlements: &[SuggestedSettlement],
) -> Result<Vec<Balance>> {
    let mut result = balances.to_vec();

    for settlement in settlements {
        adjust(&mut result, &settlement.from, settlement.amount)?;
        adjust(&mut result, &settlement.to, -settlement.amount)?;
    }

    Ok(result)
}

fn adjust(balances: &mut [Balance], member: &MemberId, delta: Decimal) -> Result<()> {
    let balance = balances
        .iter_mut()
        .find(|b| &b.member_id == member)
        .ok_or_else(|| {
            Error::InvariantViolation(format!("Settlement references unknown member {}", member))
        })?;
    balance.amount += delta;
    Ok(())
}
