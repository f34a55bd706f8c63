//! Main settlement engine
//!
//! Wires the balance calculator, the settlement matcher and the aggregate
//! reporters together under one configuration.

use crate::{
    balance::BalanceCalculator,
    config::Config,
    matcher::SettlementMatcher,
    report,
    types::*,
    Result,
};
use chrono::Utc;
use expense_core::{Expense, Group, Member, MemberId};
use std::collections::HashMap;

/// Settlement engine
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// Balance calculator
    calculator: BalanceCalculator,

    /// Settlement matcher
    matcher: SettlementMatcher,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let calculator = BalanceCalculator::new(
            config.balances.member_policy,
            config.balances.decimal_places,
            config.default_currency,
        );

        let matcher = SettlementMatcher::new(
            config.settlement.epsilon,
            config.balances.decimal_places,
        )?;

        Ok(Self {
            calculator,
            matcher,
            config,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Net balance per member
    pub fn balances(&self, expenses: &[Expense], members: &[Member]) -> Result<Vec<Balance>> {
        self.calculator.calculate(expenses, members)
    }

    /// Suggested transfers zeroing `balances`
    pub fn settlements(&self, balances: &[Balance]) -> Vec<SuggestedSettlement> {
        self.matcher.match_balances(balances)
    }

    /// Build the export summary for a group
    pub fn summarize(
        &self,
        group: &Group,
        members: &[Member],
        expenses: &[Expense],
    ) -> Result<GroupReport> {
        tracing::info!(
            group_id = %group.id,
            expenses = expenses.len(),
            members = members.len(),
            "Summarizing group"
        );

        if let Some(other) = expenses.iter().find(|e| e.currency != group.currency) {
            tracing::warn!(
                group_id = %group.id,
                expense_id = %other.id,
                "Expense currency {} differs from group currency {}",
                other.currency,
                group.currency
            );
        }

        let balances = self
            .calculator
            .clone()
            .with_default_currency(group.currency)
            .calculate(expenses, members)?;
        let settlements = self.settlements(&balances);

        let names: HashMap<&MemberId, &str> = members
            .iter()
            .map(|m| (&m.id, m.display_name.as_str()))
            .collect();
        let label = |id: &MemberId| -> String {
            names.get(id).copied().unwrap_or("Unknown").to_string()
        };

        let balance_lines = balances
            .iter()
            .map(|b| BalanceLine {
                member_id: b.member_id.clone(),
                display_name: label(&b.member_id),
                amount: b.amount,
                currency: b.currency,
            })
            .collect();

        let settlement_lines: Vec<SettlementLine> = settlements
            .iter()
            .map(|s| SettlementLine {
                from: s.from.clone(),
                from_name: label(&s.from),
                to: s.to.clone(),
                to_name: label(&s.to),
                amount: s.amount,
                currency: s.currency,
            })
            .collect();

        let report = GroupReport {
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            currency: group.currency,
            currency_symbol: group.currency.symbol().to_string(),
            total_expenses: report::total_expenses(expenses),
            expense_count: expenses.len(),
            member_count: members.len(),
            balances: balance_lines,
            category_totals: report::totals_by_category(expenses),
            monthly_totals: report::monthly_totals(expenses),
            settlements: settlement_lines,
            generated_at: Utc::now(),
        };

        tracing::info!(
            group_id = %group.id,
            total = %report.total_expenses,
            transfers = report.settlements.len(),
            "Group summary ready"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemberPolicy;
    use chrono::TimeZone;
    use expense_core::{Currency, ExpenseCategory, ExpenseId, GroupId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn group() -> Group {
        Group {
            id: GroupId::new("lisbon"),
            name: "Lisbon trip".to_string(),
            members: vec![MemberId::new("ana"), MemberId::new("rui"), MemberId::new("eva")],
            currency: Currency::EUR,
        }
    }

    fn members() -> Vec<Member> {
        vec![
            Member::new("ana", "Ana"),
            Member::new("rui", "Rui"),
            Member::new("eva", "Eva"),
        ]
    }

    fn expense(
        id: &str,
        amount: Decimal,
        category: ExpenseCategory,
        paid_by: &str,
        split: &[&str],
    ) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            group_id: GroupId::new("lisbon"),
            title: id.to_string(),
            amount,
            currency: Currency::EUR,
            paid_by: MemberId::new(paid_by),
            split_between: split.iter().copied().map(MemberId::from).collect(),
            category,
            date: Utc.with_ymd_and_hms(2024, 9, 2, 20, 0, 0).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_engine_rejects_invalid_config() {
        let mut config = Config::default();
        config.settlement.epsilon = Decimal::ZERO;

        assert!(SettlementEngine::new(config).is_err());
    }

    #[test]
    fn test_summarize() {
        let engine = SettlementEngine::new(Config::default()).unwrap();
        let expenses = vec![
            expense(
                "dinner",
                dec!(90),
                ExpenseCategory::Food,
                "ana",
                &["ana", "rui", "eva"],
            ),
            expense("tram", dec!(6), ExpenseCategory::Transport, "rui", &["rui", "eva"]),
        ];

        let report = engine.summarize(&group(), &members(), &expenses).unwrap();

        assert_eq!(report.group_name, "Lisbon trip");
        assert_eq!(report.currency, Currency::EUR);
        assert_eq!(report.total_expenses, dec!(96));
        assert_eq!(report.expense_count, 2);
        assert_eq!(report.member_count, 3);

        let balances: Vec<(&str, Decimal)> = report
            .balances
            .iter()
            .map(|b| (b.display_name.as_str(), b.amount))
            .collect();
        assert_eq!(
            balances,
            vec![("Ana", dec!(60)), ("Rui", dec!(-27)), ("Eva", dec!(-33))]
        );

        let settlements: Vec<(&str, &str, Decimal)> = report
            .settlements
            .iter()
            .map(|s| (s.from_name.as_str(), s.to_name.as_str(), s.amount))
            .collect();
        assert_eq!(
            settlements,
            vec![("Rui", "Ana", dec!(27)), ("Eva", "Ana", dec!(33))]
        );
        assert_eq!(report.total_settled(), dec!(60));
        assert_eq!(engine.config().default_currency, Currency::USD);

        assert_eq!(report.category_totals.get(ExpenseCategory::Food), Some(dec!(90)));
        assert_eq!(report.monthly_totals.get("2024-09"), Some(&dec!(96)));
    }

    #[test]
    fn test_summarize_labels_unknown_members() {
        let mut config = Config::default();
        config.balances.member_policy = MemberPolicy::Extend;
        let engine = SettlementEngine::new(config).unwrap();
        let expenses = vec![expense(
            "taxi",
            dec!(20),
            ExpenseCategory::Transport,
            "ana",
            &["ana", "ghost"],
        )];

        let report = engine.summarize(&group(), &members(), &expenses).unwrap();

        let ghost = report.balances.last().unwrap();
        assert_eq!(ghost.member_id.as_str(), "ghost");
        assert_eq!(ghost.display_name, "Unknown");
        assert_eq!(ghost.amount, dec!(-10));
        assert_eq!(report.member_count, 3);
    }

    #[test]
    fn test_summarize_strict_unknown_member_fails() {
        let engine = SettlementEngine::new(Config::default()).unwrap();
        let expenses = vec![expense(
            "taxi",
            dec!(20),
            ExpenseCategory::Transport,
            "ana",
            &["ghost"],
        )];

        assert!(matches!(
            engine.summarize(&group(), &members(), &expenses),
            Err(crate::Error::UnknownMember { .. })
        ));
    }

    #[test]
    fn test_summarize_lines_carry_balance_currency() {
        let engine = SettlementEngine::new(Config::default()).unwrap();
        let mut taxi = expense(
            "taxi",
            dec!(20),
            ExpenseCategory::Transport,
            "ana",
            &["ana", "rui"],
        );
        taxi.currency = Currency::GBP;

        let report = engine.summarize(&group(), &members(), &[taxi]).unwrap();

        assert_eq!(report.currency, Currency::EUR);
        assert_eq!(report.currency_symbol, "€");
        assert!(report.balances.iter().all(|b| b.currency == Currency::GBP));
        assert!(report.settlements.iter().all(|s| s.currency == Currency::GBP));
    }

    #[test]
    fn test_summarize_empty_group_uses_group_currency() {
        // Config default is USD, the group records EUR
        let engine = SettlementEngine::new(Config::default()).unwrap();

        let report = engine.summarize(&group(), &members(), &[]).unwrap();

        assert!(report.balances.iter().all(|b| b.currency == Currency::EUR));
    }

    #[test]
    fn test_summarize_empty_group() {
        let engine = SettlementEngine::new(Config::default()).unwrap();

        let report = engine.summarize(&group(), &members(), &[]).unwrap();

        assert_eq!(report.total_expenses, Decimal::ZERO);
        assert!(report.balances.iter().all(|b| b.amount.is_zero()));
        assert!(report.settlements.is_empty());
        assert!(report.category_totals.is_empty());
    }
}
