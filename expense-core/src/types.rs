//! Core types for shared group expenses
//!
//! All types are designed for:
//! - Plain-data snapshots handed in by the caller (serde)
//! - Exact arithmetic (Decimal for money)
//! - Immutability once an expense is recorded

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Member identifier (document store user id)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create new member ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Expense identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create new expense ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Group identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Create new group ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 currency code
///
/// Only the currencies a group can be configured with. No conversion
/// between them is ever performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
    /// Chinese Yuan
    CNY,
    /// Indian Rupee
    INR,
    /// Bangladeshi Taka
    BDT,
}

impl Currency {
    /// All supported currencies
    pub const ALL: [Currency; 10] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::CAD,
        Currency::AUD,
        Currency::JPY,
        Currency::CHF,
        Currency::CNY,
        Currency::INR,
        Currency::BDT,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::BDT => "BDT",
        }
    }

    /// Display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::JPY | Currency::CNY => "¥",
            Currency::CHF => "Fr",
            Currency::INR => "₹",
            Currency::BDT => "৳",
        }
    }
}

impl FromStr for Currency {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| crate::Error::InvalidCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    /// Food and groceries
    Food,
    /// Transport
    Transport,
    /// Utilities
    Utilities,
    /// Entertainment
    Entertainment,
    /// Shopping
    Shopping,
    /// Health
    Health,
    /// Rent
    Rent,
    /// Anything else
    Other,
}

impl ExpenseCategory {
    /// All categories
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
        ExpenseCategory::Health,
        ExpenseCategory::Rent,
        ExpenseCategory::Other,
    ];

    /// Lowercase name, as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Entertainment => "entertainment",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Health => "health",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Other => "other",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| crate::Error::InvalidCategory(s.to_string()))
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Member ID
    pub id: MemberId,

    /// Name shown in summaries
    pub display_name: String,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    /// Create new member
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            display_name: display_name.into(),
            email: None,
        }
    }
}

/// Expense group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group ID
    pub id: GroupId,

    /// Group name
    pub name: String,

    /// Member IDs
    pub members: Vec<MemberId>,

    /// Currency all expenses are recorded in
    #[serde(default)]
    pub currency: Currency,
}

/// Shared expense (immutable once recorded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense ID
    pub id: ExpenseId,

    /// Owning group
    pub group_id: GroupId,

    /// Short title
    #[serde(default)]
    pub title: String,

    /// Amount (positive, exact decimal)
    pub amount: Decimal,

    /// Currency
    #[serde(default)]
    pub currency: Currency,

    /// Member who fronted the money
    pub paid_by: MemberId,

    /// Members sharing the cost
    pub split_between: Vec<MemberId>,

    /// Category
    pub category: ExpenseCategory,

    /// When the expense occurred
    pub date: DateTime<Utc>,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Expense {
    /// Largest amount a single expense may carry (10^15)
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

    /// Check the expense can be split
    pub fn validate(&self) -> crate::Result<()> {
        if self.split_between.is_empty() {
            return Err(crate::Error::InvalidExpense {
                expense_id: self.id.clone(),
                reason: "split_between is empty".to_string(),
            });
        }

        if self.amount <= Decimal::ZERO {
            return Err(crate::Error::InvalidExpense {
                expense_id: self.id.clone(),
                reason: format!("amount {} is not positive", self.amount),
            });
        }

        if self.amount > Self::MAX_AMOUNT {
            return Err(crate::Error::InvalidExpense {
                expense_id: self.id.clone(),
                reason: format!("amount {} exceeds {}", self.amount, Self::MAX_AMOUNT),
            });
        }

        Ok(())
    }

    /// Distinct members sharing the cost, in first-seen order
    pub fn participants(&self) -> Vec<&MemberId> {
        let mut seen: Vec<&MemberId> = Vec::with_capacity(self.split_between.len());
        for id in &self.split_between {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    /// Whether `member` shares this expense
    pub fn is_shared_by(&self, member: &MemberId) -> bool {
        self.split_between.contains(member)
    }

    /// Unrounded share owed by each participant
    pub fn share(&self) -> crate::Result<Decimal> {
        self.validate()?;
        let count = Decimal::from(self.participants().len());
        Ok(self.amount / count)
    }

    /// Calendar month key (`YYYY-MM`, UTC)
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn expense(amount: Decimal, split: &[&str]) -> Expense {
        Expense {
            id: ExpenseId::new("exp-1"),
            group_id: GroupId::new("grp-1"),
            title: "Dinner".to_string(),
            amount,
            currency: Currency::EUR,
            paid_by: MemberId::new("alice"),
            split_between: split.iter().copied().map(MemberId::from).collect(),
            category: ExpenseCategory::Food,
            date: Utc.with_ymd_and_hms(2024, 3, 9, 19, 30, 0).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::EUR);
        assert!("INVALID".parse::<Currency>().is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(ExpenseCategory::Entertainment.to_string(), "entertainment");
        assert_eq!("Rent".parse::<ExpenseCategory>().unwrap(), ExpenseCategory::Rent);
        assert!("groceries".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn test_expense_from_document_json() {
        let json = r#"{
            "id": "e1",
            "groupId": "g1",
            "title": "Taxi",
            "amount": "42.50",
            "currency": "GBP",
            "paidBy": "alice",
            "splitBetween": ["alice", "bob"],
            "category": "transport",
            "date": "2024-05-01T08:00:00Z"
        }"#;
        let exp: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(exp.amount, dec!(42.50));
        assert_eq!(exp.currency, Currency::GBP);
        assert_eq!(exp.category, ExpenseCategory::Transport);
        assert_eq!(exp.paid_by, MemberId::new("alice"));
        assert!(exp.description.is_none());
        assert!(exp.validate().is_ok());
    }

    #[test]
    fn test_empty_split_rejected() {
        let exp = expense(dec!(10), &[]);
        let err = exp.validate().unwrap_err();
        assert!(matches!(err, crate::Error::InvalidExpense { .. }));
        assert!(exp.share().is_err());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert!(expense(dec!(0), &["alice"]).validate().is_err());
        assert!(expense(dec!(-5), &["alice"]).validate().is_err());
    }

    #[test]
    fn test_amount_limit() {
        assert_eq!(Expense::MAX_AMOUNT, dec!(1000000000000000));
        assert!(expense(Expense::MAX_AMOUNT, &["alice"]).validate().is_ok());
        assert!(expense(Decimal::MAX, &["alice"]).validate().is_err());
    }

    #[test]
    fn test_duplicate_participants_collapsed() {
        let exp = expense(dec!(90), &["bob", "alice", "bob", "carol"]);
        let participants: Vec<&str> = exp.participants().iter().map(|m| m.as_str()).collect();
        assert_eq!(participants, vec!["bob", "alice", "carol"]);
        assert_eq!(exp.share().unwrap(), dec!(30));
    }

    #[test]
    fn test_month_key() {
        assert_eq!(expense(dec!(1), &["alice"]).month_key(), "2024-03");
    }
}
