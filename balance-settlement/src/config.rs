//! Configuration for the settlement engine

use expense_core::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Currency reported when there are no expenses to take it from
    pub default_currency: Currency,

    /// Balance calculation configuration
    pub balances: BalanceConfig,

    /// Settlement matching configuration
    pub settlement: MatchingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "balance-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            default_currency: Currency::USD,
            balances: BalanceConfig::default(),
            settlement: MatchingConfig::default(),
        }
    }
}

/// What to do with members an expense references but the roster lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberPolicy {
    /// Reject the calculation
    #[default]
    Strict,
    /// Give the member a balance slot after the roster
    Extend,
}

impl FromStr for MemberPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(MemberPolicy::Strict),
            "extend" => Ok(MemberPolicy::Extend),
            other => Err(crate::Error::Config(format!(
                "Unknown member policy: {}",
                other
            ))),
        }
    }
}

/// Balance calculation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Unknown member handling
    pub member_policy: MemberPolicy,

    /// Decimal places balances are rounded to
    pub decimal_places: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            member_policy: MemberPolicy::Strict,
            decimal_places: 2,
        }
    }
}

/// Settlement matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Tolerance under which a balance or transfer counts as zero
    pub epsilon: Decimal,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            epsilon: Decimal::new(1, 2), // one cent
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(code) = std::env::var("SETTLEMENT_DEFAULT_CURRENCY") {
            config.default_currency = code.parse()?;
        }

        if let Ok(epsilon) = std::env::var("SETTLEMENT_EPSILON") {
            config.settlement.epsilon = Decimal::from_str(epsilon.trim())
                .map_err(|e| crate::Error::Config(format!("Invalid epsilon: {}", e)))?;
        }

        if let Ok(policy) = std::env::var("SETTLEMENT_MEMBER_POLICY") {
            config.balances.member_policy = policy.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.settlement.epsilon <= Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "epsilon must be positive, got {}",
                self.settlement.epsilon
            )));
        }
        if self.balances.decimal_places > 8 {
            return Err(crate::Error::Config(format!(
                "decimal_places must be at most 8, got {}",
                self.balances.decimal_places
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "balance-settlement");
        assert_eq!(config.default_currency, Currency::USD);
        assert_eq!(config.settlement.epsilon, dec!(0.01));
        assert_eq!(config.balances.member_policy, MemberPolicy::Strict);
        assert_eq!(config.balances.decimal_places, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_currency = "EUR"

[balances]
member_policy = "extend"

[settlement]
epsilon = "0.05"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.default_currency, Currency::EUR);
        assert_eq!(config.balances.member_policy, MemberPolicy::Extend);
        assert_eq!(config.balances.decimal_places, 2);
        assert_eq!(config.settlement.epsilon, dec!(0.05));
    }

    #[test]
    fn test_from_file_rejects_zero_epsilon() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settlement]\nepsilon = \"0\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_member_policy_from_str() {
        assert_eq!("STRICT".parse::<MemberPolicy>().unwrap(), MemberPolicy::Strict);
        assert_eq!("extend".parse::<MemberPolicy>().unwrap(), MemberPolicy::Extend);
        assert!("lenient".parse::<MemberPolicy>().is_err());
    }
}
