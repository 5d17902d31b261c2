mod definition;
mod threshold;

pub use definition::{build_rules, default_rules, RuleDefinition, RulesConfigError};
pub use threshold::ThresholdRule;

use rust_decimal::Decimal;

/// Ordered, immutable-after-load commission rule engine. First match wins.
pub struct CommissionEngine {
    rules: Vec<ThresholdRule>,
}

impl CommissionEngine {
    /// Builds the engine from an explicit rule list. The list must cover
    /// every positive amount; the loader's defaults guarantee this, custom
    /// configurations are trusted to.
    pub fn new(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    /// Builds the engine from configuration definitions, installing the
    /// default brackets when none are configured.
    pub fn from_definitions(definitions: &[RuleDefinition]) -> Result<Self, RulesConfigError> {
        let rules = if definitions.is_empty() {
            default_rules()
        } else {
            build_rules(definitions)?
        };
        Ok(Self::new(rules))
    }

    /// Selects the first rule matching `amount` and applies it.
    pub fn evaluate(&self, amount: Decimal) -> Result<CommissionResult, NoMatchingRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(amount))
            .map(|rule| rule.apply(amount))
            .ok_or(NoMatchingRule { amount })
    }

    /// Bracket listing for diagnostics when the coverage invariant is broken.
    pub fn signature(&self) -> String {
        self.rules
            .iter()
            .map(ThresholdRule::bracket_label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Result of evaluating a rule against an amount. Computed per request and
/// per read-back, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionResult {
    pub rate: Decimal,
    pub commission: Decimal,
    pub reason: String,
}

/// Internal invariant violation: the loaded rule list left a gap. Should not
/// occur under the loader's coverage guarantee.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("no commission rule matches amount {amount}")]
pub struct NoMatchingRule {
    pub amount: Decimal,
}
