use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::threshold::ThresholdRule;

/// Configuration-facing shape of a single bracket rule.
///
/// Bounds are optional: an absent `minAmount` leaves the bracket open below,
/// an absent `maxAmount` open above. The template, when present, carries two
/// positional `%s` slots (amount, then rate).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default)]
    pub reason_template: Option<String>,
}

/// Rejected rule configurations. Raised at load time, never during evaluation.
#[derive(Debug, thiserror::Error)]
pub enum RulesConfigError {
    #[error("rule {index}: rate {rate} is outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },
    #[error("rule {index}: minAmount {min} is greater than maxAmount {max}")]
    InvertedBounds {
        index: usize,
        min: Decimal,
        max: Decimal,
    },
}

/// Builds the ordered rule list from configuration, failing fast on invalid
/// definitions. Configuration order is preserved; first match wins downstream.
pub fn build_rules(definitions: &[RuleDefinition]) -> Result<Vec<ThresholdRule>, RulesConfigError> {
    let mut rules = Vec::with_capacity(definitions.len());
    for (index, definition) in definitions.iter().enumerate() {
        if definition.rate < Decimal::ZERO || definition.rate > Decimal::ONE {
            return Err(RulesConfigError::RateOutOfRange {
                index,
                rate: definition.rate,
            });
        }
        if let (Some(min), Some(max)) = (definition.min_amount, definition.max_amount) {
            if min > max {
                return Err(RulesConfigError::InvertedBounds { index, min, max });
            }
        }
        rules.push(ThresholdRule::new(
            definition.min_amount,
            definition.max_amount,
            definition.rate,
            definition.reason_template.clone(),
        ));
    }
    Ok(rules)
}

/// The two-bracket default: 2% below 10000, 5% at or above it. Together the
/// brackets tile the whole positive amount line, so every legal amount matches.
pub fn default_rules() -> Vec<ThresholdRule> {
    let threshold = Decimal::from(10_000);
    vec![
        ThresholdRule::new(
            None,
            Some(threshold),
            Decimal::new(2, 2),
            Some(
                "El monto %s no supera el umbral de 10000, por eso se aplica la tasa baja del %s"
                    .to_string(),
            ),
        ),
        ThresholdRule::new(
            Some(threshold),
            None,
            Decimal::new(5, 2),
            Some(
                "El monto %s supera el umbral de 10000, por eso se aplica la tasa alta del %s"
                    .to_string(),
            ),
        ),
    ]
}
