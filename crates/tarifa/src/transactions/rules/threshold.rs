use rust_decimal::{Decimal, RoundingStrategy};

use super::CommissionResult;

const DEFAULT_REASON_TEMPLATE: &str = "Monto %s aplica tasa del %s";

/// A bracket rule over the half-open interval `[min_amount, max_amount)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRule {
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
    rate: Decimal,
    reason_template: String,
}

impl ThresholdRule {
    pub fn new(
        min_amount: Option<Decimal>,
        max_amount: Option<Decimal>,
        rate: Decimal,
        reason_template: Option<String>,
    ) -> Self {
        let reason_template = match reason_template {
            Some(template) if !template.trim().is_empty() => template,
            _ => DEFAULT_REASON_TEMPLATE.to_string(),
        };
        Self {
            min_amount,
            max_amount,
            rate,
            reason_template,
        }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Inclusive lower bound, exclusive upper bound; an absent bound is
    /// unbounded on that side. The exclusivity lets adjacent brackets tile
    /// the amount line without overlap.
    pub fn matches(&self, amount: Decimal) -> bool {
        if let Some(min) = self.min_amount {
            if amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if amount >= max {
                return false;
            }
        }
        true
    }

    /// Computes the commission for a matching amount: `amount * rate` rounded
    /// half-up (ties away from zero) to two fractional digits.
    pub fn apply(&self, amount: Decimal) -> CommissionResult {
        let mut commission = (amount * self.rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        commission.rescale(2);
        let reason = render_template(&self.reason_template, amount, self.rate);
        CommissionResult {
            rate: self.rate,
            commission,
            reason,
        }
    }

    /// Compact bracket notation for log lines, e.g. `[10000, inf)@0.05`.
    pub(crate) fn bracket_label(&self) -> String {
        let lower = self
            .min_amount
            .map_or_else(|| "-inf".to_string(), |min| min.to_string());
        let upper = self
            .max_amount
            .map_or_else(|| "inf".to_string(), |max| max.to_string());
        format!("[{lower}, {upper})@{}", self.rate)
    }
}

/// Substitutes the template's two positional `%s` slots: amount first, rate
/// second. Slots beyond the second are left verbatim.
fn render_template(template: &str, amount: Decimal, rate: Decimal) -> String {
    template
        .replacen("%s", &amount.to_string(), 1)
        .replacen("%s", &rate.to_string(), 1)
}
