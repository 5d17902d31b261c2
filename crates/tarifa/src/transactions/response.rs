use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::TransactionRecord;

/// Outward view of a persisted transaction, enriched with the evaluation's
/// rate and reason. Decimals serialize as plain JSON numbers; `executedAt`
/// is zoneless with second precision, a wire-format commitment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub commission: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub commission_rate: Decimal,
    pub reason: String,
    #[serde(with = "executed_at_format")]
    pub executed_at: NaiveDateTime,
}

impl TransactionResponse {
    /// Pure assembly from the persisted record plus the evaluation result.
    pub fn assemble(record: TransactionRecord, rate: Decimal, reason: String) -> Self {
        Self {
            id: record.id,
            amount: record.amount,
            commission: record.commission,
            commission_rate: rate,
            reason,
            executed_at: record.executed_at,
        }
    }
}

/// `yyyy-MM-ddTHH:mm:ss`, local time, no zone suffix. Sub-second precision
/// is dropped at the wire even when the store keeps it.
pub mod executed_at_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
