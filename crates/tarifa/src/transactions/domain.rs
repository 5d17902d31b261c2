use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// A transaction as built by the pipeline, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub commission: Decimal,
    pub executed_at: NaiveDateTime,
}

/// A persisted transaction row. Append-only: never mutated after insert.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub id: i64,
    pub amount: Decimal,
    pub commission: Decimal,
    pub executed_at: NaiveDateTime,
}
