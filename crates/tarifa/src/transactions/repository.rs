use super::domain::{NewTransaction, TransactionRecord};

/// Storage abstraction so the service module can be exercised in isolation.
/// The engine only ever inserts and enumerates; any store preserving decimal
/// precision qualifies.
pub trait TransactionRepository: Send + Sync {
    /// Atomic insert assigning a unique id; returns the hydrated record.
    fn save(&self, transaction: NewTransaction) -> Result<TransactionRecord, RepositoryError>;

    /// Enumerates every stored row. No ordering is guaranteed.
    fn find_all(&self) -> Result<Vec<TransactionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("transaction store unavailable: {0}")]
    Unavailable(String),
    #[error("stored transaction row is invalid: {0}")]
    InvalidRow(String),
}
