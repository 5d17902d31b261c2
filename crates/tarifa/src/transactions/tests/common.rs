use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::transactions::domain::{NewTransaction, TransactionRecord};
use crate::transactions::repository::{RepositoryError, TransactionRepository};
use crate::transactions::rules::CommissionEngine;
use crate::transactions::service::{Clock, TransactionService};

pub(super) fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("valid decimal literal")
}

pub(super) fn fixed_time() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-01-15T09:30:00", "%Y-%m-%dT%H:%M:%S")
        .expect("valid fixture timestamp")
}

pub(super) fn default_engine() -> CommissionEngine {
    CommissionEngine::from_definitions(&[]).expect("defaults always load")
}

/// Fixed clock so pipeline tests can assert the persisted timestamp.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(pub(super) NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Append-only in-memory store with sequential ids.
#[derive(Default)]
pub(super) struct MemoryRepository {
    rows: Mutex<Vec<TransactionRecord>>,
    next_id: AtomicI64,
}

impl MemoryRepository {
    pub(super) fn rows(&self) -> Vec<TransactionRecord> {
        self.rows.lock().expect("repository mutex poisoned").clone()
    }

    /// Inserts a pre-built row, bypassing the pipeline. Lets tests stage
    /// stored commissions that disagree with the engine.
    pub(super) fn seed(&self, record: TransactionRecord) {
        self.rows
            .lock()
            .expect("repository mutex poisoned")
            .push(record);
    }
}

impl TransactionRepository for MemoryRepository {
    fn save(&self, transaction: NewTransaction) -> Result<TransactionRecord, RepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let record = TransactionRecord {
            id,
            amount: transaction.amount,
            commission: transaction.commission,
            executed_at: transaction.executed_at,
        };
        self.rows
            .lock()
            .expect("repository mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn find_all(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        Ok(self.rows())
    }
}

/// Repository that always fails, for storage-error propagation tests.
pub(super) struct UnavailableRepository;

impl TransactionRepository for UnavailableRepository {
    fn save(&self, _transaction: NewTransaction) -> Result<TransactionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn find_all(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) fn build_service(
) -> (Arc<TransactionService<MemoryRepository, FixedClock>>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = Arc::new(TransactionService::with_clock(
        repository.clone(),
        default_engine(),
        FixedClock(fixed_time()),
    ));
    (service, repository)
}

pub(super) async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("json body")
}
