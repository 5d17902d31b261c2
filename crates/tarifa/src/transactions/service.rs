use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::error;

use super::domain::NewTransaction;
use super::repository::{RepositoryError, TransactionRepository};
use super::response::TransactionResponse;
use super::rules::{CommissionEngine, CommissionResult, NoMatchingRule};

/// Source of the server timestamp written into each record. Injectable so
/// tests can pin time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Production clock: local server time, no zone attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Pipeline composing the rule engine, the clock, and the repository.
///
/// `register` assumes its amount precondition (`> 0`) was enforced at the
/// boundary; `list_all` re-evaluates the engine per stored row so the
/// explanation always reflects the currently loaded rules.
pub struct TransactionService<R, C = SystemClock> {
    repository: Arc<R>,
    engine: Arc<CommissionEngine>,
    clock: C,
}

impl<R> TransactionService<R, SystemClock>
where
    R: TransactionRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: CommissionEngine) -> Self {
        Self::with_clock(repository, engine, SystemClock)
    }
}

impl<R, C> TransactionService<R, C>
where
    R: TransactionRepository + 'static,
    C: Clock + 'static,
{
    pub fn with_clock(repository: Arc<R>, engine: CommissionEngine, clock: C) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            clock,
        }
    }

    /// Registers a transaction: evaluate → timestamp → persist → assemble.
    ///
    /// Exactly one row is written on success; nothing is written when
    /// evaluation fails, and storage errors propagate unchanged.
    pub fn register(&self, amount: Decimal) -> Result<TransactionResponse, TransactionServiceError> {
        let result = self.evaluate(amount)?;
        let executed_at = self.clock.now();

        let stored = self.repository.save(NewTransaction {
            amount,
            commission: result.commission,
            executed_at,
        })?;

        Ok(TransactionResponse::assemble(
            stored,
            result.rate,
            result.reason,
        ))
    }

    /// Returns every stored record, each enriched with the re-evaluated rate
    /// and reason. The stored commission is returned as-is.
    pub fn list_all(&self) -> Result<Vec<TransactionResponse>, TransactionServiceError> {
        let records = self.repository.find_all()?;
        let mut responses = Vec::with_capacity(records.len());
        for record in records {
            let result = self.evaluate(record.amount)?;
            responses.push(TransactionResponse::assemble(
                record,
                result.rate,
                result.reason,
            ));
        }
        Ok(responses)
    }

    fn evaluate(&self, amount: Decimal) -> Result<CommissionResult, NoMatchingRule> {
        self.engine.evaluate(amount).inspect_err(|_| {
            error!(
                rules = %self.engine.signature(),
                %amount,
                "loaded rule list leaves a coverage gap"
            );
        })
    }
}

/// Error raised by the transaction pipeline. Nothing is caught here; the
/// router's error boundary performs the status mapping.
#[derive(Debug, thiserror::Error)]
pub enum TransactionServiceError {
    #[error(transparent)]
    Rules(#[from] NoMatchingRule),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
