//! Transaction registration and read-back.
//!
//! `rules` selects the bracket and computes the commission, `service`
//! orchestrates evaluation, timestamping, and persistence, `router` exposes
//! the HTTP surface and owns the error-to-status mapping.

pub mod domain;
pub mod repository;
pub mod response;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{NewTransaction, TransactionRecord};
pub use repository::{RepositoryError, TransactionRepository};
pub use response::TransactionResponse;
pub use router::{transaction_router, ErrorResponse, TransactionRequest};
pub use rules::{CommissionEngine, CommissionResult, NoMatchingRule, RuleDefinition};
pub use service::{Clock, SystemClock, TransactionService, TransactionServiceError};
