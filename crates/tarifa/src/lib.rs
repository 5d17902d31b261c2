//! Core library for the commission transaction service.
//!
//! Amounts are registered through [`transactions::TransactionService`], which
//! evaluates the configured bracket rules, persists the resulting record, and
//! assembles the outward-facing response. The HTTP surface lives in
//! [`transactions::transaction_router`]; storage is abstracted behind
//! [`transactions::TransactionRepository`] so the runnable service decides
//! where rows actually land.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod transactions;
