use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDateTime;
use metrics_exporter_prometheus::PrometheusHandle;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tarifa::transactions::{
    NewTransaction, RepositoryError, TransactionRecord, TransactionRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Storage format keeps whatever sub-second precision the clock produced;
/// the wire format truncates separately.
const STORED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// SQLite-backed transaction store. Decimals are persisted as text so no
/// precision is lost crossing the boundary.
pub(crate) struct SqliteTransactionRepository {
    connection: Mutex<Connection>,
}

impl SqliteTransactionRepository {
    pub(crate) fn open(path: &str) -> Result<Self, rusqlite::Error> {
        let connection = Connection::open(path)?;
        connection.busy_timeout(Duration::from_millis(250))?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount TEXT NOT NULL,
                commission TEXT NOT NULL,
                executed_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }
}

impl TransactionRepository for SqliteTransactionRepository {
    fn save(&self, transaction: NewTransaction) -> Result<TransactionRecord, RepositoryError> {
        let connection = self.connection.lock().expect("connection mutex poisoned");
        connection
            .execute(
                "INSERT INTO transactions (amount, commission, executed_at) VALUES (?1, ?2, ?3)",
                params![
                    transaction.amount.to_string(),
                    transaction.commission.to_string(),
                    transaction
                        .executed_at
                        .format(STORED_TIME_FORMAT)
                        .to_string(),
                ],
            )
            .map_err(|error| RepositoryError::Unavailable(error.to_string()))?;

        let id = connection.last_insert_rowid();
        Ok(TransactionRecord {
            id,
            amount: transaction.amount,
            commission: transaction.commission,
            executed_at: transaction.executed_at,
        })
    }

    fn find_all(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let connection = self.connection.lock().expect("connection mutex poisoned");
        let mut statement = connection
            .prepare("SELECT id, amount, commission, executed_at FROM transactions")
            .map_err(|error| RepositoryError::Unavailable(error.to_string()))?;

        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|error| RepositoryError::Unavailable(error.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, amount, commission, executed_at) =
                row.map_err(|error| RepositoryError::Unavailable(error.to_string()))?;
            records.push(TransactionRecord {
                id,
                amount: parse_decimal(&amount, id)?,
                commission: parse_decimal(&commission, id)?,
                executed_at: NaiveDateTime::parse_from_str(&executed_at, STORED_TIME_FORMAT)
                    .map_err(|error| {
                        RepositoryError::InvalidRow(format!(
                            "row {id}: bad timestamp '{executed_at}': {error}"
                        ))
                    })?,
            });
        }
        Ok(records)
    }
}

fn parse_decimal(raw: &str, id: i64) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(raw).map_err(|error| {
        RepositoryError::InvalidRow(format!("row {id}: bad decimal '{raw}': {error}"))
    })
}
