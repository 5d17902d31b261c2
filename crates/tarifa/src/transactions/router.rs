use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::service::{Clock, TransactionService, TransactionServiceError};
use super::TransactionRepository;

pub(crate) const MSG_INVALID_REQUEST: &str = "Solicitud invalida";
pub(crate) const MSG_INTERNAL_ERROR: &str = "Se presento un error interno";
pub(crate) const MSG_AMOUNT_REQUIRED: &str = "El monto es requerido";
pub(crate) const MSG_AMOUNT_POSITIVE: &str = "El monto debe ser mayor a cero";

/// Router builder exposing the transaction endpoints.
pub fn transaction_router<R, C>(service: Arc<TransactionService<R, C>>) -> Router
where
    R: TransactionRepository + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/transactions",
            post(register_handler::<R, C>).get(list_handler::<R, C>),
        )
        .with_state(service)
}

/// Registration request body. The amount is kept optional so the boundary
/// can answer with the field-keyed "required" message instead of a decode
/// failure.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<Decimal>,
}

/// Error envelope shared by validation and internal failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub errors: BTreeMap<String, String>,
}

impl ErrorResponse {
    fn with_field(message: &str, field: &str, detail: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), detail.into());
        Self {
            message: message.to_string(),
            errors,
        }
    }

    pub(crate) fn invalid_field(field: &str, detail: &str) -> Self {
        Self::with_field(MSG_INVALID_REQUEST, field, detail)
    }

    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        Self::with_field(MSG_INTERNAL_ERROR, "error", detail)
    }
}

pub(crate) async fn register_handler<R, C>(
    State(service): State<Arc<TransactionService<R, C>>>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Response
where
    R: TransactionRepository + 'static,
    C: Clock + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let body = ErrorResponse::with_field(
                MSG_INVALID_REQUEST,
                "error",
                rejection.body_text(),
            );
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let amount = match validate_amount(request.amount) {
        Ok(amount) => amount,
        Err(body) => return (StatusCode::BAD_REQUEST, Json(body)).into_response(),
    };

    match service.register(amount) {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(error) => internal_error_response(error),
    }
}

pub(crate) async fn list_handler<R, C>(
    State(service): State<Arc<TransactionService<R, C>>>,
) -> Response
where
    R: TransactionRepository + 'static,
    C: Clock + 'static,
{
    match service.list_all() {
        Ok(responses) => (StatusCode::OK, Json(responses)).into_response(),
        Err(error) => internal_error_response(error),
    }
}

fn validate_amount(amount: Option<Decimal>) -> Result<Decimal, ErrorResponse> {
    match amount {
        None => Err(ErrorResponse::invalid_field("amount", MSG_AMOUNT_REQUIRED)),
        Some(amount) if amount <= Decimal::ZERO => {
            Err(ErrorResponse::invalid_field("amount", MSG_AMOUNT_POSITIVE))
        }
        Some(amount) => Ok(amount),
    }
}

fn internal_error_response(error: TransactionServiceError) -> Response {
    let body = ErrorResponse::internal(error.to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Accepts the amount as a JSON number or a decimal string; `null` and an
/// absent field both map to `None` so validation can speak for them.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Decimal::from_str(&number.to_string())
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(Value::String(raw)) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(other) => Err(serde::de::Error::custom(format!(
            "amount must be a decimal number, got {other}"
        ))),
    }
}
