use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("delivery unavailable at this location")]
    DeliveryUnavailable,

    #[error("order is not dispatchable: {0}")]
    InvalidDispatchState(String),

    #[error("no eligible rider")]
    NoEligibleRider,

    #[error("illegal transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },

    #[error("order is in terminal state {0}")]
    TerminalOrder(String),

    #[error("dispatch retry budget exhausted for order {0}")]
    DispatchExhausted(uuid::Uuid),

    /// Lost the atomic claim race. Recovered inside the dispatch retry loop,
    /// never surfaced to callers.
    #[error("claim conflict")]
    ClaimConflict,

    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::NotFound(_) => "not_found",
            DispatchError::BadRequest(_) => "bad_request",
            DispatchError::Forbidden(_) => "forbidden",
            DispatchError::Conflict(_) => "conflict",
            DispatchError::DeliveryUnavailable => "delivery_unavailable",
            DispatchError::InvalidDispatchState(_) => "invalid_dispatch_state",
            DispatchError::NoEligibleRider => "no_eligible_rider",
            DispatchError::IllegalTransition { .. } => "illegal_transition",
            DispatchError::TerminalOrder(_) => "terminal_order",
            DispatchError::DispatchExhausted(_) => "dispatch_exhausted",
            DispatchError::ClaimConflict => "claim_conflict",
            DispatchError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::BadRequest(_) | DispatchError::DeliveryUnavailable => {
                StatusCode::BAD_REQUEST
            }
            DispatchError::Forbidden(_) => StatusCode::FORBIDDEN,
            DispatchError::Conflict(_)
            | DispatchError::InvalidDispatchState(_)
            | DispatchError::IllegalTransition { .. }
            | DispatchError::TerminalOrder(_)
            | DispatchError::ClaimConflict => StatusCode::CONFLICT,
            DispatchError::NoEligibleRider | DispatchError::DispatchExhausted(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
