use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{error, info, instrument, warn};

use crate::app::AppState;
use crate::error::GatewayError;
use crate::ingest::{GateDecision, classify, decode_gzip_stream, parse_batch};
use crate::port::DispatchOutcome;

/// Handler for Logpush deliveries (`POST /` and `POST /v1/logpush`).
#[instrument(skip_all)]
pub async fn ingest_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    match classify(&headers, &state.token) {
        GateDecision::HealthOk => {
            info!("Received Logpush validation probe");
            (StatusCode::OK, "ok").into_response()
        }
        GateDecision::PassthroughOk => (StatusCode::OK, "ok").into_response(),
        GateDecision::Unauthorized => {
            warn!("Rejected Logpush batch: {}", GatewayError::Unauthorized);
            (StatusCode::UNAUTHORIZED, "invalid token").into_response()
        }
        GateDecision::Process => match process_batch(&state, body).await {
            Ok(outcome) => relay(outcome),
            Err(e) => failure_response(&e),
        },
    }
}

async fn process_batch(
    state: &AppState,
    body: Body,
) -> Result<DispatchOutcome, GatewayError> {
    let text = decode_gzip_stream(body.into_data_stream()).await?;
    let records = parse_batch(&text)?;
    info!(
        records = records.len(),
        decoded_bytes = text.len(),
        destination = state.destination.name(),
        "Received Logpush batch"
    );
    drop(text);

    state.destination.ship(records).await
}

fn relay(outcome: DispatchOutcome) -> Response {
    let mut response = (outcome.status, outcome.body).into_response();
    match outcome.content_type {
        Some(content_type) => {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    response
}

fn failure_response(err: &GatewayError) -> Response {
    error!("Failed to forward Logpush batch: {err}");
    match err {
        GatewayError::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid token").into_response(),
        GatewayError::Delivery { .. } => (StatusCode::BAD_GATEWAY, "delivery failed").into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response(),
    }
}
