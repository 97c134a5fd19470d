//! Outbound delivery to concrete log backends.

pub mod cloud_logging;
pub mod loki;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder, Response};
use tracing::info;

use crate::error::GatewayError;
use crate::port::DispatchOutcome;

pub use cloud_logging::CloudLoggingDestination;
pub use loki::{LokiDestination, LokiEndpoint};

pub const USER_AGENT: &str = concat!("logpush-gateway/", env!("CARGO_PKG_VERSION"));

/// Pooled client shared by every request a destination makes.
pub fn build_http_client(timeout: Duration) -> Result<Client, GatewayError> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {e}")))
}

/// Read the whole destination response without judging its status.
pub(crate) async fn relay_response(
    destination: &'static str,
    response: Response,
) -> Result<DispatchOutcome, GatewayError> {
    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response
        .bytes()
        .await
        .map_err(|source| GatewayError::Delivery {
            destination,
            source,
        })?;

    info!(destination, status = status.as_u16(), "Response from destination");

    Ok(DispatchOutcome {
        status,
        content_type,
        body,
    })
}
