use axum::http::{HeaderValue, StatusCode};
use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;

use crate::domain::BatchRecord;
use crate::error::GatewayError;

/// Raw response of the destination, relayed to the pusher unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl DispatchOutcome {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }
}

/// A log backend a parsed batch is delivered to in a single request.
///
/// A non-2xx answer from the backend is still `Ok`; only failures that leave
/// no response to relay are errors.
pub trait Destination: Send + Sync {
    fn name(&self) -> &'static str;

    fn ship(
        &self,
        records: Vec<BatchRecord>,
    ) -> Pin<Box<dyn Future<Output = Result<DispatchOutcome, GatewayError>> + Send + '_>>;
}
