//! Shared test support utilities
//!
//! Provides a `MockDestination` that records every batch it is handed and
//! answers with a configurable response, for use in unit and integration tests.

use crate::domain::BatchRecord;
use crate::error::GatewayError;
use crate::port::{Destination, DispatchOutcome};
use crate::signer::SignerError;
use axum::http::{HeaderValue, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock destination that captures shipped batches for testing.
pub struct MockDestination {
    shipped: Arc<Mutex<Vec<Vec<BatchRecord>>>>,
    ship_count: AtomicUsize,
    response: Mutex<DispatchOutcome>,
    should_fail: AtomicBool,
}

impl MockDestination {
    pub fn new() -> Self {
        Self {
            shipped: Arc::new(Mutex::new(Vec::new())),
            ship_count: AtomicUsize::new(0),
            response: Mutex::new(DispatchOutcome::new(StatusCode::NO_CONTENT, "")),
            should_fail: AtomicBool::new(false),
        }
    }

    /// Answer every subsequent delivery with this status, body and content type.
    pub fn set_response(
        &self,
        status: StatusCode,
        body: &'static str,
        content_type: Option<&'static str>,
    ) {
        let mut response = DispatchOutcome::new(status, body);
        response.content_type = content_type.map(HeaderValue::from_static);
        *self.response.lock().unwrap() = response;
    }

    /// Fail every subsequent delivery as if the signing key were unusable.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn shipped_batches(&self) -> Vec<Vec<BatchRecord>> {
        self.shipped.lock().unwrap().clone()
    }

    pub fn ship_count(&self) -> usize {
        self.ship_count.load(Ordering::SeqCst)
    }
}

impl Default for MockDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for MockDestination {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn ship(
        &self,
        records: Vec<BatchRecord>,
    ) -> Pin<Box<dyn Future<Output = Result<DispatchOutcome, GatewayError>> + Send + '_>> {
        let shipped = self.shipped.clone();
        Box::pin(async move {
            self.ship_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(SignerError::MissingPemMarker.into());
            }
            shipped.lock().unwrap().push(records);
            Ok(self.response.lock().unwrap().clone())
        })
    }
}
