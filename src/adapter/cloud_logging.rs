use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::relay_response;
use crate::domain::BatchRecord;
use crate::error::GatewayError;
use crate::port::{Destination, DispatchOutcome};
use crate::signer::{AssertionSigner, Credentials, LOGGING_AUDIENCE, ServiceAccount};
use crate::transform::cloud_logging::write_entries_request;

const NAME: &str = "cloud_logging";

pub const DEFAULT_ENTRIES_WRITE_URL: &str = "https://logging.googleapis.com/v2/entries:write";
pub const DEFAULT_LOG_ID: &str = "cloudflare_workers";

/// Writes entries with a self-signed service account JWT as the bearer
/// credential. No OAuth token exchange happens.
#[derive(Debug, Clone)]
pub struct CloudLoggingDestination {
    client: Client,
    service_account: ServiceAccount,
    entries_write_url: Url,
    log_id: String,
}

impl CloudLoggingDestination {
    pub fn new(
        client: Client,
        service_account: ServiceAccount,
        entries_write_url: Url,
        log_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            service_account,
            entries_write_url,
            log_id: log_id.into(),
        }
    }

    /// A fresh assertion per delivery, so none outlives its one hour window.
    fn assertion(&self) -> Result<String, GatewayError> {
        let credentials = Credentials::from(&self.service_account);
        let signer = AssertionSigner::new(&credentials, LOGGING_AUDIENCE)?;
        Ok(signer.sign()?)
    }
}

impl Destination for CloudLoggingDestination {
    fn name(&self) -> &'static str {
        NAME
    }

    fn ship(
        &self,
        records: Vec<BatchRecord>,
    ) -> Pin<Box<dyn Future<Output = Result<DispatchOutcome, GatewayError>> + Send + '_>> {
        Box::pin(async move {
            // key problems surface here, before anything goes on the wire
            let token = self.assertion()?;

            let request =
                write_entries_request(&records, &self.service_account.project_id, &self.log_id);
            debug!(
                records = records.len(),
                entries = request.entries.len(),
                log_name = %request.log_name,
                "Writing entries to Cloud Logging"
            );

            let response = self
                .client
                .post(self.entries_write_url.clone())
                .bearer_auth(token)
                .json(&request)
                .send()
                .await
                .map_err(|source| GatewayError::Delivery {
                    destination: NAME,
                    source,
                })?;

            relay_response(NAME, response).await
        })
    }
}
