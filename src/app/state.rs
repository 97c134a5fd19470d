use crate::adapter::{
    CloudLoggingDestination, LokiDestination, LokiEndpoint, build_http_client,
};
use crate::config::{DestinationSettings, Settings};
use crate::error::GatewayError;
use crate::port::Destination;
use crate::signer::ServiceAccount;
use std::sync::Arc;
use url::Url;

/// Read-only state shared by every request.
pub struct AppState {
    pub token: String,
    pub destination: Arc<dyn Destination>,
}

impl AppState {
    pub fn new(token: impl Into<String>, destination: Arc<dyn Destination>) -> Self {
        Self {
            token: token.into(),
            destination,
        }
    }

    /// Create `AppState` from configuration settings.
    ///
    /// The service account key itself is only imported per delivery, so a
    /// malformed key shows up as a failed push rather than a failed start.
    pub fn from_settings(settings: &Settings) -> Result<Self, GatewayError> {
        let client = build_http_client(settings.outbound_timeout)?;

        let destination: Arc<dyn Destination> = match &settings.destination {
            DestinationSettings::Loki { endpoint } => Arc::new(LokiDestination::new(
                client,
                LokiEndpoint::parse(endpoint)?,
            )),
            DestinationSettings::CloudLogging {
                service_account_json,
                entries_write_url,
                log_id,
            } => {
                let service_account = ServiceAccount::from_json(service_account_json)?;
                let url = Url::parse(entries_write_url).map_err(|e| {
                    GatewayError::Config(format!("Invalid CLOUD_LOGGING_ENDPOINT: {e}"))
                })?;
                Arc::new(CloudLoggingDestination::new(
                    client,
                    service_account,
                    url,
                    log_id.clone(),
                ))
            }
        };

        Ok(Self::new(settings.token.clone(), destination))
    }
}
