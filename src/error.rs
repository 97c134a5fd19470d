use thiserror::Error;

use crate::ingest::decoder::DecodeError;
use crate::ingest::parser::ParseError;
use crate::signer::SignerError;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to load configuration: {0}")]
    Config(String),

    #[error("Failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("invalid token")]
    Unauthorized,

    #[error("Failed to decode batch body: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to parse batch: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to sign assertion: {0}")]
    Signer(#[from] SignerError),

    #[error("Delivery to {destination} failed: {source}")]
    Delivery {
        destination: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}
