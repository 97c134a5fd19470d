//! Self-signed RS256 bearer assertions for Google APIs.

pub mod assertion;
pub mod pem;
pub mod service_account;

use thiserror::Error;

pub use assertion::{AssertionSigner, Credentials, LOGGING_AUDIENCE};
pub use pem::PrivateKeyPem;
pub use service_account::ServiceAccount;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Invalid service account private key: missing PEM BEGIN/END PRIVATE KEY markers")]
    MissingPemMarker,
    #[error("Invalid service account private key encoding: {0}")]
    KeyEncoding(String),
    #[error("Failed to import PKCS#8 RSA key: {0}")]
    KeyImport(String),
    #[error("Invalid service account JSON: {0}")]
    ServiceAccount(String),
    #[error("Failed to serialize assertion segment: {0}")]
    Serialize(String),
    #[error("Signing failed: {0}")]
    Signing(String),
}
