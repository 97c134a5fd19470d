use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::SignerError;
use super::pem::PrivateKeyPem;
use super::service_account::ServiceAccount;

/// Audience Cloud Logging accepts for self-signed service account JWTs.
pub const LOGGING_AUDIENCE: &str = "https://logging.googleapis.com/";

/// Every assertion is valid for exactly one hour from `iat`.
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssertionHeader {
    pub alg: String,
    pub typ: String,
    pub kid: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity and key material an assertion is built from.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub issuer: String,
    pub key_id: String,
    pub private_key_pem: String,
}

impl From<&ServiceAccount> for Credentials {
    fn from(account: &ServiceAccount) -> Self {
        Self {
            issuer: account.client_email.clone(),
            key_id: account.private_key_id.clone(),
            private_key_pem: account.private_key.clone(),
        }
    }
}

/// RS256 signer for self-signed bearer assertions.
pub struct AssertionSigner {
    issuer: String,
    key_id: String,
    audience: String,
    signing_key: SigningKey<Sha256>,
}

impl AssertionSigner {
    /// Import the key. Fails with [`SignerError::MissingPemMarker`] before
    /// any decoding if the PEM markers are wrong.
    pub fn new(credentials: &Credentials, audience: &str) -> Result<Self, SignerError> {
        let pem = PrivateKeyPem::parse(&credentials.private_key_pem)?;
        let private_key = pem.rsa_key()?;

        Ok(Self {
            issuer: credentials.issuer.clone(),
            key_id: credentials.key_id.clone(),
            audience: audience.to_string(),
            signing_key: SigningKey::<Sha256>::new(private_key),
        })
    }

    pub fn sign(&self) -> Result<String, SignerError> {
        self.sign_at(Utc::now().timestamp())
    }

    /// `<header>.<claims>.<signature>`, each segment base64url without padding.
    pub fn sign_at(&self, issued_at: i64) -> Result<String, SignerError> {
        let header = AssertionHeader {
            alg: "RS256".to_string(),
            typ: "JWT".to_string(),
            kid: self.key_id.clone(),
        };
        let claims = AssertionClaims {
            iss: self.issuer.clone(),
            sub: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);
        let signature = self
            .signing_key
            .try_sign(signing_input.as_bytes())
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, SignerError> {
    let json = serde_json::to_vec(value).map_err(|e| SignerError::Serialize(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1v15::{Signature, VerifyingKey};
    use rsa::signature::Verifier;
    use rsa::RsaPublicKey;

    const TEST_KEY: &str = include_str!("../../tests/fixtures/test_service_account_key.pem");

    fn credentials() -> Credentials {
        Credentials {
            issuer: "logs@proj.iam.gserviceaccount.com".to_string(),
            key_id: "0123456789abcdef".to_string(),
            private_key_pem: TEST_KEY.to_string(),
        }
    }

    fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> T {
        let bytes = URL_SAFE_NO_PAD.decode(segment).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_token_structure() {
        let signer = AssertionSigner::new(&credentials(), LOGGING_AUDIENCE).unwrap();
        let token = signer.sign_at(1_700_000_000).unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);
        for segment in &segments {
            assert!(!segment.is_empty());
            assert!(!segment.contains('='));
            assert!(
                segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            );
        }

        let header: AssertionHeader = decode_segment(segments[0]);
        assert_eq!(
            header,
            AssertionHeader {
                alg: "RS256".into(),
                typ: "JWT".into(),
                kid: "0123456789abcdef".into(),
            }
        );

        let claims: AssertionClaims = decode_segment(segments[1]);
        assert_eq!(claims.iss, "logs@proj.iam.gserviceaccount.com");
        assert_eq!(claims.sub, claims.iss);
        assert_eq!(claims.aud, LOGGING_AUDIENCE);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_signature_verifies_with_public_key() {
        let signer = AssertionSigner::new(&credentials(), LOGGING_AUDIENCE).unwrap();
        let token = signer.sign_at(1_700_000_000).unwrap();
        let (signing_input, signature) = token.rsplit_once('.').unwrap();

        let private_key = PrivateKeyPem::parse(TEST_KEY).unwrap().rsa_key().unwrap();
        let verifying_key = VerifyingKey::<Sha256>::new(RsaPublicKey::from(&private_key));
        let signature_bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        let signature = Signature::try_from(signature_bytes.as_slice()).unwrap();

        assert!(
            verifying_key
                .verify(signing_input.as_bytes(), &signature)
                .is_ok()
        );
    }

    #[test]
    fn test_deterministic_for_same_issue_time() {
        let signer = AssertionSigner::new(&credentials(), LOGGING_AUDIENCE).unwrap();
        assert_eq!(
            signer.sign_at(1_700_000_000).unwrap(),
            signer.sign_at(1_700_000_000).unwrap()
        );
        assert_ne!(
            signer.sign_at(1_700_000_000).unwrap(),
            signer.sign_at(1_700_000_001).unwrap()
        );
    }

    #[test]
    fn test_sign_uses_current_time() {
        let signer = AssertionSigner::new(&credentials(), LOGGING_AUDIENCE).unwrap();
        let before = Utc::now().timestamp();
        let token = signer.sign().unwrap();
        let after = Utc::now().timestamp();

        let claims: AssertionClaims = decode_segment(token.split('.').nth(1).unwrap());
        assert!(claims.iat >= before && claims.iat <= after);
        assert_eq!(claims.exp, claims.iat + ASSERTION_LIFETIME_SECS);
    }

    #[test]
    fn test_missing_markers_fail_before_crypto() {
        let mut creds = credentials();
        creds.private_key_pem = creds.private_key_pem.replace("-----END PRIVATE KEY-----", "");
        assert!(matches!(
            AssertionSigner::new(&creds, LOGGING_AUDIENCE),
            Err(SignerError::MissingPemMarker)
        ));
    }
}
