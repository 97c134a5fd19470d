use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, CONTENT_ENCODING, CONTENT_LENGTH};

/// Logpush validates a destination by pushing a 4 byte `test` body.
const PROBE_CONTENT_LENGTH: &str = "4";

/// Outcome of inspecting the headers of an inbound push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Destination validation probe; answer without reading the body.
    HealthOk,
    /// Gzip batch whose bearer token is missing or wrong.
    Unauthorized,
    /// Nothing recognizable to ingest.
    PassthroughOk,
    /// Authenticated gzip batch.
    Process,
}

/// Classify a request from its headers alone.
pub fn classify(headers: &HeaderMap, secret: &str) -> GateDecision {
    if header_str(headers, CONTENT_LENGTH.as_str()) == Some(PROBE_CONTENT_LENGTH) {
        return GateDecision::HealthOk;
    }

    if header_str(headers, CONTENT_ENCODING.as_str()) == Some("gzip") {
        return match bearer_token(headers) {
            Some(token) if token == secret => GateDecision::Process,
            _ => GateDecision::Unauthorized,
        };
    }

    GateDecision::PassthroughOk
}

/// Token between the first `earer ` and the next one, so both `Bearer` and
/// `bearer` prefixes are accepted.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, AUTHORIZATION.as_str())?
        .split("earer ")
        .nth(1)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
