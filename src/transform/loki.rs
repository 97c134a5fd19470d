//! Loki push API (`/loki/api/v1/push`) request shape.
//!
//! Timestamps are nanoseconds since the epoch rendered as decimal strings and
//! every line is a JSON document, which is what the push API accepts.

use serde::Serialize;
use tracing::debug;

use super::{DerivedEntry, Payload, derive_entries};
use crate::domain::BatchRecord;
use crate::error::GatewayError;

/// Value of the `cluster` stream label on every pushed stream.
pub const CLUSTER_LABEL: &str = "cloudflarelogpush";

const NANOS_PER_MILLI: i64 = 1_000_000;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PushRequest {
    pub streams: Vec<Stream>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Stream {
    pub stream: StreamLabels,
    /// `[timestamp_ns, line]` pairs.
    pub values: Vec<[String; 2]>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StreamLabels {
    pub cluster: &'static str,
    pub level: String,
}

pub fn timestamp_ns(timestamp_ms: i64) -> String {
    timestamp_ms.saturating_mul(NANOS_PER_MILLI).to_string()
}

fn line(entry: &DerivedEntry<'_>) -> Result<String, serde_json::Error> {
    match &entry.payload {
        Payload::Log { message } => serde_json::to_string(message),
        Payload::Exception { message, .. } => serde_json::to_string(message),
        Payload::Access(access) => serde_json::to_string(access),
    }
}

/// Group entries into one stream per level, in order of first appearance.
///
/// An entry without a timestamp of its own (only the access-log entry can
/// lack one) takes the latest timestamp among its record's other entries.
pub fn transform_batch(records: &[BatchRecord]) -> Result<PushRequest, GatewayError> {
    let mut streams: Vec<Stream> = Vec::new();

    for record in records {
        let entries = derive_entries(record);
        let fallback_ms = entries.iter().filter_map(|e| e.timestamp_ms).max();

        for entry in entries {
            let Some(timestamp_ms) = entry.timestamp_ms.or(fallback_ms) else {
                debug!(
                    script_name = %record.script_name,
                    "Skipping Loki entry without any timestamp"
                );
                continue;
            };
            let level = entry.severity.lowercase();
            let value = [timestamp_ns(timestamp_ms), line(&entry)?];

            match streams.iter_mut().find(|s| s.stream.level == level) {
                Some(stream) => stream.values.push(value),
                None => streams.push(Stream {
                    stream: StreamLabels {
                        cluster: CLUSTER_LABEL,
                        level: level.into_owned(),
                    },
                    values: vec![value],
                }),
            }
        }
    }

    Ok(PushRequest { streams })
}
