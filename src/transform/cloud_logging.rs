//! Google Cloud Logging `entries:write` request shape.

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde_json::Value;

use super::{AccessLog, DerivedEntry, Labels, Payload, derive_entries};
use crate::domain::BatchRecord;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WriteEntriesRequest<'a> {
    #[serde(rename = "logName")]
    pub log_name: String,
    pub resource: MonitoredResource,
    pub entries: Vec<LogEntry<'a>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub resource_type: &'static str,
}

impl MonitoredResource {
    pub fn global() -> Self {
        Self {
            resource_type: "global",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry<'a> {
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub labels: Labels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_payload: Option<JsonPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_request: Option<AccessLog<'a>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum JsonPayload<'a> {
    Log {
        message: &'a [Value],
    },
    Exception {
        message: &'a str,
        #[serde(rename = "errorName")]
        error_name: &'a str,
    },
}

/// `projects/<project>/logs/<log id>`
pub fn log_name(project_id: &str, log_id: &str) -> String {
    format!("projects/{project_id}/logs/{log_id}")
}

/// RFC 3339 in UTC with millisecond precision.
pub fn format_timestamp(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

pub fn to_log_entry(entry: DerivedEntry<'_>) -> LogEntry<'_> {
    let (json_payload, http_request) = match entry.payload {
        Payload::Log { message } => (Some(JsonPayload::Log { message }), None),
        Payload::Exception { name, message } => (
            Some(JsonPayload::Exception {
                message,
                error_name: name,
            }),
            None,
        ),
        Payload::Access(access) => (None, Some(access)),
    };

    LogEntry {
        severity: entry.severity.uppercase().into_owned(),
        timestamp: entry.timestamp_ms.and_then(format_timestamp),
        labels: entry.labels,
        json_payload,
        http_request,
    }
}

pub fn transform_batch(records: &[BatchRecord]) -> Vec<LogEntry<'_>> {
    records
        .iter()
        .flat_map(derive_entries)
        .map(to_log_entry)
        .collect()
}

pub fn write_entries_request<'a>(
    records: &'a [BatchRecord],
    project_id: &str,
    log_id: &str,
) -> WriteEntriesRequest<'a> {
    WriteEntriesRequest {
        log_name: log_name(project_id, log_id),
        resource: MonitoredResource::global(),
        entries: transform_batch(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_batch;
    use serde_json::json;

    const BATCH: &str = r#"[
        {
            "Event": {"RayID": "ray-1", "Request": {"Method": "POST", "URL": "https://api.dev/items"},
                      "Response": {"Status": 404}, "EventTimestampMs": 1700000000000, "ScheduledTimeMs": null},
            "Exceptions": [],
            "Logs": [{"TimestampMs": 1700000000123, "Level": "log", "Message": ["hi", {"n": 1}]}],
            "Outcome": "ok",
            "ScriptName": "api"
        },
        {
            "Event": {"RayID": null, "ScheduledTimeMs": 1700000005000},
            "Exceptions": [{"Name": "TypeError", "Message": "boom", "TimestampMs": 1700000005001}],
            "Logs": [],
            "Outcome": "exception",
            "ScriptName": "counter"
        }
    ]"#;

    #[test]
    fn test_timestamp_format() {
        assert_eq!(
            format_timestamp(1_700_000_000_123).as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
        assert_eq!(
            format_timestamp(0).as_deref(),
            Some("1970-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_write_entries_request_shape() {
        let records = parse_batch(BATCH).unwrap();
        let request = write_entries_request(&records, "my-project", "cloudflare_workers");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "logName": "projects/my-project/logs/cloudflare_workers",
                "resource": {"type": "global"},
                "entries": [
                    {
                        "severity": "INFO",
                        "timestamp": "2023-11-14T22:13:20.123Z",
                        "labels": {"scriptName": "api", "executionType": "request", "rayId": "ray-1"},
                        "jsonPayload": {"message": ["hi", {"n": 1}]}
                    },
                    {
                        "severity": "WARN",
                        "timestamp": "2023-11-14T22:13:20.000Z",
                        "labels": {"scriptName": "api", "executionType": "request", "rayId": "ray-1"},
                        "httpRequest": {"requestMethod": "POST", "requestUrl": "https://api.dev/items", "status": 404}
                    },
                    {
                        "severity": "CRITICAL",
                        "timestamp": "2023-11-14T22:13:25.001Z",
                        "labels": {"scriptName": "counter", "executionType": "durable_object_alarm"},
                        "jsonPayload": {"message": "boom", "errorName": "TypeError"}
                    }
                ]
            })
        );
    }

    #[test]
    fn test_message_values_are_not_stringified() {
        let records = parse_batch(
            r#"[{"Event": {"RayID": null, "ScheduledTimeMs": null},
                 "Logs": [{"TimestampMs": 1, "Level": "debug", "Message": [1.5, null, true, [1, "a"]]}],
                 "ScriptName": "w"}]"#,
        )
        .unwrap();
        let entries = transform_batch(&records);
        let value = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(value["severity"], "DEBUG");
        assert_eq!(value["jsonPayload"]["message"], json!([1.5, null, true, [1, "a"]]));
    }
}
