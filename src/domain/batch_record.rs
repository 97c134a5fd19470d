use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One Worker execution as delivered by Workers Trace Event Logpush.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BatchRecord {
    #[serde(rename = "Event", default, deserialize_with = "null_as_default")]
    pub event: Event,
    #[serde(rename = "Exceptions", default, deserialize_with = "null_as_default")]
    pub exceptions: Vec<ExceptionRecord>,
    #[serde(rename = "Logs", default, deserialize_with = "null_as_default")]
    pub logs: Vec<LogLine>,
    #[serde(rename = "Outcome", default)]
    pub outcome: Outcome,
    #[serde(rename = "ScriptName", default, deserialize_with = "null_as_default")]
    pub script_name: String,
}

/// Logpush writes `null` for empty arrays as well as omitting them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Triggering event metadata.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Event {
    #[serde(rename = "RayID", default)]
    pub ray_id: Option<String>,
    #[serde(rename = "Request", default, skip_serializing_if = "Option::is_none")]
    pub request: Option<EventRequest>,
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<EventResponse>,
    #[serde(
        rename = "EventTimestampMs",
        alias = "EventTimeStampMS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub event_timestamp_ms: Option<i64>,
    /// `None` for fetch-triggered executions, set for alarm-triggered ones.
    #[serde(rename = "ScheduledTimeMs", default)]
    pub scheduled_time_ms: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EventRequest {
    #[serde(rename = "Method", default)]
    pub method: Option<String>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EventResponse {
    #[serde(rename = "Status", default)]
    pub status: Option<u16>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExceptionRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "TimestampMs")]
    pub timestamp_ms: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LogLine {
    #[serde(rename = "TimestampMs")]
    pub timestamp_ms: i64,
    #[serde(rename = "Level")]
    pub level: LogLevel,
    /// Arguments passed to `console.*`, kept as arbitrary JSON values.
    #[serde(rename = "Message", default, deserialize_with = "null_as_default")]
    pub message: Vec<Value>,
}

/// `console` method a log line was emitted with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Log,
    Debug,
    Info,
    Warn,
    Error,
    Other(String),
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Log => "log",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Other(level) => level,
        }
    }
}

impl From<String> for LogLevel {
    fn from(level: String) -> Self {
        match level.as_str() {
            "log" => LogLevel::Log,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Other(level),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Ok,
    Exception,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Whether an execution was started by a request or by a Durable Object alarm.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionType {
    Request,
    DurableObjectAlarm,
}

impl ExecutionType {
    pub fn from_scheduled_time(scheduled_time_ms: Option<i64>) -> Self {
        match scheduled_time_ms {
            None => ExecutionType::Request,
            Some(_) => ExecutionType::DurableObjectAlarm,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionType::Request => "request",
            ExecutionType::DurableObjectAlarm => "durable_object_alarm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_level_known_and_unknown() {
        let level: LogLevel = serde_json::from_value(json!("warn")).unwrap();
        assert_eq!(level, LogLevel::Warn);

        let level: LogLevel = serde_json::from_value(json!("trace")).unwrap();
        assert_eq!(level, LogLevel::Other("trace".to_string()));
        assert_eq!(serde_json::to_value(&level).unwrap(), json!("trace"));
    }

    #[test]
    fn test_outcome_unrecognized_value() {
        let outcome: Outcome = serde_json::from_value(json!("exceededCpu")).unwrap();
        assert_eq!(outcome, Outcome::Unknown);
        let outcome: Outcome = serde_json::from_value(json!("exception")).unwrap();
        assert_eq!(outcome, Outcome::Exception);
    }

    #[test]
    fn test_execution_type_depends_only_on_scheduled_time() {
        assert_eq!(
            ExecutionType::from_scheduled_time(None),
            ExecutionType::Request
        );
        assert_eq!(
            ExecutionType::from_scheduled_time(Some(0)),
            ExecutionType::DurableObjectAlarm
        );
        assert_eq!(
            ExecutionType::from_scheduled_time(Some(1_700_000_000_000)).as_str(),
            "durable_object_alarm"
        );
    }

    #[test]
    fn test_event_timestamp_alias() {
        let event: Event = serde_json::from_value(json!({
            "RayID": null,
            "EventTimeStampMS": 1700000000000_i64,
            "ScheduledTimeMs": null
        }))
        .unwrap();
        assert_eq!(event.event_timestamp_ms, Some(1_700_000_000_000));
        assert!(event.ray_id.is_none());
    }
}
