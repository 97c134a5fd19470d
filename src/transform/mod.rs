//! Mapping from Logpush execution records to destination log entries.
//!
//! Every destination shares the derivation in this module: severity, labels
//! and the synthetic access-log line. The submodules only decide the wire
//! shape.
//!
//! Entries of one record come out as: log lines in input order, then
//! exceptions in input order, then at most one access-log entry.

pub mod cloud_logging;
pub mod loki;

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use crate::domain::{BatchRecord, ExecutionType, LogLevel};

/// Destination-facing severity tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Default,
    Debug,
    Info,
    Warn,
    Error,
    /// Unrecovered exceptions; ranks above `Error`.
    Critical,
    Other(String),
}

impl Severity {
    pub fn uppercase(&self) -> Cow<'_, str> {
        match self {
            Severity::Default => Cow::Borrowed("DEFAULT"),
            Severity::Debug => Cow::Borrowed("DEBUG"),
            Severity::Info => Cow::Borrowed("INFO"),
            Severity::Warn => Cow::Borrowed("WARN"),
            Severity::Error => Cow::Borrowed("ERROR"),
            Severity::Critical => Cow::Borrowed("CRITICAL"),
            Severity::Other(level) => Cow::Owned(level.to_uppercase()),
        }
    }

    pub fn lowercase(&self) -> Cow<'_, str> {
        match self {
            Severity::Default => Cow::Borrowed("default"),
            Severity::Debug => Cow::Borrowed("debug"),
            Severity::Info => Cow::Borrowed("info"),
            Severity::Warn => Cow::Borrowed("warn"),
            Severity::Error => Cow::Borrowed("error"),
            Severity::Critical => Cow::Borrowed("critical"),
            Severity::Other(level) => Cow::Owned(level.to_lowercase()),
        }
    }
}

/// `console.log` is the default level and maps to INFO.
pub fn log_severity(level: &LogLevel) -> Severity {
    match level {
        LogLevel::Log | LogLevel::Info => Severity::Info,
        LogLevel::Debug => Severity::Debug,
        LogLevel::Warn => Severity::Warn,
        LogLevel::Error => Severity::Error,
        LogLevel::Other(level) => Severity::Other(level.clone()),
    }
}

pub fn status_severity(status: u16) -> Severity {
    match status {
        0..=299 => Severity::Info,
        400..=499 => Severity::Warn,
        500.. => Severity::Error,
        _ => Severity::Default,
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Labels {
    pub script_name: String,
    pub execution_type: ExecutionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ray_id: Option<String>,
}

impl Labels {
    pub fn for_record(record: &BatchRecord) -> Self {
        Self {
            script_name: record.script_name.clone(),
            execution_type: ExecutionType::from_scheduled_time(record.event.scheduled_time_ms),
            ray_id: record.event.ray_id.clone(),
        }
    }

    /// Access-log entries only exist for fetch executions.
    pub fn for_access_log(record: &BatchRecord) -> Self {
        Self {
            execution_type: ExecutionType::Request,
            ..Self::for_record(record)
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessLog<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_method: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_url: Option<&'a str>,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload<'a> {
    Log { message: &'a [Value] },
    Exception { name: &'a str, message: &'a str },
    Access(AccessLog<'a>),
}

/// Destination-neutral entry derived from a record.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedEntry<'a> {
    pub severity: Severity,
    pub timestamp_ms: Option<i64>,
    pub labels: Labels,
    pub payload: Payload<'a>,
}

pub fn derive_entries(record: &BatchRecord) -> Vec<DerivedEntry<'_>> {
    let labels = Labels::for_record(record);
    let mut entries = Vec::with_capacity(record.logs.len() + record.exceptions.len() + 1);

    entries.extend(record.logs.iter().map(|line| DerivedEntry {
        severity: log_severity(&line.level),
        timestamp_ms: Some(line.timestamp_ms),
        labels: labels.clone(),
        payload: Payload::Log {
            message: &line.message,
        },
    }));

    entries.extend(record.exceptions.iter().map(|exception| DerivedEntry {
        severity: Severity::Critical,
        timestamp_ms: Some(exception.timestamp_ms),
        labels: labels.clone(),
        payload: Payload::Exception {
            name: &exception.name,
            message: &exception.message,
        },
    }));

    if let Some(access) = access_log(record) {
        entries.push(DerivedEntry {
            severity: status_severity(access.status),
            timestamp_ms: record.event.event_timestamp_ms,
            labels: Labels::for_access_log(record),
            payload: Payload::Access(access),
        });
    }

    entries
}

fn access_log(record: &BatchRecord) -> Option<AccessLog<'_>> {
    let status = record.event.response.as_ref()?.status?;
    let request = record.event.request.as_ref();
    Some(AccessLog {
        request_method: request.and_then(|r| r.method.as_deref()),
        request_url: request.and_then(|r| r.url.as_deref()),
        status,
    })
}
