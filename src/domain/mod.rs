//! Inbound Logpush data model.

pub mod batch_record;

pub use batch_record::{
    BatchRecord, Event, EventRequest, EventResponse, ExceptionRecord, ExecutionType, LogLevel,
    LogLine, Outcome,
};
