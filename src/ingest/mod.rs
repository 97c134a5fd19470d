//! Inbound side of the pipeline: header gating, gzip body decoding and batch
//! parsing.

pub mod decoder;
pub mod gate;
pub mod parser;

pub use decoder::{DecodeError, GzipTextDecoder, decode_gzip_stream};
pub use gate::{GateDecision, classify};
pub use parser::{ParseError, parse_batch};
