#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod healthcheck;
pub mod ingest;
pub mod port;
pub mod signer;
pub mod test_support;
pub mod transform;

pub use healthcheck::{healthcheck, healthcheck_with_port};
