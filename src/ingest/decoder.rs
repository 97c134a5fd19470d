use std::io::Write;

use bytes::Bytes;
use flate2::write::GzDecoder;
use futures::{Stream, StreamExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Corrupt or truncated gzip stream: {0}")]
    Gzip(#[from] std::io::Error),
    #[error("Request body stream failed: {0}")]
    Body(String),
}

/// Inflates gzip input chunk by chunk and decodes the output as UTF-8.
///
/// Multi-byte sequences split across inflated chunks are held back until the
/// rest arrives. Invalid sequences become U+FFFD.
pub struct GzipTextDecoder {
    inflater: GzDecoder<Vec<u8>>,
    pending: Vec<u8>,
    text: String,
}

impl GzipTextDecoder {
    pub fn new() -> Self {
        Self {
            inflater: GzDecoder::new(Vec::new()),
            pending: Vec::new(),
            text: String::new(),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Result<(), DecodeError> {
        self.inflater.write_all(chunk)?;
        self.drain_inflated();
        Ok(())
    }

    /// Flush the inflater and return the full text.
    pub fn finish(mut self) -> Result<String, DecodeError> {
        self.inflater.try_finish()?;
        self.drain_inflated();
        if !self.pending.is_empty() {
            // incomplete trailing sequence
            self.text.push(char::REPLACEMENT_CHARACTER);
        }
        Ok(self.text)
    }

    fn drain_inflated(&mut self) {
        let inflated = self.inflater.get_mut();
        if inflated.is_empty() {
            return;
        }
        self.pending.append(inflated);
        self.decode_pending();
    }

    fn decode_pending(&mut self) {
        let mut consumed = 0;
        loop {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(err) => {
                    let valid_up_to = consumed + err.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&self.pending[consumed..valid_up_to]) {
                        self.text.push_str(valid);
                    }
                    match err.error_len() {
                        Some(invalid_len) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            consumed = valid_up_to + invalid_len;
                        }
                        None => {
                            consumed = valid_up_to;
                            break;
                        }
                    }
                }
            }
        }
        self.pending.drain(..consumed);
    }
}

impl Default for GzipTextDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive a [`GzipTextDecoder`] over an async body stream.
///
/// The whole decoded batch is buffered, so memory grows linearly with one
/// decompressed push.
pub async fn decode_gzip_stream<S, E>(mut stream: S) -> Result<String, DecodeError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut decoder = GzipTextDecoder::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DecodeError::Body(e.to_string()))?;
        decoder.push(&chunk)?;
    }
    decoder.finish()
}
