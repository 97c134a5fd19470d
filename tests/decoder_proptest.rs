//! Chunking must never change what the gzip decoder produces.

use flate2::Compression;
use flate2::write::GzEncoder;
use logpush_gateway::ingest::GzipTextDecoder;
use proptest::prelude::*;
use std::io::Write;

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn decode_in_chunks(compressed: &[u8], chunk_sizes: &[usize]) -> String {
    let mut decoder = GzipTextDecoder::new();
    let mut offset = 0;
    let mut sizes = chunk_sizes.iter().cycle();
    while offset < compressed.len() {
        let size = sizes.next().copied().unwrap_or(compressed.len());
        let end = (offset + size).min(compressed.len());
        decoder.push(&compressed[offset..end]).unwrap();
        offset = end;
    }
    decoder.finish().unwrap()
}

proptest! {
    #[test]
    fn any_chunking_of_valid_text_roundtrips(
        text in "\\PC{0,512}",
        chunk_sizes in prop::collection::vec(1usize..64, 1..8),
    ) {
        let compressed = gzip(text.as_bytes());
        prop_assert_eq!(decode_in_chunks(&compressed, &chunk_sizes), text);
    }

    #[test]
    fn any_chunking_matches_lossy_decoding(
        bytes in prop::collection::vec(any::<u8>(), 0..512),
        chunk_sizes in prop::collection::vec(1usize..64, 1..8),
    ) {
        let compressed = gzip(&bytes);
        let expected = String::from_utf8_lossy(&bytes).into_owned();
        prop_assert_eq!(decode_in_chunks(&compressed, &chunk_sizes), expected);
    }
}
