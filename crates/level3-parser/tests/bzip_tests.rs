//! Behavior of the bzip2 adapter against streams built by the reference
//! compressor.

use std::io::Read;

use level3_parser::{Bzip2Reader, Level3Error};
use test_utils::bzip2_compress;

const MESSAGE: &[u8] = b"HELLO WORLD\n";

#[test]
fn test_single_read() {
    let compressed = bzip2_compress(MESSAGE);
    let mut reader = Bzip2Reader::new(compressed.as_slice());

    let mut buf = [0u8; 12];
    let n = reader.read_decompressed(&mut buf).unwrap();

    assert_eq!(n, MESSAGE.len());
    assert_eq!(&buf, MESSAGE);
}

#[test]
fn test_partial_reads_match_single_read() {
    let compressed = bzip2_compress(MESSAGE);

    let mut whole = [0u8; 12];
    let mut reader = Bzip2Reader::new(compressed.as_slice());
    reader.read_decompressed(&mut whole).unwrap();

    let mut split = [0u8; 12];
    let mut reader = Bzip2Reader::new(compressed.as_slice());
    let first = reader.read_decompressed(&mut split[..5]).unwrap();
    let second = reader.read_decompressed(&mut split[5..]).unwrap();

    assert_eq!(first, 5);
    assert_eq!(second, 7);
    assert_eq!(split, whole);
}

#[test]
fn test_oversized_buffer_returns_short_count() {
    let compressed = bzip2_compress(MESSAGE);
    let mut reader = Bzip2Reader::new(compressed.as_slice());

    let mut buf = [0u8; 64];
    assert_eq!(reader.read_decompressed(&mut buf).unwrap(), MESSAGE.len());
    assert_eq!(reader.read_decompressed(&mut buf).unwrap(), 0);
}

#[test]
fn test_not_bzip2_is_corrupted_input() {
    let mut reader = Bzip2Reader::new(&b"OOPS"[..]);
    let mut buf = [0u8; 12];

    assert!(matches!(
        reader.read_decompressed(&mut buf),
        Err(Level3Error::CorruptedInput)
    ));
}

#[test]
fn test_io_read_carries_decoder_error() {
    let mut reader = Bzip2Reader::new(&b"OOPS"[..]);
    let mut buf = Vec::new();

    let err = reader.read_to_end(&mut buf).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    assert!(matches!(Level3Error::from(err), Level3Error::CorruptedInput));
}

#[test]
fn test_large_payload_through_small_buffer() {
    let payload: Vec<u8> = (0..200_000u32).map(|i| (i.wrapping_mul(31) % 256) as u8).collect();
    let compressed = bzip2_compress(&payload);

    let mut reader = Bzip2Reader::with_capacity(1024, compressed.as_slice());
    let mut out = Vec::new();
    let mut chunk = [0u8; 777];
    loop {
        let n = reader.read_decompressed(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }

    assert_eq!(out, payload);
}

#[test]
fn test_source_io_error_propagates() {
    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    let mut reader = Bzip2Reader::new(FailingSource);
    let mut buf = [0u8; 4];
    match reader.read_decompressed(&mut buf) {
        Err(Level3Error::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::ConnectionReset),
        other => panic!("expected I/O error, got {:?}", other),
    }
}
