//! Pull-based bzip2 decompression over an arbitrary byte source.
//!
//! The Level 3 symbology block is a single bzip2 stream. [`Bzip2Reader`]
//! feeds that stream through the library's incremental API one refill at a
//! time, so callers can read a few header bytes, then a radial, then the
//! next, without ever holding the whole decompressed payload.

use std::io::{self, Read};

use bzip2::{Decompress, Status};
use tracing::trace;

use crate::error::{Level3Error, Level3Result};

/// Default size of the compressed input buffer.
pub const DEFAULT_INPUT_BUFFER_SIZE: usize = 256 * 1024;

/// Streaming bzip2 decoder with a bounded input buffer.
pub struct Bzip2Reader<R> {
    source: R,
    stream: Decompress,
    input: Box<[u8]>,
    /// Start of unconsumed bytes in `input`.
    pos: usize,
    /// End of valid bytes in `input`.
    filled: usize,
    source_exhausted: bool,
    stream_ended: bool,
}

impl<R: Read> Bzip2Reader<R> {
    /// Wrap `source` using the default 256 KiB input buffer.
    pub fn new(source: R) -> Self {
        Self::with_capacity(DEFAULT_INPUT_BUFFER_SIZE, source)
    }

    /// Wrap `source` with an input buffer of `capacity` bytes (at least 1).
    pub fn with_capacity(capacity: usize, source: R) -> Self {
        Self {
            source,
            stream: Decompress::new(false),
            input: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            filled: 0,
            source_exhausted: false,
            stream_ended: false,
        }
    }

    /// Decompress into `buf`, returning the number of bytes written.
    ///
    /// Returns fewer than `buf.len()` bytes only when the compressed stream
    /// (or its source) has ended; once it has, every further call returns 0.
    pub fn read_decompressed(&mut self, buf: &mut [u8]) -> Level3Result<usize> {
        let mut written = 0;

        while written < buf.len() && !self.stream_ended {
            if self.pos == self.filled && !self.source_exhausted {
                self.refill()?;
            }

            let before_in = self.stream.total_in();
            let before_out = self.stream.total_out();

            let status = self
                .stream
                .decompress(&self.input[self.pos..self.filled], &mut buf[written..])
                // Data and magic errors mean a corrupt payload; sequence and
                // param errors leave the stream unusable, which is the same
                // outcome for the caller.
                .map_err(|_| Level3Error::CorruptedInput)?;

            let consumed = (self.stream.total_in() - before_in) as usize;
            let produced = (self.stream.total_out() - before_out) as usize;
            self.pos += consumed;
            written += produced;

            match status {
                Status::StreamEnd => {
                    trace!(total_out = self.stream.total_out(), "bzip2 stream ended");
                    self.stream_ended = true;
                }
                Status::MemNeeded => return Err(Level3Error::Overflow),
                _ => {}
            }

            // Truncated stream: no input left and the library can make no
            // further progress.
            if consumed == 0 && produced == 0 && self.source_exhausted && self.pos == self.filled {
                break;
            }
        }

        Ok(written)
    }

    /// Total compressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.stream.total_in()
    }

    /// Total decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.stream.total_out()
    }

    /// Give back the underlying source. Any buffered compressed input is lost.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn refill(&mut self) -> Level3Result<()> {
        loop {
            match self.source.read(&mut self.input) {
                Ok(0) => {
                    self.source_exhausted = true;
                    self.pos = 0;
                    self.filled = 0;
                    return Ok(());
                }
                Ok(n) => {
                    self.pos = 0;
                    self.filled = n;
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Level3Error::from(err)),
            }
        }
    }
}

impl<R: Read> Read for Bzip2Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_decompressed(buf).map_err(Level3Error::into_io)
    }
}
