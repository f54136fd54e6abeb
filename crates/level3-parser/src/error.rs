//! Error types for Level 3 decoding.

use std::io;

use thiserror::Error;

/// Result type for Level 3 decoder operations.
pub type Level3Result<T> = Result<T, Level3Error>;

/// Errors raised while decoding a Level 3 product.
///
/// Lower layers (the byte source, the bzip2 stream) surface through this type
/// unchanged; nothing is retried or recovered.
#[derive(Error, Debug)]
pub enum Level3Error {
    /// The byte source ended in the middle of a field.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    /// The byte source reported an I/O failure.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    /// The compressed payload is not a valid bzip2 stream.
    #[error("corrupted bzip2 input")]
    CorruptedInput,

    /// The bzip2 library could not obtain the memory it needed.
    #[error("bzip2 decompressor ran out of memory")]
    Overflow,

    /// A per-scan buffer could not be allocated.
    #[error("failed to allocate {requested} bytes for radial buffers")]
    OutOfMemory { requested: usize },

    /// The symbology block does not carry digital radar data.
    #[error("unsupported product type: message type {0}")]
    UnsupportedProductType(u8),

    /// The first symbology packet is not a digital radial data packet.
    #[error("unsupported graphic packet code: {0:#06x}")]
    UnsupportedGraphicPacketCode(u16),
}

impl Level3Error {
    /// Wrap this error in an `io::Error` so it can pass through `Read`
    /// adapters and be recovered intact on the other side.
    pub(crate) fn into_io(self) -> io::Error {
        let kind = match self {
            Level3Error::UnexpectedEndOfInput => io::ErrorKind::UnexpectedEof,
            Level3Error::Io(err) => return err,
            Level3Error::Overflow | Level3Error::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, self)
    }
}

impl From<io::Error> for Level3Error {
    fn from(err: io::Error) -> Self {
        let carries_decoder_error = err
            .get_ref()
            .is_some_and(|inner| inner.is::<Level3Error>());

        if carries_decoder_error {
            if let Some(Ok(inner)) = err.into_inner().map(|inner| inner.downcast::<Level3Error>()) {
                return *inner;
            }
            return Level3Error::CorruptedInput;
        }

        if err.kind() == io::ErrorKind::UnexpectedEof {
            Level3Error::UnexpectedEndOfInput
        } else {
            Level3Error::Io(err)
        }
    }
}
