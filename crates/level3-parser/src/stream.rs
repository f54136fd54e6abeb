//! Small helpers over `std::io::Read` shared by the header and body decoders.

use std::io::{self, Read};

use crate::error::{Level3Error, Level3Result};

/// Discard exactly `count` bytes from `reader`.
pub(crate) fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> Level3Result<()> {
    if count == 0 {
        return Ok(());
    }
    let skipped = io::copy(&mut reader.take(count), &mut io::sink())?;
    if skipped < count {
        return Err(Level3Error::UnexpectedEndOfInput);
    }
    Ok(())
}
