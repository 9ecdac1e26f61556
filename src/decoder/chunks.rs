//! Chunked-transfer decode for variable-length columns.
//!
//! Character and binary columns arrive through repeated get-data calls
//! whose final length is unknown in advance. Each loop runs to
//! completion within one fetch call; chunks are appended straight into
//! a growable buffer, so nothing intermediate outlives the loop.

use crate::engine::{Chunk, Engine, Indicator};

/// Bytes requested per get-data call on a character column.
pub(crate) const TEXT_CHUNK_SIZE: usize = 128;
/// Bytes requested per get-data call on a binary column.
pub(crate) const BLOB_CHUNK_SIZE: usize = 512;

/// How many of a chunk's bytes to trust, given the engine's indicator.
///
/// The indicator reports bytes remaining before the call; on the final
/// chunk that is less than the buffer size, otherwise the engine filled
/// the buffer. An engine that cannot report a total fills the buffer
/// too.
fn trusted_len(indicator: Indicator, capacity: usize) -> usize {
    match indicator {
        Indicator::Bytes(remaining) => remaining.min(capacity),
        Indicator::NoTotal => capacity,
        // handled before we get here
        Indicator::Null => 0,
    }
}

/// Stream a character column into one string.
///
/// `None` means the column is null. A null indicator discovered after
/// the first chunk also yields `None`, discarding whatever was decoded
/// so far.
pub(crate) fn read_text<E: Engine>(
    engine: &mut E,
    stmt: &mut E::Stmt,
    column: u16,
) -> Option<String> {
    let mut out = Vec::new();
    let mut buf = [0u8; TEXT_CHUNK_SIZE];

    loop {
        match engine.get_text_chunk(stmt, column, &mut buf) {
            Chunk::NoData => break,
            Chunk::Data(Indicator::Null) => return None,
            Chunk::Data(indicator) => {
                let trusted = trusted_len(indicator, TEXT_CHUNK_SIZE);
                out.extend_from_slice(&buf[..trusted]);
            }
        }
    }

    // Decoded once the whole column is in hand, so multi-byte sequences
    // split across a chunk boundary survive.
    Some(String::from_utf8_lossy(&out).into_owned())
}

/// Stream a binary column into one contiguous byte sequence.
pub(crate) fn read_blob<E: Engine>(
    engine: &mut E,
    stmt: &mut E::Stmt,
    column: u16,
) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    let mut buf = [0u8; BLOB_CHUNK_SIZE];

    loop {
        match engine.get_binary_chunk(stmt, column, &mut buf) {
            Chunk::NoData => break,
            Chunk::Data(Indicator::Null) => return None,
            Chunk::Data(indicator) => {
                let trusted = trusted_len(indicator, BLOB_CHUNK_SIZE);
                out.extend_from_slice(&buf[..trusted]);
            }
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trusted_len_caps_at_capacity() {
        assert_eq!(trusted_len(Indicator::Bytes(64), 128), 64);
        assert_eq!(trusted_len(Indicator::Bytes(128), 128), 128);
        assert_eq!(trusted_len(Indicator::Bytes(4096), 128), 128);
        assert_eq!(trusted_len(Indicator::NoTotal, 512), 512);
    }
}
