//! ROM images: raw dumps of big-endian 32-bit words loaded at address 0.

use log::info;
use std::path::Path;
use thiserror::Error;

/// Words in the register header every ROM must initialize
pub const HEADER_WORDS: usize = 19;

const WORD_BYTES: usize = 4;

#[derive(Debug, Error)]
pub enum RomError {
    #[error("unable to read ROM: {0}")]
    Io(#[from] std::io::Error),

    #[error("ROM length {len} is not a whole number of 4-byte words")]
    Misaligned { len: usize },

    #[error("ROM has {words} words; the register header alone needs 19")]
    TooSmall { words: usize },
}

/// Decode a ROM image into memory words
pub fn decode(bytes: &[u8]) -> Result<Vec<i32>, RomError> {
    if bytes.len() % WORD_BYTES != 0 {
        return Err(RomError::Misaligned { len: bytes.len() });
    }
    let words: Vec<i32> = bytes
        .chunks_exact(WORD_BYTES)
        .map(|w| i32::from_be_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    if words.len() < HEADER_WORDS {
        return Err(RomError::TooSmall { words: words.len() });
    }
    Ok(words)
}

/// Encode memory words back into the ROM byte layout
pub fn encode(words: &[i32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// Read and decode a ROM file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<i32>, RomError> {
    let bytes = std::fs::read(path.as_ref())?;
    let words = decode(&bytes)?;
    info!(
        "Read {} words from {}",
        words.len(),
        path.as_ref().display()
    );
    Ok(words)
}
