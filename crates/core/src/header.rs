//! The fixed 268-byte ratefile header.
//!
//! # Header Format
//!
//! ```text
//! offset  width  field
//! 1       4      uncompressed payload size, u32 LE
//! 18      3      home NPA, ASCII, NUL padded
//! 21      3      home NXX, ASCII, NUL padded
//! 24      1      is-ratefile flag (1 = yes)
//! 152     8      band counts, one per category
//! 209     1      description length N
//! 210     N      description, ASCII
//! ```
//!
//! Every other byte is reserved. Decoding ignores reserved bytes; encoding
//! writes them as zero.

use crate::band::{CategoryCounts, CATEGORY_COUNT};
use crate::error::{Error, Result};
use crate::layout::HEADER_LEN;
use serde::{Deserialize, Serialize};

const UNCOMPRESSED_SIZE: usize = 1;
const HOME_NPA: usize = 18;
const HOME_NXX: usize = 21;
const CODE_WIDTH: usize = 3;
const IS_RATEFILE: usize = 24;
const BAND_COUNTS: usize = 152;
const DESCRIPTION_LEN: usize = 209;
const DESCRIPTION: usize = 210;

/// Longest description that fits inside the header block.
pub const DESCRIPTION_CAPACITY: usize = HEADER_LEN - DESCRIPTION;

/// Decoded ratefile header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub is_ratefile: bool,
    /// Length of the payload after zero-run expansion
    pub uncompressed_size: u32,
    pub home_npa: String,
    pub home_nxx: String,
    pub band_counts: CategoryCounts,
    pub description: String,
}

impl Header {
    /// Parse the header from the start of a ratefile.
    ///
    /// Only the first [`HEADER_LEN`] bytes are examined.
    ///
    /// # Errors
    /// - `Error::TruncatedStream` if fewer than 268 bytes are available
    /// - `Error::OffsetOutOfRange` if the description length runs past the
    ///   header block
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::TruncatedStream {
                offset: 0,
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }
        let block = &bytes[..HEADER_LEN];

        let uncompressed_size = u32::from_le_bytes([
            block[UNCOMPRESSED_SIZE],
            block[UNCOMPRESSED_SIZE + 1],
            block[UNCOMPRESSED_SIZE + 2],
            block[UNCOMPRESSED_SIZE + 3],
        ]);

        let mut band_counts = [0u8; CATEGORY_COUNT];
        band_counts.copy_from_slice(&block[BAND_COUNTS..BAND_COUNTS + CATEGORY_COUNT]);

        let description_len = block[DESCRIPTION_LEN] as usize;
        if description_len > DESCRIPTION_CAPACITY {
            return Err(Error::OffsetOutOfRange {
                table: "description",
                offset: DESCRIPTION,
                len: description_len,
                available: HEADER_LEN,
            });
        }
        let description = block[DESCRIPTION..DESCRIPTION + description_len]
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
            .collect();

        Ok(Self {
            is_ratefile: block[IS_RATEFILE] == 1,
            uncompressed_size,
            home_npa: read_code(&block[HOME_NPA..HOME_NPA + CODE_WIDTH]),
            home_nxx: read_code(&block[HOME_NXX..HOME_NXX + CODE_WIDTH]),
            band_counts: CategoryCounts(band_counts),
            description,
        })
    }

    /// Serialize the header into a fresh zero-filled block.
    ///
    /// Non-ASCII description characters are written as `?`.
    ///
    /// # Errors
    /// `Error::FieldOverflow` if a code is wider than 3 bytes or the
    /// description exceeds [`DESCRIPTION_CAPACITY`].
    pub fn encode(&self) -> Result<[u8; HEADER_LEN]> {
        let mut block = [0u8; HEADER_LEN];

        block[UNCOMPRESSED_SIZE..UNCOMPRESSED_SIZE + 4]
            .copy_from_slice(&self.uncompressed_size.to_le_bytes());
        write_code(&mut block[HOME_NPA..HOME_NPA + CODE_WIDTH], "home_npa", &self.home_npa)?;
        write_code(&mut block[HOME_NXX..HOME_NXX + CODE_WIDTH], "home_nxx", &self.home_nxx)?;
        block[IS_RATEFILE] = self.is_ratefile as u8;
        block[BAND_COUNTS..BAND_COUNTS + CATEGORY_COUNT].copy_from_slice(&self.band_counts.0);

        let description: Vec<u8> = self
            .description
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        if description.len() > DESCRIPTION_CAPACITY {
            return Err(Error::overflow(
                "description",
                description.len(),
                DESCRIPTION_CAPACITY,
            ));
        }
        block[DESCRIPTION_LEN] = description.len() as u8;
        block[DESCRIPTION..DESCRIPTION + description.len()].copy_from_slice(&description);

        Ok(block)
    }
}

/// Overwrite the size field of an already encoded header.
pub fn patch_uncompressed_size(block: &mut [u8], size: u32) {
    block[UNCOMPRESSED_SIZE..UNCOMPRESSED_SIZE + 4].copy_from_slice(&size.to_le_bytes());
}

fn read_code(raw: &[u8]) -> String {
    raw.iter()
        .take_while(|&&b| b != 0)
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect()
}

fn write_code(slot: &mut [u8], field: &str, value: &str) -> Result<()> {
    let bytes: Vec<u8> = value.bytes().filter(u8::is_ascii).collect();
    if bytes.len() > slot.len() {
        return Err(Error::overflow(field, bytes.len(), slot.len()));
    }
    slot[..bytes.len()].copy_from_slice(&bytes);
    Ok(())
}
