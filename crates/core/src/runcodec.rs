//! Zero-run compression for the ratefile payload.
//!
//! The payload region of a ratefile is mostly zeros (sparse tables, unused
//! fixed slots), so the format only compresses runs of `0x00`:
//!
//! ```text
//! 0x00 n   ->  n zero bytes (n = 1..=255)
//! b        ->  b literally (b != 0)
//! ```
//!
//! A lone zero is still written as `0x00 0x01`; the decoder always expects a
//! count byte after a marker. Runs longer than 255 are split.
//!
//! # Example
//! ```
//! use ratefile_core::runcodec::{compress, decompress};
//!
//! let raw = [7u8, 0, 0, 0, 9];
//! let packed = compress(&raw);
//! assert_eq!(packed, vec![7, 0, 3, 9]);
//! assert_eq!(decompress(&packed).unwrap(), raw);
//! ```

use crate::error::{Error, Result};

/// Marker byte introducing a zero run
const RUN_MARKER: u8 = 0x00;

/// Longest run a single count byte can describe
const MAX_RUN: usize = u8::MAX as usize;

/// Expand a zero-run encoded stream.
///
/// A count byte of 0 is accepted and expands to nothing; `compress` never
/// produces it.
///
/// # Errors
/// `Error::TruncatedStream` if the stream ends on a run marker.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 2);
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte == RUN_MARKER {
            let count = *input.get(i + 1).ok_or(Error::TruncatedStream {
                offset: i,
                needed: 2,
                available: input.len() - i,
            })?;
            output.resize(output.len() + count as usize, 0);
            i += 2;
        } else {
            output.push(byte);
            i += 1;
        }
    }

    Ok(output)
}

/// Zero-run encode a buffer.
///
/// Never fails: every byte buffer has an encoding.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] == 0 {
            let run = input[i..]
                .iter()
                .take(MAX_RUN)
                .take_while(|&&b| b == 0)
                .count();
            debug_assert!((1..=MAX_RUN).contains(&run));
            output.push(RUN_MARKER);
            output.push(run as u8);
            i += run;
        } else {
            output.push(input[i]);
            i += 1;
        }
    }

    output
}
