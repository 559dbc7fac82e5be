//! Fixed offsets of the ratefile and the encode-time layout planner.
//!
//! # Payload Map
//!
//! ```text
//! 0    .. 800     reserved (zero on encode)
//! 800  .. 864     surcharge grid, 8 columns x 8 categories
//! 864  .. 872     per-category price band counts
//! 875  .. 877     npa group offset (read by some tools, never written)
//! 877  .. 879     price band offset - 1, u16 LE
//! 879  .. 881     nxx table offset, u16 LE
//! 887             group count
//! 888             price count
//! 889             nxx count
//! 890  ..         npa groups, 6 bytes each
//! (offset)        price bands, 4 bytes each
//! (offset)        nxx tables, 103 bytes each
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Size of the uncompressed header block; the compressed payload follows it.
pub const HEADER_LEN: usize = 268;

pub const SURCHARGE_BASE: usize = 800;
pub const SURCHARGE_END: usize = 864;
pub const CATEGORY_COUNTS: usize = 864;
pub const PRICE_BAND_OFFSET_SLOT: usize = 877;
pub const NXX_TABLE_OFFSET_SLOT: usize = 879;
pub const GROUP_COUNT: usize = 887;
pub const PRICE_COUNT: usize = 888;
pub const NXX_COUNT: usize = 889;
pub const NPA_GROUP_BASE: usize = 890;

/// End of the fixed counter region; every payload is at least this long.
pub const FIXED_REGION_END: usize = 890;

pub const PRICE_BAND_LEN: usize = 4;
pub const NPA_GROUP_LEN: usize = 6;
pub const NXX_TABLE_LEN: usize = 103;
pub const NXX_BITMAP_LEN: usize = 100;

/// Largest count a single-byte counter can hold.
pub const MAX_COUNT: usize = u8::MAX as usize;

/// Read one byte of a fixed field.
pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    buf.get(offset).copied().ok_or(Error::TruncatedStream {
        offset,
        needed: 1,
        available: buf.len().saturating_sub(offset),
    })
}

/// Read a little-endian u16 fixed field.
pub(crate) fn read_u16_le(buf: &[u8], offset: usize) -> Result<u16> {
    match buf.get(offset..offset + 2) {
        Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
        None => Err(Error::TruncatedStream {
            offset,
            needed: 2,
            available: buf.len().saturating_sub(offset),
        }),
    }
}

/// Borrow one table record, failing if it is not entirely inside `buf`.
pub(crate) fn record<'a>(
    buf: &'a [u8],
    table: &'static str,
    offset: usize,
    len: usize,
) -> Result<&'a [u8]> {
    buf.get(offset..offset + len).ok_or(Error::OffsetOutOfRange {
        table,
        offset,
        len,
        available: buf.len(),
    })
}

/// Where the variable tables live inside the payload.
///
/// `price_band_offset` follows the format's 1-based convention: the slot at
/// 877 stores `price_band_offset - 1`, which is also the byte offset of the
/// first price band record. `nxx_table_offset` is a plain byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOffsets {
    pub price_band_offset: u32,
    pub nxx_table_offset: u16,
}

impl TableOffsets {
    /// Tightest layout: price bands right after the NPA groups, NXX tables
    /// right after the price bands.
    pub fn compact(group_count: u8, price_count: u8) -> Self {
        let price_start = NPA_GROUP_BASE + group_count as usize * NPA_GROUP_LEN;
        let nxx_start = price_start + price_count as usize * PRICE_BAND_LEN;
        Self {
            price_band_offset: price_start as u32 + 1,
            // at most 890 + 6*255 + 4*255, well inside u16
            nxx_table_offset: nxx_start as u16,
        }
    }

    /// Decode from the two offset slots of a payload.
    pub(crate) fn decode(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            price_band_offset: read_u16_le(payload, PRICE_BAND_OFFSET_SLOT)? as u32 + 1,
            nxx_table_offset: read_u16_le(payload, NXX_TABLE_OFFSET_SLOT)?,
        })
    }

    /// Byte offset of the first price band record.
    pub fn price_band_start(&self) -> usize {
        (self.price_band_offset as usize).saturating_sub(1)
    }

    /// Byte offset of the first NXX table record.
    pub fn nxx_table_start(&self) -> usize {
        self.nxx_table_offset as usize
    }

    /// Value written to the price band offset slot.
    fn stored_price_band_offset(&self) -> Result<u16> {
        match self.price_band_offset {
            0 => Err(Error::MissingField {
                field: "price_band_offset".to_string(),
            }),
            n => u16::try_from(n - 1)
                .map_err(|_| Error::overflow("price_band_offset", n as usize, u16::MAX as usize + 1)),
        }
    }
}

/// Half-open byte range a table occupies in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    name: &'static str,
    start: usize,
    end: usize,
}

impl Region {
    fn overlaps(&self, other: &Region) -> bool {
        self.start < self.end && other.start < other.end
            && self.start < other.end && other.start < self.end
    }
}

/// The single authoritative payload layout for one encode call.
///
/// Built before the payload buffer is allocated; every table writer indexes
/// into the buffer through the positions recorded here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub payload_len: usize,
    pub group_count: u8,
    pub price_count: u8,
    pub nxx_count: u8,
    pub price_band_start: usize,
    pub nxx_table_start: usize,
    /// Value for the 877 slot
    pub stored_price_band_offset: u16,
    pub stored_nxx_table_offset: u16,
}

impl LayoutPlan {
    /// Plan a payload for the given table sizes.
    ///
    /// `min_len` lets the caller keep a payload at least as long as a
    /// previously declared size; pass 0 for the tightest fit.
    ///
    /// # Errors
    /// - `Error::FieldOverflow` if any count exceeds 255
    /// - `Error::MissingField` if the price band offset is unset
    /// - `Error::OverlappingRegions` if two written regions collide
    pub fn new(
        group_count: usize,
        price_count: usize,
        nxx_count: usize,
        offsets: &TableOffsets,
        min_len: usize,
    ) -> Result<Self> {
        let group_count = checked_count("group_count", group_count)?;
        let price_count = checked_count("price_count", price_count)?;
        let nxx_count = checked_count("nxx_count", nxx_count)?;
        let stored_price_band_offset = offsets.stored_price_band_offset()?;

        let price_band_start = offsets.price_band_start();
        let nxx_table_start = offsets.nxx_table_start();

        let fixed = Region {
            name: "fixed",
            start: SURCHARGE_BASE,
            end: NPA_GROUP_BASE + group_count as usize * NPA_GROUP_LEN,
        };
        let prices = Region {
            name: "price band",
            start: price_band_start,
            end: price_band_start + price_count as usize * PRICE_BAND_LEN,
        };
        let nxx = Region {
            name: "nxx table",
            start: nxx_table_start,
            end: nxx_table_start + nxx_count as usize * NXX_TABLE_LEN,
        };

        for (a, b) in [(&prices, &fixed), (&nxx, &fixed), (&prices, &nxx)] {
            if a.overlaps(b) {
                return Err(Error::OverlappingRegions {
                    first: a.name,
                    second: b.name,
                });
            }
        }

        let payload_len = [FIXED_REGION_END, fixed.end, prices.end, nxx.end, min_len]
            .into_iter()
            .max()
            .unwrap_or(FIXED_REGION_END);

        if payload_len > u32::MAX as usize {
            return Err(Error::overflow("uncompressed_size", payload_len, u32::MAX as usize));
        }

        Ok(Self {
            payload_len,
            group_count,
            price_count,
            nxx_count,
            price_band_start,
            nxx_table_start,
            stored_price_band_offset,
            stored_nxx_table_offset: offsets.nxx_table_offset,
        })
    }

    pub fn npa_group_at(&self, index: usize) -> usize {
        NPA_GROUP_BASE + index * NPA_GROUP_LEN
    }

    pub fn price_band_at(&self, index: usize) -> usize {
        self.price_band_start + index * PRICE_BAND_LEN
    }

    pub fn nxx_table_at(&self, index: usize) -> usize {
        self.nxx_table_start + index * NXX_TABLE_LEN
    }

    /// Allocate the zero-filled payload and write the fixed counters.
    pub fn allocate(&self) -> Vec<u8> {
        let mut payload = vec![0u8; self.payload_len];
        payload[GROUP_COUNT] = self.group_count;
        payload[PRICE_COUNT] = self.price_count;
        payload[NXX_COUNT] = self.nxx_count;
        payload[PRICE_BAND_OFFSET_SLOT..PRICE_BAND_OFFSET_SLOT + 2]
            .copy_from_slice(&self.stored_price_band_offset.to_le_bytes());
        payload[NXX_TABLE_OFFSET_SLOT..NXX_TABLE_OFFSET_SLOT + 2]
            .copy_from_slice(&self.stored_nxx_table_offset.to_le_bytes());
        payload
    }
}

pub(crate) fn checked_count(field: &str, value: usize) -> Result<u8> {
    u8::try_from(value).map_err(|_| Error::overflow(field, value, MAX_COUNT))
}
