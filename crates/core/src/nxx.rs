//! NXX availability tables.
//!
//! # Record Format
//!
//! ```text
//! +------------+--------------+-------+--------------------------+
//! | price_band | dial_pattern | flags | bitmap (100 bytes)       |
//! +------------+--------------+-------+--------------------------+
//! ```
//!
//! Bit `j` of the bitmap (LSB-first within each byte) says whether NXX
//! `200 + j` is enabled under this table. Tables carry no NPA of their own;
//! it comes from the owning NPA group (see [`NxxOwnership`]).

use crate::bitio::{BitReader, BitWriter};
use crate::error::{Error, Result};
use crate::layout::{record, LayoutPlan, NXX_BITMAP_LEN, NXX_TABLE_LEN};
use crate::npa::{DialPlan, NxxOwnership};
use serde::{Deserialize, Serialize};

/// Lowest NXX the bitmap can describe.
pub const FIRST_NXX: u16 = 200;

/// Number of NXX values per table (200..=999).
pub const NXX_SLOTS: usize = NXX_BITMAP_LEN * 8;

/// One NXX table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NxxTable {
    /// Derived from the owning NPA group; `None` when no group's span covers
    /// this table
    pub npa: Option<u16>,
    pub price_band: u8,
    pub dial_pattern: DialPlan,
    pub flags: u8,
    /// `entries[j]` is NXX `200 + j`; exactly 800 long
    pub entries: Vec<bool>,
}

impl NxxTable {
    /// Build a table with the given NXX values enabled.
    ///
    /// Values outside 200..=999 are ignored.
    pub fn with_enabled(
        price_band: u8,
        dial_pattern: DialPlan,
        flags: u8,
        enabled: impl IntoIterator<Item = u16>,
    ) -> Self {
        let mut entries = vec![false; NXX_SLOTS];
        for nxx in enabled {
            if let Some(slot) = slot_of(nxx) {
                entries[slot] = true;
            }
        }
        Self {
            npa: None,
            price_band,
            dial_pattern,
            flags,
            entries,
        }
    }

    pub fn is_enabled(&self, nxx: u16) -> bool {
        slot_of(nxx)
            .and_then(|slot| self.entries.get(slot).copied())
            .unwrap_or(false)
    }

    /// Enabled NXX values in ascending order.
    pub fn enabled_nxxs(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(j, _)| FIRST_NXX + j as u16)
    }

    fn parse(raw: &[u8], npa: Option<u16>) -> Self {
        Self {
            npa,
            price_band: raw[0],
            dial_pattern: DialPlan::from(raw[1]),
            flags: raw[2],
            entries: BitReader::new(&raw[3..3 + NXX_BITMAP_LEN]).collect(),
        }
    }

    /// Serialize to a full 103-byte record. `index` is only used for error
    /// context.
    ///
    /// # Errors
    /// - `Error::MissingField` if fewer than 800 entries are present
    /// - `Error::FieldOverflow` if more than 800 are present
    pub fn pack(&self, index: usize) -> Result<[u8; NXX_TABLE_LEN]> {
        let len = self.entries.len();
        if len < NXX_SLOTS {
            return Err(Error::MissingField {
                field: format!("nxx_tables[{}].entries[{}]", index, len),
            });
        }
        if len > NXX_SLOTS {
            return Err(Error::overflow(
                format!("nxx_tables[{}].entries", index),
                len,
                NXX_SLOTS,
            ));
        }

        let mut writer = BitWriter::with_capacity(NXX_BITMAP_LEN);
        for &bit in &self.entries {
            writer.write_bit(bit);
        }
        let bitmap = writer.finish();

        let mut out = [0u8; NXX_TABLE_LEN];
        out[0] = self.price_band;
        out[1] = self.dial_pattern.into();
        out[2] = self.flags;
        out[3..].copy_from_slice(&bitmap);
        Ok(out)
    }
}

fn slot_of(nxx: u16) -> Option<usize> {
    let slot = nxx.checked_sub(FIRST_NXX)? as usize;
    (slot < NXX_SLOTS).then_some(slot)
}

/// Read `count` NXX tables from `start`, attaching each to its owning NPA.
///
/// # Errors
/// `Error::OffsetOutOfRange` if a record falls outside the payload.
pub fn decode_nxx_tables(
    payload: &[u8],
    start: usize,
    count: u8,
    owners: &NxxOwnership,
) -> Result<Vec<NxxTable>> {
    (0..count as usize)
        .map(|i| {
            let raw = record(payload, "nxx table", start + i * NXX_TABLE_LEN, NXX_TABLE_LEN)?;
            Ok(NxxTable::parse(raw, owners.npa_for(i)))
        })
        .collect()
}

/// Write pre-packed NXX records into a planned payload.
pub fn encode_nxx_tables(payload: &mut [u8], plan: &LayoutPlan, packed: &[[u8; NXX_TABLE_LEN]]) {
    for (i, rec) in packed.iter().enumerate() {
        let at = plan.nxx_table_at(i);
        payload[at..at + NXX_TABLE_LEN].copy_from_slice(rec);
    }
}
