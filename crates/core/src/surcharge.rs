//! The surcharge grid at payload offset 800.
//!
//! Stored column-major: eight bytes of `coin` (one per category), then eight
//! of `paof_bell`, and so on. The last two columns are spare; their meaning
//! is unknown, so they are carried through unchanged.

use crate::band::CATEGORY_COUNT;
use crate::error::Result;
use crate::layout::{record, SURCHARGE_BASE, SURCHARGE_END};
use serde::{Deserialize, Serialize};

const COLUMNS: usize = 8;

/// Surcharges for one price category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surcharge {
    pub coin: u8,
    pub paof_bell: u8,
    pub paof_comm: u8,
    pub paof_collect: u8,
    pub paof_addtnl: u8,
    pub chip_card: u8,
    /// Columns at +48 and +56
    #[serde(default)]
    pub spare: [u8; 2],
}

impl Surcharge {
    fn columns(&self) -> [u8; COLUMNS] {
        [
            self.coin,
            self.paof_bell,
            self.paof_comm,
            self.paof_collect,
            self.paof_addtnl,
            self.chip_card,
            self.spare[0],
            self.spare[1],
        ]
    }
}

/// One surcharge row per category, indexed by `BandCategory::index`.
pub type Surcharges = [Surcharge; CATEGORY_COUNT];

pub fn decode_surcharges(payload: &[u8]) -> Result<Surcharges> {
    let grid = record(payload, "surcharge", SURCHARGE_BASE, SURCHARGE_END - SURCHARGE_BASE)?;
    let cell = |column: usize, row: usize| grid[column * CATEGORY_COUNT + row];

    let mut rows = Surcharges::default();
    for (i, row) in rows.iter_mut().enumerate() {
        *row = Surcharge {
            coin: cell(0, i),
            paof_bell: cell(1, i),
            paof_comm: cell(2, i),
            paof_collect: cell(3, i),
            paof_addtnl: cell(4, i),
            chip_card: cell(5, i),
            spare: [cell(6, i), cell(7, i)],
        };
    }
    Ok(rows)
}

/// Write the grid into a payload at least [`SURCHARGE_END`] bytes long.
pub fn encode_surcharges(payload: &mut [u8], rows: &Surcharges) {
    for (i, row) in rows.iter().enumerate() {
        for (column, value) in row.columns().into_iter().enumerate() {
            payload[SURCHARGE_BASE + column * CATEGORY_COUNT + i] = value;
        }
    }
}
