//! NPA groups and NXX table ownership.
//!
//! # Record Format
//!
//! ```text
//! +-----------+-----------------+------+-----------+---------------+
//! | npa (2)   | nxx_table_count | band | dial_plan | initial_price |
//! | u16 LE    | u8              | u8   | u8        | u8            |
//! +-----------+-----------------+------+-----------+---------------+
//! ```
//!
//! Groups start at payload offset 890. Their order matters: group `k` owns
//! the next `nxx_table_count` NXX tables after those owned by groups
//! `0..k`.

use crate::error::Result;
use crate::layout::{record, LayoutPlan, NPA_GROUP_BASE, NPA_GROUP_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Digits a caller must dial to reach a number.
///
/// Codes outside the four known plans are kept as `Other` so they survive a
/// decode/encode cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum DialPlan {
    SevenDigit,
    OnePlusSeven,
    TenDigit,
    OnePlusTen,
    Other(u8),
}

impl From<u8> for DialPlan {
    fn from(code: u8) -> Self {
        match code {
            0 => DialPlan::SevenDigit,
            1 => DialPlan::OnePlusSeven,
            2 => DialPlan::TenDigit,
            3 => DialPlan::OnePlusTen,
            n => DialPlan::Other(n),
        }
    }
}

impl From<DialPlan> for u8 {
    fn from(plan: DialPlan) -> u8 {
        match plan {
            DialPlan::SevenDigit => 0,
            DialPlan::OnePlusSeven => 1,
            DialPlan::TenDigit => 2,
            DialPlan::OnePlusTen => 3,
            DialPlan::Other(n) => n,
        }
    }
}

impl fmt::Display for DialPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialPlan::SevenDigit => f.write_str("7 digit"),
            DialPlan::OnePlusSeven => f.write_str("1 + 7 digit"),
            DialPlan::TenDigit => f.write_str("10 digit (NPA)"),
            DialPlan::OnePlusTen => f.write_str("1 + 10 digit (NPA)"),
            DialPlan::Other(n) => write!(f, "Unknown ({})", n),
        }
    }
}

/// An area code and the NXX tables that belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpaGroup {
    pub npa: u16,
    /// Number of consecutive NXX tables this group owns
    pub nxx_table_count: u8,
    pub band: u8,
    pub dial_plan: DialPlan,
    pub initial_price: u8,
}

impl NpaGroup {
    fn parse(raw: &[u8]) -> Self {
        Self {
            npa: u16::from_le_bytes([raw[0], raw[1]]),
            nxx_table_count: raw[2],
            band: raw[3],
            dial_plan: DialPlan::from(raw[4]),
            initial_price: raw[5],
        }
    }

    fn write(&self, slot: &mut [u8]) {
        let [lo, hi] = self.npa.to_le_bytes();
        slot.copy_from_slice(&[
            lo,
            hi,
            self.nxx_table_count,
            self.band,
            self.dial_plan.into(),
            self.initial_price,
        ]);
    }
}

/// Read `count` NPA groups from offset 890.
///
/// # Errors
/// `Error::OffsetOutOfRange` if a record falls outside the payload.
pub fn decode_npa_groups(payload: &[u8], count: u8) -> Result<Vec<NpaGroup>> {
    (0..count as usize)
        .map(|i| {
            let raw = record(payload, "npa group", NPA_GROUP_BASE + i * NPA_GROUP_LEN, NPA_GROUP_LEN)?;
            Ok(NpaGroup::parse(raw))
        })
        .collect()
}

/// Write NPA groups into a planned payload, preserving their order.
pub fn encode_npa_groups(payload: &mut [u8], plan: &LayoutPlan, groups: &[NpaGroup]) {
    for (i, group) in groups.iter().enumerate() {
        let at = plan.npa_group_at(i);
        group.write(&mut payload[at..at + NPA_GROUP_LEN]);
    }
}

/// Partition of NXX table indices into per-group spans.
///
/// Built once from the groups in record order; group `k` owns
/// `[end[k-1], end[k])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NxxOwnership {
    ends: Vec<usize>,
    npas: Vec<u16>,
}

impl NxxOwnership {
    pub fn new(groups: &[NpaGroup]) -> Self {
        let mut ends = Vec::with_capacity(groups.len());
        let mut running = 0;
        for group in groups {
            running += group.nxx_table_count as usize;
            ends.push(running);
        }
        Self {
            ends,
            npas: groups.iter().map(|g| g.npa).collect(),
        }
    }

    /// Total number of tables the groups claim.
    pub fn covered(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// NPA of the group whose span contains table `index`, if any.
    pub fn npa_for(&self, index: usize) -> Option<u16> {
        let owner = self.ends.partition_point(|&end| end <= index);
        self.npas.get(owner).copied()
    }
}
