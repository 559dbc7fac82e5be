//! Price bands and the payload's summary counters.
//!
//! The counter block at 864..890 describes every variable table in the
//! payload: how many price bands fall in each category, how many NPA groups,
//! price bands and NXX tables exist, and where the variable tables start.
//! Price band records themselves are four bytes each:
//!
//! ```text
//! +--------------+--------------+-----------------+-----------------+
//! | initial_rate | initial_time | additional_rate | additional_time |
//! +--------------+--------------+-----------------+-----------------+
//! ```

use crate::band::{classify, BandCategory, CategoryCounts, CATEGORY_COUNT};
use crate::error::{Error, Result};
use crate::layout::{
    read_u8, record, LayoutPlan, TableOffsets, CATEGORY_COUNTS, GROUP_COUNT, MAX_COUNT,
    NXX_COUNT, PRICE_BAND_LEN, PRICE_COUNT,
};
use crate::rate::RateValue;
use serde::{Deserialize, Serialize};

/// One rate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    /// Derived from the category counts, not stored
    pub category: BandCategory,
    /// 1-based position within `category`, not stored
    pub sequence_in_category: u16,
    pub initial_rate: u8,
    pub initial_time: u8,
    pub additional_rate: u8,
    pub additional_time: u8,
}

impl PriceBand {
    pub fn initial_rate_value(&self) -> RateValue {
        RateValue(self.initial_rate)
    }

    pub fn additional_rate_value(&self) -> RateValue {
        RateValue(self.additional_rate)
    }

    fn write(&self, slot: &mut [u8]) {
        slot.copy_from_slice(&[
            self.initial_rate,
            self.initial_time,
            self.additional_rate,
            self.additional_time,
        ]);
    }
}

/// Counters and offsets stored in the fixed region of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub category_counts: CategoryCounts,
    pub group_count: u8,
    pub price_count: u8,
    pub nxx_count: u8,
    pub offsets: TableOffsets,
}

impl PlanSummary {
    /// Read the counter block of a decompressed payload.
    ///
    /// # Errors
    /// `Error::TruncatedStream` if the payload ends inside the counter block.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut counts = [0u8; CATEGORY_COUNT];
        for (i, slot) in counts.iter_mut().enumerate() {
            *slot = read_u8(payload, CATEGORY_COUNTS + i)?;
        }

        Ok(Self {
            category_counts: CategoryCounts(counts),
            group_count: read_u8(payload, GROUP_COUNT)?,
            price_count: read_u8(payload, PRICE_COUNT)?,
            nxx_count: read_u8(payload, NXX_COUNT)?,
            offsets: TableOffsets::decode(payload)?,
        })
    }
}

/// Read `summary.price_count` price bands and classify each one.
///
/// # Errors
/// `Error::OffsetOutOfRange` if a record falls outside the payload.
pub fn decode_price_bands(payload: &[u8], summary: &PlanSummary) -> Result<Vec<PriceBand>> {
    let start = summary.offsets.price_band_start();

    (0..summary.price_count as usize)
        .map(|i| {
            let raw = record(payload, "price band", start + i * PRICE_BAND_LEN, PRICE_BAND_LEN)?;
            let class = classify(&summary.category_counts, i);
            Ok(PriceBand {
                category: class.category,
                sequence_in_category: class.sequence,
                initial_rate: raw[0],
                initial_time: raw[1],
                additional_rate: raw[2],
                additional_time: raw[3],
            })
        })
        .collect()
}

/// Put price bands in on-disk order: grouped by category, then by sequence.
///
/// The sort is stable, so bands sharing a (category, sequence) pair keep
/// their relative order.
pub fn order_price_bands(bands: &[PriceBand]) -> Vec<PriceBand> {
    let mut ordered = bands.to_vec();
    ordered.sort_by_key(|b| (b.category, b.sequence_in_category));
    ordered
}

/// Per-category counts implied by a set of price bands.
///
/// # Errors
/// `Error::FieldOverflow` if one category holds more than 255 bands.
pub fn category_counts(bands: &[PriceBand]) -> Result<CategoryCounts> {
    let mut totals = [0usize; CATEGORY_COUNT];
    for band in bands {
        totals[band.category.index()] += 1;
    }

    let mut counts = [0u8; CATEGORY_COUNT];
    for (category, (&total, slot)) in BandCategory::ALL
        .iter()
        .zip(totals.iter().zip(counts.iter_mut()))
    {
        *slot = u8::try_from(total).map_err(|_| {
            Error::overflow(format!("category_counts.{:?}", category).to_lowercase(), total, MAX_COUNT)
        })?;
    }
    Ok(CategoryCounts(counts))
}

/// Write category counts and price band records into a planned payload.
///
/// `ordered` must already be in on-disk order (see [`order_price_bands`]).
pub fn encode_price_bands(
    payload: &mut [u8],
    plan: &LayoutPlan,
    counts: &CategoryCounts,
    ordered: &[PriceBand],
) {
    payload[CATEGORY_COUNTS..CATEGORY_COUNTS + CATEGORY_COUNT].copy_from_slice(&counts.0);

    for (i, band) in ordered.iter().enumerate() {
        let at = plan.price_band_at(i);
        band.write(&mut payload[at..at + PRICE_BAND_LEN]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FIXED_REGION_END, PRICE_BAND_OFFSET_SLOT};

    fn band(category: BandCategory, sequence: u16, rate: u8) -> PriceBand {
        PriceBand {
            category,
            sequence_in_category: sequence,
            initial_rate: rate,
            initial_time: 60,
            additional_rate: rate / 2,
            additional_time: 30,
        }
    }

    fn payload_with_bands(records: &[[u8; 4]], counts: [u8; 8]) -> Vec<u8> {
        let mut payload = vec![0u8; 1100];
        payload[864..872].copy_from_slice(&counts);
        payload[888] = records.len() as u8;
        // stored value is the byte offset; the model adds one
        payload[PRICE_BAND_OFFSET_SLOT..PRICE_BAND_OFFSET_SLOT + 2]
            .copy_from_slice(&1000u16.to_le_bytes());
        for (i, rec) in records.iter().enumerate() {
            payload[1000 + 4 * i..1004 + 4 * i].copy_from_slice(rec);
        }
        payload
    }

    #[test]
    fn test_summary_fixed_offsets() {
        let mut payload = vec![0u8; FIXED_REGION_END];
        payload[864..872].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        payload[877..881].copy_from_slice(&[0x10, 0x04, 0x20, 0x05]);
        payload[887] = 9;
        payload[888] = 36;
        payload[889] = 11;

        let summary = PlanSummary::decode(&payload).unwrap();
        assert_eq!(summary.category_counts, CategoryCounts([1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(summary.group_count, 9);
        assert_eq!(summary.price_count, 36);
        assert_eq!(summary.nxx_count, 11);
        assert_eq!(summary.offsets.price_band_offset, 0x0410 + 1);
        assert_eq!(summary.offsets.price_band_start(), 0x0410);
        assert_eq!(summary.offsets.nxx_table_offset, 0x0520);
    }

    #[test]
    fn test_summary_truncated() {
        let payload = vec![0u8; 880];
        assert!(matches!(
            PlanSummary::decode(&payload),
            Err(Error::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_decode_classifies_bands() {
        let payload = payload_with_bands(
            &[[10, 60, 5, 30], [12, 60, 6, 30], [20, 120, 10, 60], [254, 0, 255, 0]],
            [2, 1, 0, 0, 0, 0, 0, 0],
        );
        let summary = PlanSummary::decode(&payload).unwrap();
        let bands = decode_price_bands(&payload, &summary).unwrap();

        assert_eq!(bands.len(), 4);
        assert_eq!(bands[1].category, BandCategory::Local);
        assert_eq!(bands[1].sequence_in_category, 2);
        assert_eq!(bands[1].initial_rate, 12);
        assert_eq!(bands[2].category, BandCategory::Intralata);
        assert_eq!(bands[2].initial_time, 120);
        assert_eq!(bands[3].category, BandCategory::Misc);
        assert_eq!(bands[3].additional_rate, 255);
    }

    #[test]
    fn test_decode_out_of_range() {
        let mut payload = payload_with_bands(&[[1, 1, 1, 1]], [1, 0, 0, 0, 0, 0, 0, 0]);
        payload[888] = 30; // 30 records from 1000 runs past 1100
        let summary = PlanSummary::decode(&payload).unwrap();
        assert!(matches!(
            decode_price_bands(&payload, &summary),
            Err(Error::OffsetOutOfRange { table: "price band", .. })
        ));
    }

    #[test]
    fn test_order_groups_by_category() {
        let bands = [
            band(BandCategory::Misc, 1, 9),
            band(BandCategory::Local, 2, 2),
            band(BandCategory::Interstate, 1, 4),
            band(BandCategory::Local, 1, 1),
        ];
        let ordered = order_price_bands(&bands);
        let rates: Vec<u8> = ordered.iter().map(|b| b.initial_rate).collect();
        assert_eq!(rates, vec![1, 2, 4, 9]);

        let counts = category_counts(&ordered).unwrap();
        assert_eq!(counts, CategoryCounts([2, 0, 0, 1, 0, 0, 0, 1]));
    }

    #[test]
    fn test_category_overflow() {
        let bands: Vec<PriceBand> = (0..256)
            .map(|i| band(BandCategory::Canadian, i as u16 + 1, 1))
            .collect();
        assert_eq!(
            category_counts(&bands),
            Err(Error::overflow("category_counts.canadian", 256, 255))
        );
    }

    #[test]
    fn test_encode_then_decode() {
        let bands = vec![
            band(BandCategory::Local, 1, 3),
            band(BandCategory::Corridor, 1, 7),
            band(BandCategory::Corridor, 2, 8),
        ];
        let offsets = TableOffsets::compact(0, 3);
        let plan = LayoutPlan::new(0, 3, 0, &offsets, 0).unwrap();
        let counts = category_counts(&bands).unwrap();
        let mut payload = plan.allocate();
        encode_price_bands(&mut payload, &plan, &counts, &bands);

        assert_eq!(&payload[890..894], &[3, 60, 1, 30]);
        let summary = PlanSummary::decode(&payload).unwrap();
        assert_eq!(decode_price_bands(&payload, &summary).unwrap(), bands);
    }
}
