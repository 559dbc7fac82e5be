//! Price categories and the band classifier.
//!
//! A ratefile never stores the category of a price band. Instead, eight
//! per-category counts partition the linear sequence of bands:
//!
//! ```text
//! counts   = [2, 1, 0, 0, 0, 0, 0, 0]
//! index      0      1      2           3
//! category   local  local  intralata   misc (past every threshold)
//! sequence   1      2      1           1
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of price categories in the format.
pub const CATEGORY_COUNT: usize = 8;

/// One of the eight fixed tariff classes, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandCategory {
    Local,
    Intralata,
    Interlata,
    Interstate,
    Corridor,
    Canadian,
    Extended,
    Misc,
}

impl BandCategory {
    /// All categories in on-disk order.
    pub const ALL: [BandCategory; CATEGORY_COUNT] = [
        BandCategory::Local,
        BandCategory::Intralata,
        BandCategory::Interlata,
        BandCategory::Interstate,
        BandCategory::Corridor,
        BandCategory::Canadian,
        BandCategory::Extended,
        BandCategory::Misc,
    ];

    /// Zero-based slot of this category in every per-category array.
    pub fn index(self) -> usize {
        match self {
            BandCategory::Local => 0,
            BandCategory::Intralata => 1,
            BandCategory::Interlata => 2,
            BandCategory::Interstate => 3,
            BandCategory::Corridor => 4,
            BandCategory::Canadian => 5,
            BandCategory::Extended => 6,
            BandCategory::Misc => 7,
        }
    }

    /// Inverse of [`BandCategory::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short label used in printed tables.
    pub fn label(self) -> &'static str {
        match self {
            BandCategory::Local => "Local",
            BandCategory::Intralata => "IntraLATA",
            BandCategory::Interlata => "InterLATA",
            BandCategory::Interstate => "FCC",
            BandCategory::Corridor => "Corridor",
            BandCategory::Canadian => "Canadian",
            BandCategory::Extended => "Extended",
            BandCategory::Misc => "Misc",
        }
    }
}

impl fmt::Display for BandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Eight single-byte counts, one per category, in on-disk order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts(pub [u8; CATEGORY_COUNT]);

impl CategoryCounts {
    pub fn get(&self, category: BandCategory) -> u8 {
        self.0[category.index()]
    }

    /// Sum of all eight counts.
    pub fn total(&self) -> usize {
        self.0.iter().map(|&c| c as usize).sum()
    }

    /// Cumulative end index of each category (exclusive).
    pub fn thresholds(&self) -> [usize; CATEGORY_COUNT] {
        let mut out = [0usize; CATEGORY_COUNT];
        let mut running = 0;
        for (slot, &count) in out.iter_mut().zip(self.0.iter()) {
            running += count as usize;
            *slot = running;
        }
        out
    }
}

/// Where a linear band index lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: BandCategory,
    /// 1-based position within `category`
    pub sequence: u16,
}

/// Map a linear index to its category and sequence number.
///
/// Indices past the extended threshold always classify as misc, whether or
/// not the misc count covers them.
pub fn classify(counts: &CategoryCounts, index: usize) -> Classification {
    let thresholds = counts.thresholds();
    let mut start = 0;

    for (k, &end) in thresholds.iter().take(CATEGORY_COUNT - 1).enumerate() {
        if index < end {
            return Classification {
                category: BandCategory::ALL[k],
                sequence: (index - start + 1) as u16,
            };
        }
        start = end;
    }

    Classification {
        category: BandCategory::Misc,
        sequence: (index - start + 1) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(raw: [u8; 8]) -> CategoryCounts {
        CategoryCounts(raw)
    }

    #[test]
    fn test_documented_example() {
        let c = counts([2, 1, 0, 0, 0, 0, 0, 0]);
        let expect = [
            (BandCategory::Local, 1),
            (BandCategory::Local, 2),
            (BandCategory::Intralata, 1),
            (BandCategory::Misc, 1),
        ];
        for (i, &(category, sequence)) in expect.iter().enumerate() {
            assert_eq!(classify(&c, i), Classification { category, sequence });
        }
    }

    #[test]
    fn test_skips_empty_categories() {
        let c = counts([0, 0, 3, 0, 0, 1, 0, 2]);
        assert_eq!(classify(&c, 0).category, BandCategory::Interlata);
        assert_eq!(classify(&c, 2).sequence, 3);
        assert_eq!(classify(&c, 3).category, BandCategory::Canadian);
        assert_eq!(
            classify(&c, 5),
            Classification {
                category: BandCategory::Misc,
                sequence: 2
            }
        );
    }

    #[test]
    fn test_all_zero_counts_fall_through_to_misc() {
        let c = CategoryCounts::default();
        assert_eq!(
            classify(&c, 4),
            Classification {
                category: BandCategory::Misc,
                sequence: 5
            }
        );
    }

    #[test]
    fn test_thresholds_and_total() {
        let c = counts([1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(c.thresholds(), [1, 3, 6, 10, 15, 21, 28, 36]);
        assert_eq!(c.total(), 36);
        assert_eq!(c.get(BandCategory::Corridor), 5);
    }

    #[test]
    fn test_index_round_trip() {
        for (i, category) in BandCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(BandCategory::from_index(i), Some(*category));
        }
        assert_eq!(BandCategory::from_index(8), None);
    }
}
