//! Sample ratefile generation for testing.
//!
//! Generates a random but structurally valid ratefile from a seed.
//!
//! # Design
//!
//! Generated files have:
//! - Price bands spread over every category, with a few sentinel rates
//! - NPA groups owning zero to two NXX tables each
//! - NXX tables ranging from nearly empty to nearly full
//! - A sparse surcharge grid
//!
//! Sparse tables leave long zero runs, so the payload compresses well and
//! the ratio in the metrics summary is meaningful.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratefile_core::{
    layout::MAX_COUNT,
    nxx::{FIRST_NXX, NXX_SLOTS},
    rate::{FREE, RESTRICTED, UNLIMITED},
    BandCategory, DialPlan, Header, NpaGroup, NxxTable, PriceBand, RateFile, Result, Surcharge,
    Surcharges,
};

/// Generate a sample ratefile.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `groups`: number of NPA groups
/// - `prices`: number of price bands
///
/// # Errors
/// `Error::FieldOverflow` if `groups` or `prices` exceeds 255.
pub fn generate_rate_file(seed: u64, groups: usize, prices: usize) -> Result<RateFile> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let price_bands = (0..prices).map(|_| generate_price_band(&mut rng)).collect();

    let mut tables_left = MAX_COUNT;
    let npa_groups: Vec<NpaGroup> = (0..groups)
        .map(|_| {
            let tables = rng.gen_range(0..=2usize).min(tables_left);
            tables_left -= tables;
            NpaGroup {
                npa: rng.gen_range(200..1000),
                nxx_table_count: tables as u8,
                band: rng.gen_range(0..8),
                dial_plan: DialPlan::from(rng.gen_range(0..4u8)),
                initial_price: rng.gen_range(1..40),
            }
        })
        .collect();

    let table_count: usize = npa_groups.iter().map(|g| g.nxx_table_count as usize).sum();
    let nxx_tables = (0..table_count)
        .map(|_| generate_nxx_table(&mut rng))
        .collect();

    let header = Header {
        is_ratefile: true,
        home_npa: rng.gen_range(200..1000).to_string(),
        home_nxx: rng.gen_range(200..1000).to_string(),
        description: format!("Sample rates {}", seed),
        ..Header::default()
    };

    RateFile::assemble(header, generate_surcharges(&mut rng), price_bands, npa_groups, nxx_tables)
}

fn generate_price_band(rng: &mut ChaCha8Rng) -> PriceBand {
    let rate = |rng: &mut ChaCha8Rng| match rng.gen_range(0..20) {
        0 => FREE,
        1 => UNLIMITED,
        2 => RESTRICTED,
        _ => rng.gen_range(1..60),
    };

    PriceBand {
        category: BandCategory::ALL[rng.gen_range(0..BandCategory::ALL.len())],
        sequence_in_category: 0,
        initial_rate: rate(rng),
        initial_time: [30, 60, 180][rng.gen_range(0..3)],
        additional_rate: rate(rng),
        additional_time: [30, 60][rng.gen_range(0..2)],
    }
}

fn generate_nxx_table(rng: &mut ChaCha8Rng) -> NxxTable {
    let density: f64 = rng.gen_range(0.0..1.0);
    let last = FIRST_NXX + NXX_SLOTS as u16;
    let enabled: Vec<u16> = (FIRST_NXX..last).filter(|_| rng.gen_bool(density)).collect();
    NxxTable::with_enabled(
        rng.gen_range(0..8),
        DialPlan::from(rng.gen_range(0..4u8)),
        0,
        enabled,
    )
}

fn generate_surcharges(rng: &mut ChaCha8Rng) -> Surcharges {
    let mut rows = Surcharges::default();
    for row in rows.iter_mut() {
        if !rng.gen_bool(0.5) {
            continue;
        }
        *row = Surcharge {
            coin: rng.gen_range(0..10),
            paof_bell: rng.gen_range(0..20),
            paof_comm: rng.gen_range(0..20),
            paof_collect: rng.gen_range(0..20),
            paof_addtnl: rng.gen_range(0..10),
            chip_card: rng.gen_range(0..10),
            spare: [0, 0],
        };
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratefile_core::Error;

    #[test]
    fn test_generate_rate_file() {
        let file = generate_rate_file(42, 5, 20).unwrap();
        assert_eq!(file.npa_groups.len(), 5);
        assert_eq!(file.price_bands.len(), 20);
        assert_eq!(file.header.band_counts.total(), 20);
        assert!(file.header.is_ratefile);
    }

    #[test]
    fn test_determinism() {
        let file1 = generate_rate_file(12345, 6, 30).unwrap();
        let file2 = generate_rate_file(12345, 6, 30).unwrap();

        assert_eq!(file1, file2);
    }

    #[test]
    fn test_different_seeds() {
        let file1 = generate_rate_file(1, 6, 30).unwrap();
        let file2 = generate_rate_file(2, 6, 30).unwrap();

        assert_ne!(file1, file2);
    }

    #[test]
    fn test_samples_round_trip() {
        for (seed, groups, prices) in [(7, 0, 0), (8, 1, 1), (9, 20, 100), (10, 255, 255)] {
            let file = generate_rate_file(seed, groups, prices).unwrap();
            let image = file.encode().unwrap();
            assert_eq!(RateFile::decode(&image).unwrap(), file);
        }
    }

    #[test]
    fn test_oversized_request() {
        assert!(matches!(
            generate_rate_file(1, 256, 0),
            Err(Error::FieldOverflow { value: 256, .. })
        ));
    }
}
