//! Integration tests for whole ratefiles.
//!
//! These tests verify end-to-end behavior: hand-laid binary images decode to
//! the expected model, models survive encode -> decode unchanged, and damaged
//! images fail with the right error.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratefile_core::{
    runcodec::{compress, decompress},
    BandCategory, CategoryCounts, DialPlan, Error, Header, NpaGroup, NxxTable, PriceBand,
    RateFile, Surcharge, Surcharges,
};

/// Lay out a payload the way an independent producer would, byte by byte.
fn hand_built_image() -> Vec<u8> {
    let mut payload = vec![0u8; 1203];

    // surcharges: coin column, then chip_card column
    payload[800] = 3;
    payload[807] = 4;
    payload[840 + 1] = 254;
    payload[856 + 2] = 0x5A; // second spare column

    // counters
    payload[864..872].copy_from_slice(&[2, 1, 0, 0, 0, 0, 0, 1]);
    payload[875..877].copy_from_slice(&[0x34, 0x12]); // npa group offset, unused
    payload[877..879].copy_from_slice(&1000u16.to_le_bytes());
    payload[879..881].copy_from_slice(&1100u16.to_le_bytes());
    payload[887] = 2;
    payload[888] = 4;
    payload[889] = 1;

    // npa groups
    payload[890..896].copy_from_slice(&[0xD4, 0x00, 1, 1, 3, 9]);
    payload[896..902].copy_from_slice(&[0x31, 0x01, 0, 2, 2, 8]);

    // price bands at 1000
    payload[1000..1016].copy_from_slice(&[
        2, 60, 1, 60, //
        4, 60, 2, 60, //
        10, 120, 5, 60, //
        255, 0, 255, 0,
    ]);

    // one nxx table at 1100
    payload[1100..1103].copy_from_slice(&[3, 1, 0x40]);
    payload[1103] = 0x20; // nxx 205
    payload[1103 + 99] = 0x80; // nxx 999

    let mut image = vec![0u8; 268];
    image[1..5].copy_from_slice(&(payload.len() as u32).to_le_bytes());
    image[18..24].copy_from_slice(b"305555");
    image[24] = 1;
    image[152..160].copy_from_slice(&[2, 1, 0, 0, 0, 0, 0, 1]);
    image[209] = 5;
    image[210..215].copy_from_slice(b"Miami");
    image.extend_from_slice(&compress(&payload));
    image
}

fn random_file(rng: &mut ChaCha8Rng) -> RateFile {
    let mut surcharges = Surcharges::default();
    for row in surcharges.iter_mut() {
        *row = Surcharge {
            coin: rng.gen(),
            paof_bell: rng.gen(),
            paof_comm: rng.gen(),
            paof_collect: rng.gen(),
            paof_addtnl: rng.gen(),
            chip_card: rng.gen(),
            spare: [rng.gen(), rng.gen()],
        };
    }

    let price_bands = (0..rng.gen_range(0..40))
        .map(|_| PriceBand {
            category: BandCategory::ALL[rng.gen_range(0..8)],
            sequence_in_category: 0,
            initial_rate: rng.gen(),
            initial_time: rng.gen(),
            additional_rate: rng.gen(),
            additional_time: rng.gen(),
        })
        .collect();

    let npa_groups: Vec<NpaGroup> = (0..rng.gen_range(0..12))
        .map(|_| NpaGroup {
            npa: rng.gen_range(200..1000),
            nxx_table_count: rng.gen_range(0..4),
            band: rng.gen_range(0..8),
            dial_plan: DialPlan::from(rng.gen_range(0..5u8)),
            initial_price: rng.gen(),
        })
        .collect();
    let table_count: usize = npa_groups.iter().map(|g| g.nxx_table_count as usize).sum();

    let nxx_tables = (0..table_count)
        .map(|_| {
            let density: f64 = rng.gen();
            let enabled: Vec<u16> = (200..1000).filter(|_| rng.gen_bool(density)).collect();
            NxxTable::with_enabled(rng.gen(), DialPlan::from(rng.gen_range(0..4u8)), rng.gen(), enabled)
        })
        .collect();

    let header = Header {
        is_ratefile: rng.gen(),
        home_npa: rng.gen_range(200..1000).to_string(),
        home_nxx: rng.gen_range(200..1000).to_string(),
        description: format!("generated file {}", rng.gen::<u32>()),
        ..Header::default()
    };

    RateFile::assemble(header, surcharges, price_bands, npa_groups, nxx_tables)
        .expect("random file should assemble")
}

#[test]
fn test_decode_hand_built_image() {
    let file = RateFile::decode(&hand_built_image()).expect("decode failed");

    assert!(file.header.is_ratefile);
    assert_eq!(file.header.home_npa, "305");
    assert_eq!(file.header.home_nxx, "555");
    assert_eq!(file.header.description, "Miami");
    assert_eq!(file.header.uncompressed_size, 1203);
    assert_eq!(file.header.band_counts, CategoryCounts([2, 1, 0, 0, 0, 0, 0, 1]));

    assert_eq!(file.offsets.price_band_offset, 1001);
    assert_eq!(file.offsets.nxx_table_offset, 1100);

    let classes: Vec<(BandCategory, u16)> = file
        .price_bands
        .iter()
        .map(|b| (b.category, b.sequence_in_category))
        .collect();
    assert_eq!(
        classes,
        vec![
            (BandCategory::Local, 1),
            (BandCategory::Local, 2),
            (BandCategory::Intralata, 1),
            (BandCategory::Misc, 1),
        ]
    );
    assert_eq!(file.price_bands[2].initial_time, 120);
    assert_eq!(file.price_bands[3].initial_rate_value().to_string(), "Restricted");

    assert_eq!(file.npa_groups.len(), 2);
    assert_eq!(file.npa_groups[0].npa, 212);
    assert_eq!(file.npa_groups[0].dial_plan, DialPlan::OnePlusTen);
    assert_eq!(file.npa_groups[1].npa, 305);

    let table = &file.nxx_tables[0];
    assert_eq!(table.npa, Some(212));
    assert_eq!(table.price_band, 3);
    assert_eq!(table.dial_pattern, DialPlan::OnePlusSeven);
    assert_eq!(table.flags, 0x40);
    assert_eq!(table.enabled_nxxs().collect::<Vec<_>>(), vec![205, 999]);

    assert_eq!(file.surcharges[0].coin, 3);
    assert_eq!(file.surcharges[7].coin, 4);
    assert_eq!(file.surcharges[1].chip_card, 254);
    assert_eq!(file.surcharges[2].spare, [0, 0x5A]);
}

#[test]
fn test_reencode_hand_built_image() {
    let image = hand_built_image();
    let file = RateFile::decode(&image).unwrap();
    let reencoded = file.encode().unwrap();

    // the unused npa group offset at 875 is not carried; every other byte is
    let mut original = decompress(&image[268..]).unwrap();
    original[875] = 0;
    original[876] = 0;
    assert_eq!(decompress(&reencoded[268..]).unwrap(), original);
    assert_eq!(&reencoded[..268], &image[..268]);
    assert_eq!(RateFile::decode(&reencoded).unwrap(), file);
}

#[test]
fn test_random_files_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x00C0_FFEE);

    for _ in 0..50 {
        let file = random_file(&mut rng);
        let image = file.encode().expect("encode failed");
        let decoded = RateFile::decode(&image).expect("decode failed");
        assert_eq!(decoded, file);
        assert_eq!(decoded.encode().unwrap(), image);
    }
}

#[test]
fn test_json_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let file = random_file(&mut rng);

    let json = serde_json::to_string(&file).unwrap();
    let parsed: RateFile = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, file);
    assert_eq!(parsed.encode().unwrap(), file.encode().unwrap());
}

#[test]
fn test_payload_length_off_by_one() {
    let mut image = hand_built_image();
    image[1..5].copy_from_slice(&1204u32.to_le_bytes());
    assert_eq!(
        RateFile::decode(&image),
        Err(Error::SizeMismatch {
            expected: 1204,
            actual: 1203,
        })
    );
}

#[test]
fn test_table_past_payload_end() {
    let image = hand_built_image();
    let mut payload = decompress(&image[268..]).unwrap();
    payload[889] = 2; // second nxx table would end at 1306

    let mut damaged = image[..268].to_vec();
    damaged.extend_from_slice(&compress(&payload));
    assert!(matches!(
        RateFile::decode(&damaged),
        Err(Error::OffsetOutOfRange {
            table: "nxx table",
            offset: 1203,
            ..
        })
    ));
}

#[test]
fn test_header_only_image() {
    let mut image = vec![0u8; 268];
    image[1..5].copy_from_slice(&0u32.to_le_bytes());
    // empty payload decodes, but the counter block is missing
    assert!(matches!(
        RateFile::decode(&image),
        Err(Error::TruncatedStream { .. })
    ));
    assert!(matches!(
        RateFile::decode(&image[..200]),
        Err(Error::TruncatedStream { needed: 268, .. })
    ));
}

#[test]
fn test_too_many_tables_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut file = random_file(&mut rng);
    file.nxx_tables = vec![NxxTable::with_enabled(0, DialPlan::SevenDigit, 0, []); 256];
    assert!(matches!(
        file.encode(),
        Err(Error::FieldOverflow { value: 256, max: 255, .. })
    ));
}
