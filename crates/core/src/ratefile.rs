//! Whole-file decode and encode.
//!
//! # File Format
//!
//! ```text
//! +---------------------+
//! | header (268 bytes)  |  see `header`
//! +---------------------+
//! | payload             |  zero-run compressed; expands to exactly
//! | (variable)          |  `header.uncompressed_size` bytes
//! +---------------------+
//! ```
//!
//! Decode reads the header, expands the payload, checks its length, then
//! reads the counter block, price bands, NPA groups, NXX tables (owned by
//! the groups) and the surcharge grid.
//!
//! Encode validates and packs everything first, plans the payload once,
//! fills it, compresses it and prepends the header with the real payload
//! length. Nothing is returned unless every step succeeded.

use crate::band::CATEGORY_COUNT;
use crate::error::{Error, Result};
use crate::header::{patch_uncompressed_size, Header};
use crate::layout::{checked_count, LayoutPlan, TableOffsets, HEADER_LEN};
use crate::npa::{decode_npa_groups, encode_npa_groups, NpaGroup, NxxOwnership};
use crate::nxx::{decode_nxx_tables, encode_nxx_tables, NxxTable};
use crate::prices::{
    category_counts, decode_price_bands, encode_price_bands, order_price_bands, PlanSummary,
    PriceBand,
};
use crate::runcodec::{compress, decompress};
use crate::surcharge::{decode_surcharges, encode_surcharges, Surcharges};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A fully decoded ratefile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateFile {
    pub header: Header,
    pub offsets: TableOffsets,
    pub surcharges: Surcharges,
    pub price_bands: Vec<PriceBand>,
    pub npa_groups: Vec<NpaGroup>,
    pub nxx_tables: Vec<NxxTable>,
}

impl RateFile {
    /// Build a new ratefile from its tables.
    ///
    /// Price bands are grouped by category (keeping their relative order)
    /// and renumbered, the tables get a compact layout, NXX tables get their
    /// owning NPA, and the header's band counts and payload size are filled
    /// in. The result encodes and decodes back to itself.
    ///
    /// # Errors
    /// Any error [`RateFile::encode`] would report for these tables.
    pub fn assemble(
        header: Header,
        surcharges: Surcharges,
        mut price_bands: Vec<PriceBand>,
        npa_groups: Vec<NpaGroup>,
        nxx_tables: Vec<NxxTable>,
    ) -> Result<Self> {
        price_bands.sort_by_key(|b| b.category);
        let mut next_sequence = [0u16; CATEGORY_COUNT];
        for band in &mut price_bands {
            let seq = &mut next_sequence[band.category.index()];
            *seq += 1;
            band.sequence_in_category = *seq;
        }
        let counts = category_counts(&price_bands)?;

        let owners = NxxOwnership::new(&npa_groups);
        let nxx_tables = nxx_tables
            .into_iter()
            .enumerate()
            .map(|(i, table)| NxxTable {
                npa: owners.npa_for(i),
                ..table
            })
            .collect::<Vec<_>>();

        let group_count = checked_count("group_count", npa_groups.len())?;
        let price_count = checked_count("price_count", price_bands.len())?;
        let offsets = TableOffsets::compact(group_count, price_count);
        let plan = LayoutPlan::new(npa_groups.len(), price_bands.len(), nxx_tables.len(), &offsets, 0)?;

        let header = Header {
            uncompressed_size: plan.payload_len as u32,
            band_counts: counts,
            ..header
        };

        Ok(Self {
            header,
            offsets,
            surcharges,
            price_bands,
            npa_groups,
            nxx_tables,
        })
    }

    /// Decode a complete ratefile image.
    ///
    /// # Errors
    /// - `Error::TruncatedStream` for a short header, a dangling run marker
    ///   or a payload that ends inside the counter block
    /// - `Error::SizeMismatch` if the payload length disagrees with the header
    /// - `Error::OffsetOutOfRange` if a table runs past the payload
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = Header::decode(bytes)?;
        let payload = decompress(&bytes[HEADER_LEN..])?;

        if payload.len() != header.uncompressed_size as usize {
            return Err(Error::SizeMismatch {
                expected: header.uncompressed_size as usize,
                actual: payload.len(),
            });
        }
        debug!(
            compressed = bytes.len() - HEADER_LEN,
            payload = payload.len(),
            "expanded payload"
        );

        let summary = PlanSummary::decode(&payload)?;
        if summary.category_counts.total() != summary.price_count as usize {
            warn!(
                categorized = summary.category_counts.total(),
                price_count = summary.price_count,
                "category counts disagree with price count"
            );
        }

        let price_bands = decode_price_bands(&payload, &summary)?;
        debug!(
            count = price_bands.len(),
            start = summary.offsets.price_band_start(),
            "decoded price bands"
        );

        let npa_groups = decode_npa_groups(&payload, summary.group_count)?;
        let owners = NxxOwnership::new(&npa_groups);
        if owners.covered() != summary.nxx_count as usize {
            warn!(
                owned = owners.covered(),
                nxx_count = summary.nxx_count,
                "npa groups do not own every nxx table"
            );
        }

        let nxx_tables = decode_nxx_tables(
            &payload,
            summary.offsets.nxx_table_start(),
            summary.nxx_count,
            &owners,
        )?;
        debug!(
            groups = npa_groups.len(),
            tables = nxx_tables.len(),
            start = summary.offsets.nxx_table_start(),
            "decoded npa groups and nxx tables"
        );

        let surcharges = decode_surcharges(&payload)?;

        Ok(Self {
            header,
            offsets: summary.offsets,
            surcharges,
            price_bands,
            npa_groups,
            nxx_tables,
        })
    }

    /// Encode to a complete ratefile image.
    ///
    /// The payload is at least `header.uncompressed_size` bytes long so a
    /// decoded file keeps its original payload length; the header written out
    /// always carries the real length.
    ///
    /// # Errors
    /// - `Error::FieldOverflow` for counts over 255 or oversized header text
    /// - `Error::MissingField` for an unset price band offset or short NXX
    ///   entry lists
    /// - `Error::OverlappingRegions` if the stored offsets collide
    pub fn encode(&self) -> Result<Vec<u8>> {
        let ordered = order_price_bands(&self.price_bands);
        let counts = category_counts(&ordered)?;

        let plan = LayoutPlan::new(
            self.npa_groups.len(),
            ordered.len(),
            self.nxx_tables.len(),
            &self.offsets,
            self.header.uncompressed_size as usize,
        )?;

        let packed = self
            .nxx_tables
            .iter()
            .enumerate()
            .map(|(i, table)| table.pack(i))
            .collect::<Result<Vec<_>>>()?;

        let mut header = self.header.encode()?;

        let owned = NxxOwnership::new(&self.npa_groups).covered();
        if owned != packed.len() {
            warn!(owned, tables = packed.len(), "npa groups do not own every nxx table");
        }

        let mut payload = plan.allocate();
        encode_surcharges(&mut payload, &self.surcharges);
        encode_price_bands(&mut payload, &plan, &counts, &ordered);
        encode_npa_groups(&mut payload, &plan, &self.npa_groups);
        encode_nxx_tables(&mut payload, &plan, &packed);

        let compressed = compress(&payload);
        patch_uncompressed_size(&mut header, plan.payload_len as u32);
        debug!(
            payload = payload.len(),
            compressed = compressed.len(),
            "encoded payload"
        );

        let mut out = Vec::with_capacity(HEADER_LEN + compressed.len());
        out.extend_from_slice(&header);
        out.extend_from_slice(&compressed);
        Ok(out)
    }

    /// Total enabled NXX entries across every table.
    pub fn enabled_nxx_count(&self) -> usize {
        self.nxx_tables
            .iter()
            .map(|t| t.entries.iter().filter(|&&on| on).count())
            .sum()
    }
}
