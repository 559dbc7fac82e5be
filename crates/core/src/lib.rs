//! ratefile-core: codec for zero-run compressed call-rating ratefiles
//!
//! A ratefile is a 268-byte header followed by a zero-run compressed payload.
//! The payload holds fixed-offset tables describing how calls are priced:
//! price bands, NPA groups, NXX availability bitmaps and surcharges.
//!
//! # Architecture
//!
//! - `runcodec`: zero-run compression of the payload
//! - `bitio`: LSB-first bit reader/writer for NXX bitmaps
//! - `layout`: fixed offsets and the encode-time layout planner
//! - `header`: the 268-byte header block
//! - `band`: price categories and the band classifier
//! - `prices`: summary counters and price band records
//! - `npa`: NPA groups and NXX ownership spans
//! - `nxx`: NXX availability tables
//! - `surcharge`: the surcharge grid
//! - `ratefile`: whole-file decode and encode
//! - `rate`: display formatting for rate bytes
//! - `metrics`: sizes and counts of a run
//!
//! # Example
//! ```
//! use ratefile_core::{Header, RateFile, Surcharges};
//!
//! let file = RateFile::assemble(
//!     Header::default(),
//!     Surcharges::default(),
//!     Vec::new(),
//!     Vec::new(),
//!     Vec::new(),
//! )?;
//! let bytes = file.encode()?;
//! assert_eq!(RateFile::decode(&bytes)?, file);
//! # Ok::<(), ratefile_core::Error>(())
//! ```

pub mod band;
pub mod bitio;
pub mod error;
pub mod header;
pub mod layout;
pub mod metrics;
pub mod npa;
pub mod nxx;
pub mod prices;
pub mod rate;
pub mod ratefile;
pub mod runcodec;
pub mod surcharge;

// Re-export commonly used types
pub use band::{BandCategory, CategoryCounts};
pub use error::{Error, Result};
pub use header::Header;
pub use layout::TableOffsets;
pub use npa::{DialPlan, NpaGroup};
pub use nxx::NxxTable;
pub use prices::PriceBand;
pub use rate::RateValue;
pub use ratefile::RateFile;
pub use surcharge::{Surcharge, Surcharges};
