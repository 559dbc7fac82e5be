//! Metrics for one decode or encode run.
//!
//! Collected by the caller around a codec call and printed at the end:
//! - File, compressed and payload sizes
//! - Compression ratio
//! - Table counts
//! - Timing
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. Use one per run.

use crate::layout::HEADER_LEN;
use crate::ratefile::RateFile;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    pub start_time: Instant,
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Whole file: header plus compressed payload
    pub file_bytes: u64,

    /// Compressed payload only
    pub compressed_bytes: u64,

    /// Payload after zero-run expansion
    pub payload_bytes: u64,

    // === Tables ===
    pub price_bands: u64,
    pub npa_groups: u64,
    pub nxx_tables: u64,

    /// Enabled NXX entries across every table
    pub enabled_nxx: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            file_bytes: 0,
            compressed_bytes: 0,
            payload_bytes: 0,
            price_bands: 0,
            npa_groups: 0,
            nxx_tables: 0,
            enabled_nxx: 0,
        }
    }

    /// Record the sizes and table counts of a ratefile and its binary image.
    pub fn record(&mut self, file: &RateFile, image_len: usize) {
        self.file_bytes = image_len as u64;
        self.compressed_bytes = image_len.saturating_sub(HEADER_LEN) as u64;
        self.payload_bytes = file.header.uncompressed_size as u64;
        self.price_bands = file.price_bands.len() as u64;
        self.npa_groups = file.npa_groups.len() as u64;
        self.nxx_tables = file.nxx_tables.len() as u64;
        self.enabled_nxx = file.enabled_nxx_count() as u64;
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compressed / expanded payload size.
    ///
    /// Returns 0.0 if nothing was recorded.
    pub fn compression_ratio(&self) -> f64 {
        if self.payload_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.payload_bytes as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Ratefile Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Sizes ===");
        println!("File: {} bytes", self.file_bytes);
        println!("Payload (compressed): {} bytes", self.compressed_bytes);
        println!("Payload (expanded): {} bytes", self.payload_bytes);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Tables ===");
        println!("Price bands: {}", self.price_bands);
        println!("NPA groups: {}", self.npa_groups);
        println!("NXX tables: {} ({} NXX enabled)", self.nxx_tables, self.enabled_nxx);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             file_bytes={}\n\
             compressed_bytes={}\n\
             payload_bytes={}\n\
             compression_ratio={:.4}\n\
             price_bands={}\n\
             npa_groups={}\n\
             nxx_tables={}\n\
             enabled_nxx={}\n",
            self.duration().as_millis(),
            self.file_bytes,
            self.compressed_bytes,
            self.payload_bytes,
            self.compression_ratio(),
            self.price_bands,
            self.npa_groups,
            self.nxx_tables,
            self.enabled_nxx,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
