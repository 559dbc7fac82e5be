//! Human-readable tables for a decoded ratefile.

use ratefile_core::{RateFile, RateValue};
use std::fmt::Write;

/// Render every table of `file` as plain text.
pub fn render(file: &RateFile) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, file);
    out
}

fn write_report(out: &mut String, file: &RateFile) -> std::fmt::Result {
    let header = &file.header;
    writeln!(out, "=== Header ===")?;
    writeln!(out, "Ratefile:    {}", if header.is_ratefile { "yes" } else { "no" })?;
    writeln!(out, "Home NPA-NXX: {}-{}", header.home_npa, header.home_nxx)?;
    writeln!(out, "Description: {}", header.description)?;
    writeln!(out, "Payload:     {} bytes", header.uncompressed_size)?;
    writeln!(out)?;

    writeln!(out, "=== Price Bands ({}) ===", file.price_bands.len())?;
    writeln!(
        out,
        "{:<11} {:>5} {:>10} {:>5} {:>10} {:>5}",
        "Band", "Index", "InitR", "InitT", "AddR", "AddT"
    )?;
    for band in &file.price_bands {
        writeln!(
            out,
            "{:<11} {:>5} {:>10} {:>5} {:>10} {:>5}",
            band.category.label(),
            band.sequence_in_category,
            band.initial_rate_value().to_string(),
            band.initial_time,
            band.additional_rate_value().to_string(),
            band.additional_time,
        )?;
    }
    writeln!(out)?;

    writeln!(out, "=== NPA Groups ({}) ===", file.npa_groups.len())?;
    writeln!(out, "{:>4} {:>6} {:>4} {:<10} {:>10}", "NPA", "Tables", "Band", "Dial", "Initial")?;
    for group in &file.npa_groups {
        writeln!(
            out,
            "{:>4} {:>6} {:>4} {:<10} {:>10}",
            group.npa,
            group.nxx_table_count,
            group.band,
            group.dial_plan.to_string(),
            RateValue(group.initial_price).to_string(),
        )?;
    }
    writeln!(out)?;

    writeln!(out, "=== NXX Tables ({}) ===", file.nxx_tables.len())?;
    writeln!(out, "{:>5} {:>4} {:>4} {:<10} {:>5} {:>7}", "Table", "NPA", "Band", "Dial", "Flags", "Enabled")?;
    for (i, table) in file.nxx_tables.iter().enumerate() {
        let npa = table.npa.map_or_else(|| "-".to_string(), |n| n.to_string());
        writeln!(
            out,
            "{:>5} {:>4} {:>4} {:<10} {:>#5x} {:>7}",
            i,
            npa,
            table.price_band,
            table.dial_pattern.to_string(),
            table.flags,
            table.enabled_nxxs().count(),
        )?;
    }
    writeln!(out)?;

    writeln!(out, "=== Surcharges ===")?;
    writeln!(
        out,
        "{:>3} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Row", "Coin", "PAOF Bell", "PAOF Comm", "Collect", "Addtnl", "Chip Card"
    )?;
    for (i, row) in file.surcharges.iter().enumerate() {
        writeln!(
            out,
            "{:>3} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            i,
            RateValue(row.coin).to_string(),
            RateValue(row.paof_bell).to_string(),
            RateValue(row.paof_comm).to_string(),
            RateValue(row.paof_collect).to_string(),
            RateValue(row.paof_addtnl).to_string(),
            RateValue(row.chip_card).to_string(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratefile_core::{BandCategory, DialPlan, Header, NpaGroup, NxxTable, PriceBand, Surcharges};

    #[test]
    fn test_render_tables() {
        let bands = vec![PriceBand {
            category: BandCategory::Interlata,
            sequence_in_category: 0,
            initial_rate: 5,
            initial_time: 60,
            additional_rate: 255,
            additional_time: 60,
        }];
        let groups = vec![NpaGroup {
            npa: 415,
            nxx_table_count: 1,
            band: 2,
            dial_plan: DialPlan::OnePlusTen,
            initial_price: 0,
        }];
        let tables = vec![NxxTable::with_enabled(2, DialPlan::TenDigit, 1, [200, 201, 999])];
        let header = Header {
            home_npa: "415".into(),
            home_nxx: "555".into(),
            description: "Bay".into(),
            ..Header::default()
        };
        let file = RateFile::assemble(header, Surcharges::default(), bands, groups, tables).unwrap();

        let text = render(&file);
        assert!(text.contains("Home NPA-NXX: 415-555"));
        assert!(text.contains("InterLATA"));
        assert!(text.contains("0.25"));
        assert!(text.contains("Restricted"));
        assert!(text.contains("=== NXX Tables (1) ==="));
        assert!(text.contains(" 415 "));
        assert_eq!(text.lines().filter(|l| l.contains("Free")).count(), 9);
    }
}
