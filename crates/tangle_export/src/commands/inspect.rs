//! Inspect command implementation.

use crate::Format;
use std::path::Path;
use tangle_core::{StoreConfig, Tangle};
use tangle_export::InspectReport;

/// Runs the inspect command.
pub fn run(path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let tangle = Tangle::open(path, &StoreConfig::new())?;
    let report = InspectReport::collect(&tangle)?;

    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Text => print_text_output(&report),
    }

    Ok(())
}

fn print_text_output(report: &InspectReport) {
    println!("Tangle: {}", report.path);
    println!();
    println!("Storage:");
    for store in [&report.transactions, &report.metadata] {
        println!(
            "  {:<13} {} ({} entries, {} skipped)",
            format!("{}:", store.name),
            format_size(store.size),
            store.entries,
            store.skipped
        );
    }
    println!("  {:<13} {}", "Total:", format_size(report.total_size()));
    println!();
    println!("Index:");
    println!("  Without record:   {}", report.orphan_metadata);
    println!("  Without metadata: {}", report.unindexed_transactions);
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
