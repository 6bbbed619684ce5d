//! Export command implementation.

use std::path::PathBuf;
use tangle_core::StoreConfig;
use tangle_export::{export, ExportConfig, OpenMode};

/// Runs the export command.
pub fn run(
    db_path: PathBuf,
    output: PathBuf,
    truncate: bool,
    limit: Option<u64>,
    verify_checksums: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mode = if truncate {
        OpenMode::Truncate
    } else {
        OpenMode::Append
    };
    let config = ExportConfig::new(db_path)
        .output(output)
        .mode(mode)
        .limit(limit)
        .store(StoreConfig::new().verify_checksums(verify_checksums));

    let stats = export(&config)?;
    println!("{stats}");
    Ok(())
}
