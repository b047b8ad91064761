use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::core::AppConfig;

/// Copy the SQLite file to `hookbin-<timestamp>.db` in the output
/// directory. SQLite database files are safe to copy while the server
/// is stopped; use the zip script for full project backups.
pub fn run(output: Option<String>) -> Result<()> {
    let config = AppConfig::default();
    let output_dir = output.unwrap_or_else(|| config.storage_path.clone());

    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let destination = Path::new(&output_dir).join(format!("hookbin-{}.db", stamp));

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir))?;
    fs::copy(&config.db_path, &destination)
        .with_context(|| format!("Failed to copy {} to {}", config.db_path, destination.display()))?;

    println!("Copied {} to {}", config.db_path, destination.display());
    Ok(())
}
