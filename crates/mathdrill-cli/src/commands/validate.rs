//! The `mathdrill validate` command.

use std::path::PathBuf;

use anyhow::Result;

use mathdrill_core::settings::{load_settings, validate_settings};

pub fn execute(config_path: PathBuf) -> Result<()> {
    let settings = load_settings(&config_path)?;

    let ops: Vec<String> = settings
        .enabled_categories()
        .iter()
        .map(|c| c.to_string())
        .collect();
    println!(
        "Settings: {} ({}s, operations: {})",
        config_path.display(),
        settings.duration_secs,
        if ops.is_empty() {
            "none".to_string()
        } else {
            ops.join(", ")
        }
    );

    let warnings = validate_settings(&settings);
    for w in &warnings {
        println!("  WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Settings valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
