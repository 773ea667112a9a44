//! The `mathdrill report` command.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

use mathdrill_core::report::SessionReport;
use mathdrill_core::statistics::{SortDirection, SortKey};

use crate::render;

pub fn execute(file: PathBuf, sort: String, desc: bool, format: String) -> Result<()> {
    let report = SessionReport::load_json(&file)?;
    let key: SortKey = sort.parse().map_err(|e: String| anyhow!(e))?;
    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    match format.as_str() {
        "markdown" | "md" => {
            print!("{}", report.to_markdown(key, direction));
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Session {} ({})",
                report.id,
                report
                    .created_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
            );
            print!("{}", render::summary(&report.summary));
            let rows = report.rows(key, direction);
            if !rows.is_empty() {
                println!("\n{}", render::rows(&rows));
            }
        }
    }

    Ok(())
}
