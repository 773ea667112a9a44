//! Session reports with JSON persistence.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::AttemptRecord;
use crate::settings::SessionSettings;
use crate::statistics::{compute_summary, table_rows, SessionSummary, SortDirection, SortKey, TableRow};

/// Everything recorded about one finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the game ended.
    pub created_at: DateTime<Utc>,
    /// Settings the game was played with.
    pub settings: SessionSettings,
    pub summary: SessionSummary,
    /// Solved problems in the order they were solved.
    pub history: Vec<AttemptRecord>,
}

impl SessionReport {
    pub fn new(settings: SessionSettings, history: Vec<AttemptRecord>) -> Self {
        let summary = compute_summary(&history, &settings);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            settings,
            summary,
            history,
        }
    }

    /// File name used when saving into a directory.
    pub fn file_name(&self) -> String {
        format!(
            "mathdrill-{}-{}.json",
            self.created_at.format("%Y%m%dT%H%M%S"),
            &self.id.simple().to_string()[..8]
        )
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved session report");
        Ok(())
    }

    /// Save into `dir` under [`SessionReport::file_name`] and return the path.
    pub fn save_in_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        self.save_json(&path)?;
        Ok(path)
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    pub fn rows(&self, key: SortKey, direction: SortDirection) -> Vec<TableRow> {
        table_rows(&self.history, key, direction)
    }

    /// Render the summary and the results table as Markdown.
    pub fn to_markdown(&self, key: SortKey, direction: SortDirection) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# Session {}", self.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(md);
        let _ = writeln!(md, "{}", self.summary.headline());
        let _ = writeln!(md);
        let _ = writeln!(md, "- Correct: {}", self.summary.correct);
        let _ = writeln!(md, "- Duration: {}s", self.summary.duration_secs);
        let _ = writeln!(md, "- Average: {:.2}s", self.summary.average_secs);
        if let Some(pace) = self.summary.target_pace_secs {
            let _ = writeln!(md, "- Target pace: {pace:.2}s");
        }
        if let Some(slowest) = &self.summary.slowest_problem {
            let _ = writeln!(
                md,
                "- Slowest problem: #{} `{}` ({:.2}s)",
                slowest.sequence, slowest.problem_text, slowest.elapsed_secs
            );
        }

        let rows = self.rows(key, direction);
        if rows.is_empty() {
            return md;
        }
        let _ = writeln!(md);
        let _ = writeln!(md, "| # | Problem | Category | Time (s) | Attempts |");
        let _ = writeln!(md, "|---|---------|----------|----------|----------|");
        for row in rows {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} | {} ({}) |",
                row.sequence,
                row.problem,
                row.category,
                row.time,
                row.attempt_count,
                row.attempts.replace('|', "\\|")
            );
        }
        md
    }
}
