//! Post-game analytics over the history of solved problems.
//!
//! The summary groups records by category in the order categories first
//! appear, picks the category with the strictly largest mean time, and
//! projects records into sortable table rows.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{AttemptRecord, Category};
use crate::settings::SessionSettings;

/// Timing statistics for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    /// Number of solved problems.
    pub count: usize,
    /// Sum of solve times in seconds.
    pub total_secs: f64,
    /// Mean solve time in seconds.
    pub mean_secs: f64,
}

/// The single slowest solved problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowestProblem {
    pub sequence: usize,
    pub problem_text: String,
    pub elapsed_secs: f64,
}

/// End-of-session analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Number of correctly answered problems.
    pub correct: usize,
    /// Configured session length in seconds.
    pub duration_secs: u32,
    /// Session length divided by correct answers; 0 when nothing was solved.
    pub average_secs: f64,
    /// Per-category statistics in first-encountered order.
    pub per_category: Vec<CategoryStats>,
    /// Category with the largest mean time.
    pub slowest_category: Option<Category>,
    /// Problem with the longest solve time.
    pub slowest_problem: Option<SlowestProblem>,
    /// Seconds per answer needed to hit the target score.
    pub target_pace_secs: Option<f64>,
}

impl SessionSummary {
    pub fn has_answers(&self) -> bool {
        self.correct > 0
    }

    /// One-line verdict for the results screen.
    pub fn headline(&self) -> String {
        match self.slowest_category {
            Some(category) if self.has_answers() => format!(
                "You answered {} questions correctly. Your slowest category was {}.",
                self.correct,
                category.to_string().to_uppercase()
            ),
            _ => "You didn't answer any questions correctly. Try again!".to_string(),
        }
    }

    pub fn stats_for(&self, category: Category) -> Option<&CategoryStats> {
        self.per_category.iter().find(|s| s.category == category)
    }
}

/// Seconds per correct answer needed to reach the target score, if one is set.
pub fn target_pace(settings: &SessionSettings) -> Option<f64> {
    settings
        .pacing_enabled()
        .then(|| settings.duration_secs as f64 / settings.target_score as f64)
}

/// Analyse a finished session.
pub fn compute_summary(history: &[AttemptRecord], settings: &SessionSettings) -> SessionSummary {
    let mut per_category: Vec<CategoryStats> = Vec::new();
    for record in history {
        match per_category
            .iter_mut()
            .find(|s| s.category == record.category)
        {
            Some(stats) => {
                stats.count += 1;
                stats.total_secs += record.elapsed_secs;
            }
            None => per_category.push(CategoryStats {
                category: record.category,
                count: 1,
                total_secs: record.elapsed_secs,
                mean_secs: 0.0,
            }),
        }
    }
    for stats in &mut per_category {
        stats.mean_secs = stats.total_secs / stats.count as f64;
    }

    // Strict comparison keeps the first category on ties.
    let mut slowest_category: Option<&CategoryStats> = None;
    for stats in &per_category {
        if slowest_category.map_or(true, |best| stats.mean_secs > best.mean_secs) {
            slowest_category = Some(stats);
        }
    }
    let slowest_category = slowest_category.map(|s| s.category);

    let mut slowest_problem: Option<&AttemptRecord> = None;
    for record in history {
        if slowest_problem.map_or(true, |best| record.elapsed_secs > best.elapsed_secs) {
            slowest_problem = Some(record);
        }
    }
    let slowest_problem = slowest_problem.map(|r| SlowestProblem {
        sequence: r.sequence,
        problem_text: r.problem_text.clone(),
        elapsed_secs: r.elapsed_secs,
    });

    let correct = history.len();
    let average_secs = if correct == 0 {
        0.0
    } else {
        settings.duration_secs as f64 / correct as f64
    };

    SessionSummary {
        correct,
        duration_secs: settings.duration_secs,
        average_secs,
        per_category,
        slowest_category,
        slowest_problem,
        target_pace_secs: target_pace(settings),
    }
}

/// Column a results table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Sequence,
    Time,
    Category,
    /// Number of attempts, not their content.
    Attempts,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Sequence => write!(f, "sequence"),
            SortKey::Time => write!(f, "time"),
            SortKey::Category => write!(f, "category"),
            SortKey::Attempts => write!(f, "attempts"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequence" | "seq" | "index" | "#" => Ok(SortKey::Sequence),
            "time" | "elapsed" => Ok(SortKey::Time),
            "category" | "cat" | "type" => Ok(SortKey::Category),
            "attempts" | "tries" => Ok(SortKey::Attempts),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

fn compare(a: &AttemptRecord, b: &AttemptRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Sequence => a.sequence.cmp(&b.sequence),
        SortKey::Time => a.elapsed_secs.total_cmp(&b.elapsed_secs),
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::Attempts => a.attempt_count().cmp(&b.attempt_count()),
    }
}

/// Stable sort of the history; equal keys keep their relative order in
/// both directions.
pub fn sort_history(
    history: &[AttemptRecord],
    key: SortKey,
    direction: SortDirection,
) -> Vec<AttemptRecord> {
    let mut sorted = history.to_vec();
    match direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| compare(a, b, key)),
        SortDirection::Descending => sorted.sort_by(|a, b| compare(b, a, key)),
    }
    sorted
}

/// A record formatted for a results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub sequence: usize,
    /// Problem text followed by its answer.
    pub problem: String,
    pub category: String,
    /// Solve time with two decimals.
    pub time: String,
    pub attempt_count: usize,
    /// All attempts joined with `", "`.
    pub attempts: String,
}

impl From<&AttemptRecord> for TableRow {
    fn from(record: &AttemptRecord) -> Self {
        Self {
            sequence: record.sequence,
            problem: format!("{} {}", record.problem_text, record.answer),
            category: record.category.to_string(),
            time: format!("{:.2}", record.elapsed_secs),
            attempt_count: record.attempt_count(),
            attempts: record.attempts.join(", "),
        }
    }
}

/// Sort the history and project it into table rows.
pub fn table_rows(
    history: &[AttemptRecord],
    key: SortKey,
    direction: SortDirection,
) -> Vec<TableRow> {
    sort_history(history, key, direction)
        .iter()
        .map(TableRow::from)
        .collect()
}
