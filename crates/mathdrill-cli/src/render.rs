//! Terminal tables for summaries and result rows.

use comfy_table::{Cell, Table};

use mathdrill_core::statistics::{SessionSummary, TableRow};

/// Headline, totals and per-category means.
pub fn summary(summary: &SessionSummary) -> String {
    let mut out = String::new();
    out.push_str(&summary.headline());
    out.push('\n');
    out.push_str(&format!(
        "Score: {}  Time: {}s  Average: {:.2}s per answer",
        summary.correct, summary.duration_secs, summary.average_secs
    ));
    if let Some(pace) = summary.target_pace_secs {
        out.push_str(&format!("  Target pace: {pace:.2}s"));
    }
    out.push('\n');
    if let Some(slowest) = &summary.slowest_problem {
        out.push_str(&format!(
            "Slowest problem: #{} {} ({:.2}s)\n",
            slowest.sequence, slowest.problem_text, slowest.elapsed_secs
        ));
    }

    if !summary.per_category.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Category", "Solved", "Total (s)", "Mean (s)"]);
        for stats in &summary.per_category {
            table.add_row(vec![
                Cell::new(stats.category.label()),
                Cell::new(stats.count),
                Cell::new(format!("{:.2}", stats.total_secs)),
                Cell::new(format!("{:.2}", stats.mean_secs)),
            ]);
        }
        out.push_str(&format!("\n{table}\n"));
    }
    out
}

/// Attempt table in the given row order.
pub fn rows(rows: &[TableRow]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Problem", "Category", "Time (s)", "Tries", "Attempts"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.sequence),
            Cell::new(&row.problem),
            Cell::new(&row.category),
            Cell::new(&row.time),
            Cell::new(row.attempt_count),
            Cell::new(&row.attempts),
        ]);
    }
    table.to_string()
}
