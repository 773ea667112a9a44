//! The `mathdrill play` command.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use mathdrill_core::error::SettingsError;
use mathdrill_core::evaluator::Verdict;
use mathdrill_core::model::Category;
use mathdrill_core::pacing::PaceStatus;
use mathdrill_core::report::SessionReport;
use mathdrill_core::session::{Phase, QuizSession, SubmitOutcome, TickOutcome, TimerHandle};
use mathdrill_core::settings::{load_settings_from, validate_settings, SessionSettings};
use mathdrill_core::statistics::SortKey;

use crate::render;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Seconds between "time left" announcements.
const ANNOUNCE_EVERY_SECS: u64 = 10;

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub duration: Option<u32>,
    pub target: Option<u32>,
    pub ops: Option<String>,
    pub decimals: Option<u32>,
    pub fractions: Option<i64>,
}

impl Overrides {
    pub fn apply(self, settings: &mut SessionSettings) -> Result<(), SettingsError> {
        if let Some(duration) = self.duration {
            settings.duration_secs = duration;
        }
        if let Some(target) = self.target {
            settings.target_score = target;
        }
        if let Some(ops) = self.ops {
            settings.operations = parse_ops(&ops)?;
        }
        if let Some(places) = self.decimals {
            settings.decimal.enabled = true;
            settings.decimal.places = places;
        }
        if let Some(max_range) = self.fractions {
            settings.fraction.enabled = true;
            settings.fraction.max_range = max_range;
        }
        Ok(())
    }
}

/// Parse a comma-separated category list. `none` or an empty list disables
/// every category.
fn parse_ops(list: &str) -> Result<BTreeSet<Category>, SettingsError> {
    if list.trim().eq_ignore_ascii_case("none") {
        return Ok(BTreeSet::new());
    }
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// What the input loop should do after a `:command`.
enum Control {
    Continue,
    Restarted(TimerHandle),
    Quit,
}

pub async fn execute(
    config: Option<PathBuf>,
    overrides: Overrides,
    seed: Option<u64>,
    save_report: Option<PathBuf>,
) -> Result<()> {
    let mut settings = load_settings_from(config.as_deref())?;
    overrides
        .apply(&mut settings)
        .context("invalid command-line settings")?;
    for w in validate_settings(&settings) {
        eprintln!("WARNING: {}", w.message);
    }

    let mut session = match seed {
        Some(seed) => QuizSession::with_seed(seed),
        None => QuizSession::new(),
    };

    let (tick_tx, mut tick_rx) = mpsc::channel::<TimerHandle>(16);
    let handle = session.start(settings, Instant::now())?;
    let mut timer = spawn_timer(handle, tick_tx.clone());
    let mut screen = Screen::new(&session);
    screen.game_started(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    // Without input the running game still has to time out.
                    stdin_open = false;
                    if session.phase() != Phase::Running {
                        break;
                    }
                    continue;
                };

                if let Some(command) = line.trim().strip_prefix(':') {
                    match run_command(command, &mut session)? {
                        Control::Continue => {}
                        Control::Restarted(handle) => {
                            timer.abort();
                            timer = spawn_timer(handle, tick_tx.clone());
                            screen = Screen::new(&session);
                            screen.game_started(&session);
                        }
                        Control::Quit => break,
                    }
                    continue;
                }

                let outcome = session.submit_answer(&line, Instant::now())?;
                screen.submitted(&session, &outcome);
            }
            Some(handle) = tick_rx.recv() => {
                match session.tick(handle, Instant::now())? {
                    TickOutcome::Stale => {}
                    TickOutcome::Running { remaining_secs, pace, .. } => {
                        screen.ticked(remaining_secs, pace);
                    }
                    TickOutcome::Ended(summary) => {
                        timer.abort();
                        println!("\nTime's up!\n");
                        print!("{}", render::summary(&summary));
                        if summary.has_answers() {
                            println!("\n{}", render::rows(&session.rows()));
                        }
                        if let Some(dir) = &save_report {
                            let report = SessionReport::new(
                                session.settings().clone(),
                                session.history().to_vec(),
                            );
                            // A failed save must not end the session.
                            match report.save_in_dir(dir) {
                                Ok(path) => eprintln!("Report saved to: {}", path.display()),
                                Err(e) => eprintln!("Error: failed to save report: {e:#}"),
                            }
                        }
                        if !stdin_open {
                            break;
                        }
                        screen.practice_started(&session);
                    }
                }
            }
        }
    }

    timer.abort();
    session.return_to_settings();
    Ok(())
}

fn spawn_timer(handle: TimerHandle, tx: mpsc::Sender<TimerHandle>) -> JoinHandle<()> {
    tracing::debug!(?handle, "timer started");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            if tx.send(handle).await.is_err() {
                break;
            }
        }
    })
}

fn run_command(command: &str, session: &mut QuizSession) -> Result<Control> {
    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "quit" | "q" => Ok(Control::Quit),
        "restart" | "r" => {
            let handle = session.restart(Instant::now())?;
            Ok(Control::Restarted(handle))
        }
        "sort" | "s" => {
            if session.phase() != Phase::Practice {
                println!("Results can be sorted once the game is over.");
                return Ok(Control::Continue);
            }
            match parts.next().map(str::parse::<SortKey>) {
                Some(Ok(key)) => {
                    let rows = session.sort_by(key);
                    let (key, direction) = session.sort_state();
                    println!("Sorted by {key} ({direction:?})");
                    println!("{}", render::rows(&rows));
                }
                Some(Err(e)) => println!("{e}"),
                None => println!("Usage: :sort <sequence|time|category|attempts>"),
            }
            Ok(Control::Continue)
        }
        other => {
            println!("Unknown command: :{other} (try :sort, :restart or :quit)");
            Ok(Control::Continue)
        }
    }
}

/// Terminal output state for one game.
struct Screen {
    last_pace: Option<PaceStatus>,
    next_announcement: u64,
}

impl Screen {
    fn new(session: &QuizSession) -> Self {
        let duration = session.settings().duration_secs as u64;
        Self {
            last_pace: None,
            next_announcement: duration.saturating_sub(ANNOUNCE_EVERY_SECS),
        }
    }

    fn game_started(&self, session: &QuizSession) {
        let settings = session.settings();
        println!(
            "{}s game. Type an answer and press Enter. Commands: :restart, :quit",
            settings.duration_secs
        );
        if let Some(secs) = mathdrill_core::statistics::target_pace(settings) {
            println!(
                "Target: {} correct ({secs:.2}s per answer)",
                settings.target_score
            );
        }
        println!("\n{}", session.problem_text());
    }

    fn practice_started(&self, session: &QuizSession) {
        match session.practice_category() {
            Some(category) => println!("\nPractice: {} (untimed)", category.label()),
            None => println!("\nPractice (untimed)"),
        }
        println!("Commands: :sort <sequence|time|category|attempts>, :restart, :quit");
        println!("\n{}", session.problem_text());
    }

    fn submitted(&self, session: &QuizSession, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Ignored => {
                if session.current_problem().is_none() {
                    println!("{}", session.problem_text());
                }
            }
            SubmitOutcome::Rejected(Verdict::Unparseable) => {
                println!("✗ not a valid answer, try again");
            }
            SubmitOutcome::Rejected(_) => println!("✗ try again"),
            SubmitOutcome::Accepted { score, next } => {
                if session.phase() == Phase::Running {
                    println!("✓ score {score}\n\n{next}");
                } else {
                    println!("✓\n\n{next}");
                }
            }
        }
    }

    fn ticked(&mut self, remaining_secs: f64, pace: Option<PaceStatus>) {
        if let Some(status) = pace {
            let changed = self
                .last_pace
                .map_or(true, |last| !last.same_kind(&status));
            if changed {
                println!("[{}]", status.describe());
            }
            self.last_pace = Some(status);
        }

        if self.next_announcement > 0 && remaining_secs <= self.next_announcement as f64 {
            println!("[{}s left]", self.next_announcement);
            self.next_announcement = self
                .next_announcement
                .saturating_sub(ANNOUNCE_EVERY_SECS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ops_accepts_lists() {
        let ops = parse_ops("add, mul").unwrap();
        assert_eq!(
            ops.into_iter().collect::<Vec<_>>(),
            vec![Category::Add, Category::Mul]
        );
        assert!(parse_ops("none").unwrap().is_empty());
        assert!(parse_ops("").unwrap().is_empty());
        assert!(parse_ops("add,pow").is_err());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut settings = SessionSettings::default();
        Overrides {
            duration: Some(30),
            target: Some(15),
            ops: Some("div".into()),
            decimals: Some(3),
            fractions: None,
        }
        .apply(&mut settings)
        .unwrap();

        assert_eq!(settings.duration_secs, 30);
        assert_eq!(settings.target_score, 15);
        assert_eq!(settings.enabled_categories(), vec![Category::Div]);
        assert!(settings.decimal.enabled);
        assert_eq!(settings.decimal.places, 3);
        assert!(!settings.fraction.enabled);
    }

    #[test]
    fn empty_overrides_keep_settings() {
        let mut settings = SessionSettings::default();
        Overrides::default().apply(&mut settings).unwrap();
        assert_eq!(settings, SessionSettings::default());
    }
}
