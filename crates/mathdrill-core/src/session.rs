//! The session controller.
//!
//! [`QuizSession`] owns every piece of mutable game state and changes it
//! only from its stimulus handlers: starting a game, submitting an answer,
//! a timer tick, sorting, and leaving the game. Handlers take the current
//! [`Instant`] so the controller never reads a clock itself.
//!
//! Each game gets a fresh [`TimerHandle`]. Starting, restarting or ending a
//! game invalidates the previous handle, so a late tick from an old timer is
//! reported as [`TickOutcome::Stale`] and never touches the new game.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::QuizError;
use crate::evaluator::{evaluate, Verdict};
use crate::generator::{generate, NO_CATEGORY_PLACEHOLDER};
use crate::model::{AttemptRecord, Category, Problem};
use crate::pacing::{is_time_up, PaceStatus, PaceTracker};
use crate::settings::SessionSettings;
use crate::statistics::{
    compute_summary, table_rows, SessionSummary, SortDirection, SortKey, TableRow,
};

/// Which part of the session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for settings.
    Idle,
    /// Timed, scored game.
    Running,
    /// Untimed, unscored practice after the game ended.
    Practice,
}

/// Identifies the timer of one game. Only the most recent handle is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    generation: u64,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Empty input, no problem on screen, or no game in progress.
    Ignored,
    /// Wrong or malformed answer; the same problem stays current.
    Rejected(Verdict),
    /// Correct answer; a new problem is current.
    Accepted {
        /// Score after this answer (unchanged in practice mode).
        score: u32,
        /// Text of the next problem.
        next: String,
    },
}

/// Result of a timer tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The tick came from a cancelled timer.
    Stale,
    /// The game is still running.
    Running {
        elapsed_secs: f64,
        remaining_secs: f64,
        pace: Option<PaceStatus>,
    },
    /// This tick ended the game. Reported exactly once per game.
    Ended(SessionSummary),
}

/// What is currently on screen.
#[derive(Debug, Clone)]
enum Slot {
    Problem(Problem),
    /// No category is enabled.
    Placeholder,
    Empty,
}

/// Everything that is reset when a game starts.
#[derive(Debug, Clone)]
struct GameState {
    score: u32,
    history: Vec<AttemptRecord>,
    slot: Slot,
    attempts: Vec<String>,
    game_started: Instant,
    question_started: Instant,
    practice_category: Option<Category>,
    sort_key: SortKey,
    sort_direction: SortDirection,
    pace: PaceTracker,
    summary: Option<SessionSummary>,
}

impl GameState {
    fn new(now: Instant) -> Self {
        Self {
            score: 0,
            history: Vec::new(),
            slot: Slot::Empty,
            attempts: Vec::new(),
            game_started: now,
            question_started: now,
            practice_category: None,
            sort_key: SortKey::Sequence,
            sort_direction: SortDirection::Ascending,
            pace: PaceTracker::new(),
            summary: None,
        }
    }
}

/// Session controller for the quiz.
pub struct QuizSession<R: Rng = StdRng> {
    rng: R,
    settings: SessionSettings,
    phase: Phase,
    timer_generation: u64,
    state: GameState,
}

impl QuizSession<StdRng> {
    /// A session with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A reproducible session.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for QuizSession<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            settings: SessionSettings::default(),
            phase: Phase::Idle,
            timer_generation: 0,
            state: GameState::new(Instant::now()),
        }
    }

    /// Start a new timed game.
    ///
    /// Cancels any previous timer and resets all game state in one step
    /// before the first problem is generated.
    pub fn start(
        &mut self,
        settings: SessionSettings,
        now: Instant,
    ) -> Result<TimerHandle, QuizError> {
        settings.validate()?;

        let handle = self.cancel_timer();
        self.settings = settings;
        self.state = GameState::new(now);
        self.phase = Phase::Running;

        tracing::info!(
            operations = ?self.settings.enabled_categories(),
            duration_secs = self.settings.duration_secs,
            target_score = self.settings.target_score,
            "game started"
        );
        self.advance(now)?;
        Ok(handle)
    }

    /// Start again with the same settings.
    pub fn restart(&mut self, now: Instant) -> Result<TimerHandle, QuizError> {
        self.start(self.settings.clone(), now)
    }

    /// Leave the game or practice loop and go back to the settings view.
    pub fn return_to_settings(&mut self) {
        self.cancel_timer();
        self.phase = Phase::Idle;
        self.state.slot = Slot::Empty;
        self.state.attempts.clear();
    }

    /// Submit a raw answer for the current problem.
    ///
    /// Every non-empty submission is kept verbatim in the attempt list,
    /// including malformed ones. Correct answers during the timed game raise
    /// the score and are appended to the history; in practice mode they only
    /// move on to the next problem.
    pub fn submit_answer(&mut self, raw: &str, now: Instant) -> Result<SubmitOutcome, QuizError> {
        if self.phase == Phase::Idle {
            return Ok(SubmitOutcome::Ignored);
        }
        let Slot::Problem(problem) = &self.state.slot else {
            return Ok(SubmitOutcome::Ignored);
        };

        let verdict = evaluate(problem, raw);
        if verdict == Verdict::Empty {
            return Ok(SubmitOutcome::Ignored);
        }
        self.state.attempts.push(raw.to_string());
        if !verdict.is_accepted() {
            return Ok(SubmitOutcome::Rejected(verdict));
        }

        if self.phase == Phase::Running {
            let problem = problem.clone();
            let attempts = std::mem::take(&mut self.state.attempts);
            let elapsed = now
                .saturating_duration_since(self.state.question_started)
                .as_secs_f64();
            self.state.score += 1;
            self.record_success(problem, attempts, elapsed);
        }

        self.advance(now)?;
        Ok(SubmitOutcome::Accepted {
            score: self.state.score,
            next: self.problem_text().to_string(),
        })
    }

    /// Handle one periodic timer tick.
    pub fn tick(&mut self, handle: TimerHandle, now: Instant) -> Result<TickOutcome, QuizError> {
        if handle.generation != self.timer_generation || self.phase != Phase::Running {
            return Ok(TickOutcome::Stale);
        }

        let elapsed_secs = self.elapsed_secs(now);
        if is_time_up(elapsed_secs, &self.settings) {
            return self.end_game(now).map(TickOutcome::Ended);
        }

        let pace = self
            .state
            .pace
            .update(elapsed_secs, self.state.score, &self.settings);
        Ok(TickOutcome::Running {
            elapsed_secs,
            remaining_secs: self.settings.duration_secs as f64 - elapsed_secs,
            pace,
        })
    }

    /// Sort the results table by `key`. Choosing the current key again flips
    /// the direction; a new key starts ascending.
    pub fn sort_by(&mut self, key: SortKey) -> Vec<TableRow> {
        if self.state.sort_key == key {
            self.state.sort_direction = self.state.sort_direction.toggled();
        } else {
            self.state.sort_key = key;
            self.state.sort_direction = SortDirection::Ascending;
        }
        self.rows()
    }

    /// Results table rows in the current sort order.
    pub fn rows(&self) -> Vec<TableRow> {
        table_rows(
            &self.state.history,
            self.state.sort_key,
            self.state.sort_direction,
        )
    }

    pub fn sort_state(&self) -> (SortKey, SortDirection) {
        (self.state.sort_key, self.state.sort_direction)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.state.history
    }

    /// Submissions so far for the current problem.
    pub fn attempts(&self) -> &[String] {
        &self.state.attempts
    }

    pub fn practice_category(&self) -> Option<Category> {
        self.state.practice_category
    }

    /// Summary of the last finished game.
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.state.summary.as_ref()
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        match &self.state.slot {
            Slot::Problem(problem) => Some(problem),
            _ => None,
        }
    }

    /// Text to show for the current problem, or the placeholder.
    pub fn problem_text(&self) -> &str {
        match &self.state.slot {
            Slot::Problem(problem) => &problem.text,
            Slot::Placeholder => NO_CATEGORY_PLACEHOLDER,
            Slot::Empty => "",
        }
    }

    /// Seconds since the game started.
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.state.game_started)
            .as_secs_f64()
    }

    fn cancel_timer(&mut self) -> TimerHandle {
        self.timer_generation += 1;
        TimerHandle {
            generation: self.timer_generation,
        }
    }

    fn record_success(&mut self, problem: Problem, attempts: Vec<String>, elapsed_secs: f64) {
        let record = AttemptRecord {
            sequence: self.state.history.len() + 1,
            problem_text: problem.text,
            answer: problem.answer,
            category: problem.category,
            elapsed_secs,
            attempts,
        };
        tracing::debug!(
            sequence = record.sequence,
            category = %record.category,
            elapsed_secs,
            "recorded solved problem"
        );
        self.state.history.push(record);
    }

    fn end_game(&mut self, now: Instant) -> Result<SessionSummary, QuizError> {
        self.cancel_timer();
        let summary = compute_summary(&self.state.history, &self.settings);
        self.state.practice_category = summary.slowest_category;
        self.state.summary = Some(summary.clone());
        self.phase = Phase::Practice;

        tracing::info!(
            score = self.state.score,
            slowest = ?summary.slowest_category,
            "game over"
        );
        self.advance(now)?;
        Ok(summary)
    }

    /// Replace the current problem. In practice mode the category is pinned
    /// to the practice category.
    fn advance(&mut self, now: Instant) -> Result<(), QuizError> {
        let forced = match self.phase {
            Phase::Practice => self.state.practice_category,
            _ => None,
        };
        self.state.attempts.clear();
        self.state.question_started = now;
        let (slot, result) = match generate(&self.settings, forced, &mut self.rng) {
            Ok(problem) => (Slot::Problem(problem), Ok(())),
            Err(QuizError::NoCategoryEnabled) => (Slot::Placeholder, Ok(())),
            Err(e) => {
                tracing::error!("problem generation failed: {e}");
                (Slot::Empty, Err(e))
            }
        };
        self.state.slot = slot;
        result
    }
}
