//! Live pacing against a target score.
//!
//! The target pace is linear: after `score` correct answers the player is
//! expected to have used `score × duration / target` seconds.

use serde::{Deserialize, Serialize};

use crate::settings::SessionSettings;

/// Where the player stands relative to the target pace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaceStatus {
    /// The target score has been reached.
    GoalMet,
    /// On or ahead of pace; `deviation_secs` is zero or negative.
    Ahead { deviation_secs: f64 },
    /// Behind pace; `deviation_secs` is positive.
    Behind { deviation_secs: f64 },
}

impl PaceStatus {
    pub fn deviation_secs(&self) -> Option<f64> {
        match self {
            PaceStatus::GoalMet => None,
            PaceStatus::Ahead { deviation_secs } | PaceStatus::Behind { deviation_secs } => {
                Some(*deviation_secs)
            }
        }
    }

    /// Signed deviation with one decimal, e.g. `+5.0s`.
    pub fn deviation_label(&self) -> String {
        match self.deviation_secs() {
            Some(secs) => format!("{secs:+.1}s"),
            None => "--".to_string(),
        }
    }

    /// Text for a status line.
    pub fn describe(&self) -> String {
        match self {
            PaceStatus::GoalMet => "Goal met!".to_string(),
            PaceStatus::Ahead { .. } => format!("On pace ({})", self.deviation_label()),
            PaceStatus::Behind { .. } => format!("Behind pace ({})", self.deviation_label()),
        }
    }

    /// Whether two statuses fall in the same bucket, ignoring the deviation.
    pub fn same_kind(&self, other: &PaceStatus) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Compare elapsed time against the linear target pace.
///
/// Returns `None` when pacing is disabled (`target_score == 0`).
pub fn pace_status(elapsed_secs: f64, score: u32, settings: &SessionSettings) -> Option<PaceStatus> {
    if !settings.pacing_enabled() {
        return None;
    }
    if score >= settings.target_score {
        return Some(PaceStatus::GoalMet);
    }

    let per_answer = settings.duration_secs as f64 / settings.target_score as f64;
    let expected = score as f64 * per_answer;
    let deviation_secs = elapsed_secs - expected;
    Some(if deviation_secs <= 0.0 {
        PaceStatus::Ahead { deviation_secs }
    } else {
        PaceStatus::Behind { deviation_secs }
    })
}

/// Whether the timed part of the session is over.
pub fn is_time_up(elapsed_secs: f64, settings: &SessionSettings) -> bool {
    elapsed_secs >= settings.duration_secs as f64
}

/// Pace status that stays at [`PaceStatus::GoalMet`] once reached.
#[derive(Debug, Clone, Default)]
pub struct PaceTracker {
    goal_met: bool,
    last: Option<PaceStatus>,
}

impl PaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the status for one tick.
    pub fn update(
        &mut self,
        elapsed_secs: f64,
        score: u32,
        settings: &SessionSettings,
    ) -> Option<PaceStatus> {
        let status = if self.goal_met {
            Some(PaceStatus::GoalMet)
        } else {
            pace_status(elapsed_secs, score, settings)
        };
        self.goal_met = matches!(status, Some(PaceStatus::GoalMet));
        self.last = status;
        status
    }

    pub fn last(&self) -> Option<PaceStatus> {
        self.last
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
