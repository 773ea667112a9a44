//! Core data model types for mathdrill.
//!
//! Problems, their answers, and the records kept for every solved problem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;
use crate::fraction::Fraction;

/// The four operation categories a problem can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Add,
    Sub,
    Mul,
    Div,
}

impl Category {
    /// All categories in their canonical order.
    pub const ALL: [Category; 4] = [Category::Add, Category::Sub, Category::Mul, Category::Div];

    /// Operator symbol shown in problem text.
    pub fn symbol(&self) -> &'static str {
        match self {
            Category::Add => "+",
            Category::Sub => "-",
            Category::Mul => "×",
            Category::Div => "÷",
        }
    }

    /// Human-readable name used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Add => "addition",
            Category::Sub => "subtraction",
            Category::Mul => "multiplication",
            Category::Div => "division",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Add => write!(f, "add"),
            Category::Sub => write!(f, "sub"),
            Category::Mul => write!(f, "mul"),
            Category::Div => write!(f, "div"),
        }
    }
}

impl FromStr for Category {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" | "addition" | "+" => Ok(Category::Add),
            "sub" | "subtraction" | "-" => Ok(Category::Sub),
            "mul" | "multiplication" | "x" | "*" => Ok(Category::Mul),
            "div" | "division" | "/" => Ok(Category::Div),
            other => Err(SettingsError::UnknownCategory(other.to_string())),
        }
    }
}

/// How a problem's answer is represented and judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Integer,
    Decimal,
    Fraction,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Integer => write!(f, "integer"),
            Representation::Decimal => write!(f, "decimal"),
            Representation::Fraction => write!(f, "fraction"),
        }
    }
}

/// The canonical answer attached to a problem at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Answer {
    /// Exact whole-number answer.
    Integer { value: i64 },
    /// Answer rounded to `places` decimal places.
    Decimal { value: f64, places: u32 },
    /// Exact rational answer.
    Fraction { value: Fraction },
}

impl Answer {
    pub fn representation(&self) -> Representation {
        match self {
            Answer::Integer { .. } => Representation::Integer,
            Answer::Decimal { .. } => Representation::Decimal,
            Answer::Fraction { .. } => Representation::Fraction,
        }
    }

    /// The answer as a plain number.
    pub fn as_f64(&self) -> f64 {
        match self {
            Answer::Integer { value } => *value as f64,
            Answer::Decimal { value, .. } => *value,
            Answer::Fraction { value } => value.to_f64(),
        }
    }

    pub fn fraction(&self) -> Option<Fraction> {
        match self {
            Answer::Fraction { value } => Some(*value),
            _ => None,
        }
    }

    pub fn decimal_places(&self) -> Option<u32> {
        match self {
            Answer::Decimal { places, .. } => Some(*places),
            _ => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Integer { value } => write!(f, "{value}"),
            Answer::Decimal { value, places } => write!(f, "{value:.prec$}", prec = *places as usize),
            Answer::Fraction { value } => write!(f, "{value}"),
        }
    }
}

/// A single generated problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Text shown to the user, e.g. `"12 ÷ 4 ="`.
    pub text: String,
    /// Operation category.
    pub category: Category,
    /// The canonical answer.
    pub answer: Answer,
}

impl Problem {
    pub fn representation(&self) -> Representation {
        self.answer.representation()
    }

    pub fn canonical_value(&self) -> f64 {
        self.answer.as_f64()
    }
}

/// One correctly solved problem from a timed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based position in the session history.
    pub sequence: usize,
    /// Text of the solved problem.
    pub problem_text: String,
    /// Canonical answer, including its representation.
    pub answer: Answer,
    /// Operation category.
    pub category: Category,
    /// Seconds between the problem appearing and the correct answer.
    pub elapsed_secs: f64,
    /// Every recorded submission for the problem, in order.
    pub attempts: Vec<String>,
}

impl AttemptRecord {
    pub fn representation(&self) -> Representation {
        self.answer.representation()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}
