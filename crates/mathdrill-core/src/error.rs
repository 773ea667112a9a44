//! Error types for problem generation, fraction arithmetic and settings.
//!
//! Wrong or malformed answers are not errors: they are reported as a
//! [`Verdict`](crate::evaluator::Verdict) and the problem stays current.

use thiserror::Error;

use crate::model::Category;

/// Errors raised by fraction construction, arithmetic and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FractionError {
    /// A fraction was constructed with a zero denominator.
    #[error("denominator must not be zero")]
    ZeroDenominator,

    /// Division by a fraction whose numerator is zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The reduced result does not fit into 64-bit integers.
    #[error("fraction arithmetic overflowed")]
    Overflow,

    /// The text is not an integer, simple fraction or mixed number.
    #[error("not a fraction: {0:?}")]
    Unparseable(String),
}

/// Errors raised while generating problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// Every category is disabled; the session shows a placeholder until
    /// the settings change.
    #[error("no operation category is enabled")]
    NoCategoryEnabled,

    /// The generator produced a zero divisor. This is an internal invariant
    /// violation and is never shown as a problem.
    #[error("generated a zero divisor for {0}")]
    DivisionByZero(Category),

    /// Operands from the configured ranges overflowed 64-bit arithmetic.
    #[error("operands overflowed while generating a problem for {0}")]
    Overflow(Category),

    /// Fraction arithmetic failed while computing an answer.
    #[error("fraction arithmetic failed: {0}")]
    Fraction(#[from] FractionError),

    /// The session was started with settings that fail validation.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

/// Errors raised when session settings fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// An operand range has its minimum above its maximum.
    #[error("{family} range {which}: min {min} is greater than max {max}")]
    InvertedRange {
        family: &'static str,
        which: u8,
        min: i64,
        max: i64,
    },

    /// The session duration must be at least one second.
    #[error("duration must be at least 1 second")]
    ZeroDuration,

    /// Too many decimal places were requested.
    #[error("decimal places must be between 1 and {max}, got {got}")]
    DecimalPlaces { got: u32, max: u32 },

    /// The fraction range must allow a denominator of at least 2.
    #[error("fraction range must be at least 2, got {0}")]
    FractionRange(i64),

    /// Extreme operands of a range family overflow 64-bit arithmetic.
    #[error("{family} ranges overflow 64-bit arithmetic")]
    RangeOverflow { family: &'static str },

    /// Division is enabled but the divisor range only contains zero.
    #[error("division is enabled but the divisor range only contains zero")]
    ZeroDivisorRange,

    /// A category name in the settings could not be recognised.
    #[error("unknown operation: {0}")]
    UnknownCategory(String),
}

impl QuizError {
    /// Returns `true` if this error is a configuration problem the user can
    /// fix by changing the settings, rather than an internal fault.
    pub fn is_configuration(&self) -> bool {
        matches!(self, QuizError::NoCategoryEnabled)
    }
}
