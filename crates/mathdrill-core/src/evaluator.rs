//! Answer checking.
//!
//! Fraction answers are compared exactly after parsing the input as a
//! fraction. Everything else is parsed as a float and compared against the
//! canonical answer with a small tolerance.

use serde::{Deserialize, Serialize};

use crate::fraction::Fraction;
use crate::model::{Answer, Problem};

/// Accepted distance from a decimal answer.
pub const DECIMAL_TOLERANCE: f64 = 0.01;

/// Accepted distance from an integer answer; only absorbs float round-off.
pub const INTEGER_TOLERANCE: f64 = 0.001;

/// Outcome of checking one raw submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing but whitespace was submitted.
    Empty,
    /// The input is not a number (or not a fraction, for fraction problems).
    Unparseable,
    /// A well-formed answer that does not match.
    Incorrect,
    Correct,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Judge `raw` against the problem's canonical answer.
pub fn evaluate(problem: &Problem, raw: &str) -> Verdict {
    let input = raw.trim();
    if input.is_empty() {
        return Verdict::Empty;
    }

    let verdict = match problem.answer {
        Answer::Fraction { value } => match input.parse::<Fraction>() {
            Ok(given) if given == value => Verdict::Correct,
            Ok(_) => Verdict::Incorrect,
            Err(_) => Verdict::Unparseable,
        },
        Answer::Decimal { value, .. } => check_float(input, value, DECIMAL_TOLERANCE),
        Answer::Integer { value } => check_float(input, value as f64, INTEGER_TOLERANCE),
    };

    tracing::debug!(problem = %problem.text, input, ?verdict, "evaluated answer");
    verdict
}

fn check_float(input: &str, expected: f64, tolerance: f64) -> Verdict {
    match input.parse::<f64>() {
        Ok(given) if !given.is_finite() => Verdict::Unparseable,
        Ok(given) if (given - expected).abs() < tolerance => Verdict::Correct,
        Ok(_) => Verdict::Incorrect,
        Err(_) => Verdict::Unparseable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn integer_problem(value: i64) -> Problem {
        Problem {
            text: "test".into(),
            category: Category::Add,
            answer: Answer::Integer { value },
        }
    }

    fn decimal_problem(value: f64) -> Problem {
        Problem {
            text: "test".into(),
            category: Category::Div,
            answer: Answer::Decimal { value, places: 2 },
        }
    }

    fn fraction_problem(n: i64, d: i64) -> Problem {
        Problem {
            text: "test".into(),
            category: Category::Mul,
            answer: Answer::Fraction {
                value: Fraction::new(n, d).unwrap(),
            },
        }
    }

    #[test]
    fn empty_input_is_not_accepted() {
        let p = integer_problem(7);
        assert_eq!(evaluate(&p, ""), Verdict::Empty);
        assert_eq!(evaluate(&p, "   "), Verdict::Empty);
        assert!(!Verdict::Empty.is_accepted());
    }

    #[test]
    fn integer_answers() {
        let p = integer_problem(42);
        assert_eq!(evaluate(&p, "42"), Verdict::Correct);
        assert_eq!(evaluate(&p, " 42 "), Verdict::Correct);
        assert_eq!(evaluate(&p, "42.0"), Verdict::Correct);
        assert_eq!(evaluate(&p, "42.0005"), Verdict::Correct);
        assert_eq!(evaluate(&p, "42.01"), Verdict::Incorrect);
        assert_eq!(evaluate(&p, "41"), Verdict::Incorrect);
        assert_eq!(evaluate(&p, "forty-two"), Verdict::Unparseable);
        assert_eq!(evaluate(&p, "inf"), Verdict::Unparseable);
        assert_eq!(evaluate(&p, "NaN"), Verdict::Unparseable);
    }

    #[test]
    fn negative_integer_answers() {
        let p = integer_problem(-3);
        assert_eq!(evaluate(&p, "-3"), Verdict::Correct);
        assert_eq!(evaluate(&p, "3"), Verdict::Incorrect);
    }

    #[test]
    fn decimal_tolerance() {
        let p = decimal_problem(3.33);
        assert_eq!(evaluate(&p, "3.33"), Verdict::Correct);
        assert_eq!(evaluate(&p, "3.333"), Verdict::Correct);
        // 3.34 - 3.33 is just below 0.01 in binary floating point.
        assert_eq!(evaluate(&p, "3.34"), Verdict::Correct);
        assert_eq!(evaluate(&p, "3.35"), Verdict::Incorrect);
        assert_eq!(evaluate(&p, "3.3"), Verdict::Incorrect);
        assert_eq!(evaluate(&p, "3,33"), Verdict::Unparseable);
    }

    #[test]
    fn decimal_tolerance_boundary_is_exclusive() {
        // 1.01 - 1.0 is exactly representable and slightly above 0.01.
        let p = decimal_problem(1.0);
        assert_eq!(evaluate(&p, "1.01"), Verdict::Incorrect);
        assert_eq!(evaluate(&p, "0.99"), Verdict::Incorrect);
        assert_eq!(evaluate(&p, "1.0099"), Verdict::Correct);
        assert_eq!(evaluate(&p, "0.9901"), Verdict::Correct);
    }

    #[test]
    fn fraction_answers_accept_equivalent_forms() {
        let p = fraction_problem(1, 2);
        assert_eq!(evaluate(&p, "1/2"), Verdict::Correct);
        assert_eq!(evaluate(&p, "2/4"), Verdict::Correct);
        assert_eq!(evaluate(&p, "3/4"), Verdict::Incorrect);
        assert_eq!(evaluate(&p, "-1/2"), Verdict::Incorrect);
    }

    #[test]
    fn fraction_answers_require_fraction_syntax() {
        let p = fraction_problem(1, 2);
        assert_eq!(evaluate(&p, "0.5"), Verdict::Unparseable);
        assert_eq!(evaluate(&p, "1/0"), Verdict::Unparseable);
        assert_eq!(evaluate(&p, "1//2"), Verdict::Unparseable);
    }

    #[test]
    fn fraction_answers_accept_integers_and_mixed_numbers() {
        let p = fraction_problem(6, 2);
        assert_eq!(evaluate(&p, "3"), Verdict::Correct);
        assert_eq!(evaluate(&p, "9/3"), Verdict::Correct);

        let p = fraction_problem(-7, 3);
        assert_eq!(evaluate(&p, "-2 1/3"), Verdict::Correct);
        assert_eq!(evaluate(&p, "-2_1/3"), Verdict::Correct);
        assert_eq!(evaluate(&p, "-7/3"), Verdict::Correct);
    }
}
