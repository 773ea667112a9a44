//! Problem generation.
//!
//! Operands are drawn uniformly from the inclusive ranges in the settings.
//! Fraction mode takes precedence over integer and decimal problems for
//! every category. Subtraction and division are built backwards from an
//! addition or multiplication so the integer answers are always exact.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::QuizError;
use crate::fraction::Fraction;
use crate::model::{Answer, Category, Problem};
use crate::settings::{SessionSettings, MAX_FRACTION_DENOMINATOR};

/// Text shown in place of a problem while no category is enabled.
pub const NO_CATEGORY_PLACEHOLDER: &str = "Enable an operation!";

/// Redraws allowed for a zero fraction divisor before giving up.
const MAX_DIVISOR_REDRAWS: usize = 32;

/// Generate the next problem.
///
/// `forced` pins the category (practice mode) as long as it is enabled;
/// otherwise a category is picked uniformly among the enabled ones.
pub fn generate<R: Rng + ?Sized>(
    settings: &SessionSettings,
    forced: Option<Category>,
    rng: &mut R,
) -> Result<Problem, QuizError> {
    let enabled = settings.enabled_categories();
    let category = match forced.filter(|c| settings.is_enabled(*c)) {
        Some(category) => category,
        None => *enabled.choose(rng).ok_or(QuizError::NoCategoryEnabled)?,
    };

    let problem = if settings.fraction.enabled {
        fraction_problem(category, settings, rng)?
    } else {
        integer_problem(category, settings, rng)?
    };

    tracing::debug!(
        category = %problem.category,
        representation = %problem.representation(),
        text = %problem.text,
        "generated problem"
    );
    Ok(problem)
}

fn integer_problem<R: Rng + ?Sized>(
    category: Category,
    settings: &SessionSettings,
    rng: &mut R,
) -> Result<Problem, QuizError> {
    let ranges = settings.ranges.for_category(category);
    let overflow = || QuizError::Overflow(category);

    let (text, answer) = match category {
        Category::Add => {
            let n1 = draw(ranges.first(), rng);
            let n2 = draw(ranges.second(), rng);
            let sum = n1.checked_add(n2).ok_or_else(overflow)?;
            (format!("{n1} + {n2} ="), Answer::Integer { value: sum })
        }
        Category::Sub => {
            let n1 = draw(ranges.first(), rng);
            let n2 = draw(ranges.second(), rng);
            let sum = n1.checked_add(n2).ok_or_else(overflow)?;
            (format!("{sum} - {n1} ="), Answer::Integer { value: n2 })
        }
        Category::Mul => {
            let n1 = draw(ranges.first(), rng);
            let n2 = draw(ranges.second(), rng);
            let product = n1.checked_mul(n2).ok_or_else(overflow)?;
            (format!("{n1} {} {n2} =", category.symbol()), Answer::Integer { value: product })
        }
        Category::Div => {
            let divisor =
                draw_nonzero(ranges.first(), rng).ok_or(QuizError::DivisionByZero(category))?;
            let quotient = draw(ranges.second(), rng);
            let product = divisor.checked_mul(quotient).ok_or_else(overflow)?;

            if settings.decimal.enabled && rng.gen_bool(0.5) {
                let slack = (divisor.unsigned_abs() - 1) as i64;
                let upper = product.checked_add(slack).ok_or_else(overflow)?;
                let dividend = rng.gen_range(product..=upper);
                let places = settings.decimal.places;
                let value = round_to(dividend as f64 / divisor as f64, places);
                (
                    format!("{dividend} {} {divisor} =", category.symbol()),
                    Answer::Decimal { value, places },
                )
            } else {
                (
                    format!("{product} {} {divisor} =", category.symbol()),
                    Answer::Integer { value: quotient },
                )
            }
        }
    };

    Ok(Problem {
        text,
        category,
        answer,
    })
}

fn fraction_problem<R: Rng + ?Sized>(
    category: Category,
    settings: &SessionSettings,
    rng: &mut R,
) -> Result<Problem, QuizError> {
    let max_denominator = settings.fraction.max_range.clamp(2, MAX_FRACTION_DENOMINATOR);
    let left = random_fraction(max_denominator, rng)?;
    let mut right = random_fraction(max_denominator, rng)?;

    let value = match category {
        Category::Add => left.try_add(&right)?,
        Category::Sub => left.try_sub(&right)?,
        Category::Mul => left.try_mul(&right)?,
        Category::Div => {
            let mut redraws = 0;
            while right.is_zero() {
                if redraws == MAX_DIVISOR_REDRAWS {
                    tracing::error!("could not draw a non-zero fraction divisor");
                    return Err(QuizError::DivisionByZero(category));
                }
                right = random_fraction(max_denominator, rng)?;
                redraws += 1;
            }
            left.try_div(&right)
                .map_err(|_| QuizError::DivisionByZero(category))?
        }
    };

    Ok(Problem {
        text: format!("{left} {} {right} =", category.symbol()),
        category,
        answer: Answer::Fraction { value },
    })
}

/// Denominator in `[2, max_denominator]`, numerator in `[1, 2 × denominator]`,
/// so improper fractions appear as well.
fn random_fraction<R: Rng + ?Sized>(
    max_denominator: i64,
    rng: &mut R,
) -> Result<Fraction, QuizError> {
    let denominator = rng.gen_range(2..=max_denominator);
    let numerator = rng.gen_range(1..=2 * denominator);
    Ok(Fraction::new(numerator, denominator)?)
}

fn draw<R: Rng + ?Sized>(range: RangeInclusive<i64>, rng: &mut R) -> i64 {
    let (low, high) = (*range.start(), *range.end());
    rng.gen_range(low.min(high)..=low.max(high))
}

/// Uniform draw over the non-zero values of `range`; `None` for `0..=0`.
fn draw_nonzero<R: Rng + ?Sized>(range: RangeInclusive<i64>, rng: &mut R) -> Option<i64> {
    let (start, end) = (*range.start(), *range.end());
    let (low, high) = (start.min(end), start.max(end));
    if low == 0 && high == 0 {
        return None;
    }
    if low > 0 || high < 0 {
        return Some(rng.gen_range(low..=high));
    }
    // Skip zero by shifting the non-negative half up by one.
    let value = rng.gen_range(low..high);
    Some(if value >= 0 { value + 1 } else { value })
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
