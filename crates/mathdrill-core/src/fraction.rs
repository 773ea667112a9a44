//! Exact rational numbers for fraction-mode problems.
//!
//! Every [`Fraction`] is kept in lowest terms with a positive denominator;
//! the sign lives on the numerator. Arithmetic widens to `i128` and reports
//! [`FractionError::Overflow`] instead of wrapping.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FractionError;

/// An exact rational number in lowest terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "FractionParts", into = "FractionParts")]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

/// Wire shape of a fraction; validated through [`Fraction::new`].
#[derive(Serialize, Deserialize)]
struct FractionParts {
    numerator: i64,
    denominator: i64,
}

impl TryFrom<FractionParts> for Fraction {
    type Error = FractionError;

    fn try_from(parts: FractionParts) -> Result<Self, Self::Error> {
        Fraction::new(parts.numerator, parts.denominator)
    }
}

impl From<Fraction> for FractionParts {
    fn from(f: Fraction) -> Self {
        Self {
            numerator: f.numerator,
            denominator: f.denominator,
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn reduce(numerator: i128, denominator: i128) -> Result<Fraction, FractionError> {
    if denominator == 0 {
        return Err(FractionError::ZeroDenominator);
    }
    let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()) as i128;
    let (mut n, mut d) = (numerator / divisor, denominator / divisor);
    if d < 0 {
        n = -n;
        d = -d;
    }
    Ok(Fraction {
        numerator: i64::try_from(n).map_err(|_| FractionError::Overflow)?,
        denominator: i64::try_from(d).map_err(|_| FractionError::Overflow)?,
    })
}

impl Fraction {
    pub const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 1,
    };

    pub const ONE: Fraction = Fraction {
        numerator: 1,
        denominator: 1,
    };

    /// Build a fraction from a numerator and denominator, reducing it.
    pub fn new(numerator: i64, denominator: i64) -> Result<Self, FractionError> {
        reduce(numerator as i128, denominator as i128)
    }

    /// Reduce `numerator/denominator`, falling back to `0/1` for a zero
    /// denominator or a result that cannot be represented.
    ///
    /// The fallback only exists for degenerate text typed by a user; the
    /// generator always goes through [`Fraction::new`].
    pub fn simplify(numerator: i64, denominator: i64) -> Self {
        Self::new(numerator, denominator).unwrap_or(Self::ZERO)
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn is_integer(&self) -> bool {
        self.denominator == 1
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn try_add(&self, other: &Fraction) -> Result<Fraction, FractionError> {
        let (a, b, c, d) = self.widen(other);
        reduce(a * d + c * b, b * d)
    }

    pub fn try_sub(&self, other: &Fraction) -> Result<Fraction, FractionError> {
        let (a, b, c, d) = self.widen(other);
        reduce(a * d - c * b, b * d)
    }

    pub fn try_mul(&self, other: &Fraction) -> Result<Fraction, FractionError> {
        let (a, b, c, d) = self.widen(other);
        reduce(a * c, b * d)
    }

    /// Divide by `other`; fails when `other` is zero.
    pub fn try_div(&self, other: &Fraction) -> Result<Fraction, FractionError> {
        if other.is_zero() {
            return Err(FractionError::DivisionByZero);
        }
        let (a, b, c, d) = self.widen(other);
        reduce(a * d, b * c)
    }

    /// Render as a mixed number: `7/3` becomes `2 1/3`, `-1/2` stays `-1/2`.
    pub fn to_mixed_string(&self) -> String {
        if self.is_integer() {
            return self.numerator.to_string();
        }
        let sign = if self.numerator < 0 { "-" } else { "" };
        let magnitude = self.numerator.unsigned_abs();
        let denominator = self.denominator.unsigned_abs();
        let whole = magnitude / denominator;
        let remainder = magnitude % denominator;
        if whole == 0 {
            format!("{sign}{remainder}/{denominator}")
        } else {
            format!("{sign}{whole} {remainder}/{denominator}")
        }
    }

    fn widen(&self, other: &Fraction) -> (i128, i128, i128, i128) {
        (
            self.numerator as i128,
            self.denominator as i128,
            other.numerator as i128,
            other.denominator as i128,
        )
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self {
            numerator: value,
            denominator: 1,
        }
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    // Denominators are positive, so cross-multiplication preserves order.
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, c, d) = self.widen(other);
        (a * d).cmp(&(c * b))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

fn parse_digits(s: &str) -> Option<i128> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<i64>().ok().map(i128::from)
}

fn parse_simple(s: &str) -> Option<(i128, i128)> {
    let (numerator, denominator) = s.split_once('/')?;
    let numerator = parse_digits(numerator)?;
    let denominator = parse_digits(denominator)?;
    (denominator != 0).then_some((numerator, denominator))
}

impl FromStr for Fraction {
    type Err = FractionError;

    /// Accepts `-5`, `3/4`, `-3/4`, `2 1/3` and `2_1/3`. A leading sign
    /// applies to the whole mixed value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || FractionError::Unparseable(s.to_string());
        let text = s.trim();
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };

        let (numerator, denominator) =
            match body.split_once(|c: char| c == ' ' || c == '_') {
                Some((whole, rest)) => {
                    let whole = parse_digits(whole).ok_or_else(unparseable)?;
                    let (n, d) = parse_simple(rest.trim_start()).ok_or_else(unparseable)?;
                    (whole * d + n, d)
                }
                None if body.contains('/') => parse_simple(body).ok_or_else(unparseable)?,
                None => (parse_digits(body).ok_or_else(unparseable)?, 1),
            };

        let numerator = if negative { -numerator } else { numerator };
        reduce(numerator, denominator).map_err(|_| unparseable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn new_reduces_and_normalises_sign() {
        let f = frac(6, -8);
        assert_eq!(f.numerator(), -3);
        assert_eq!(f.denominator(), 4);

        let f = frac(-10, -4);
        assert_eq!((f.numerator(), f.denominator()), (5, 2));

        let f = frac(0, -7);
        assert_eq!((f.numerator(), f.denominator()), (0, 1));
    }

    #[test]
    fn reduced_form_is_coprime_with_positive_denominator() {
        for n in -24..=24i64 {
            for d in (-24..=24i64).filter(|d| *d != 0) {
                let f = frac(n, d);
                assert!(f.denominator() > 0, "{n}/{d}");
                let g = gcd(
                    f.numerator().unsigned_abs() as u128,
                    f.denominator().unsigned_abs() as u128,
                );
                assert_eq!(g, 1, "{n}/{d} reduced to {f}");
            }
        }
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(Fraction::new(3, 0), Err(FractionError::ZeroDenominator));
        assert_eq!(Fraction::simplify(3, 0), Fraction::ZERO);
        assert_eq!(Fraction::simplify(4, 6), frac(2, 3));
    }

    #[test]
    fn arithmetic() {
        let half = frac(1, 2);
        let third = frac(1, 3);
        assert_eq!(half.try_add(&third).unwrap(), frac(5, 6));
        assert_eq!(third.try_sub(&half).unwrap(), frac(-1, 6));
        assert_eq!(half.try_mul(&frac(4, 3)).unwrap(), frac(2, 3));
        assert_eq!(half.try_div(&third).unwrap(), frac(3, 2));
        assert_eq!(half.try_div(&frac(-1, 4)).unwrap(), frac(-2, 1));
    }

    #[test]
    fn division_by_zero_is_rejected() {
        assert_eq!(
            Fraction::ONE.try_div(&Fraction::ZERO),
            Err(FractionError::DivisionByZero)
        );
    }

    #[test]
    fn overflow_is_reported() {
        let big = Fraction::from(i64::MAX);
        assert_eq!(big.try_mul(&Fraction::from(2)), Err(FractionError::Overflow));
        let tiny = frac(1, i64::MAX);
        assert_eq!(tiny.try_mul(&frac(1, 3)), Err(FractionError::Overflow));
    }

    #[test]
    fn equality_ignores_representation() {
        assert_eq!(frac(2, 4), frac(1, 2));
        assert_eq!(Fraction::from(3), frac(9, 3));
        assert_ne!(frac(1, 2), frac(-1, 2));
        let f = frac(7, 5);
        assert_eq!(f, f);
        assert!(frac(1, 3) < frac(1, 2));
        assert!(frac(-1, 2) < Fraction::ZERO);
    }

    #[test]
    fn parse_integers_and_simple_fractions() {
        assert_eq!("-5".parse::<Fraction>().unwrap(), Fraction::from(-5));
        assert_eq!("3/4".parse::<Fraction>().unwrap(), frac(3, 4));
        assert_eq!(" -6/8 ".parse::<Fraction>().unwrap(), frac(-3, 4));
        assert_eq!("+2/4".parse::<Fraction>().unwrap(), frac(1, 2));
    }

    #[test]
    fn parse_mixed_numbers() {
        assert_eq!("2 1/3".parse::<Fraction>().unwrap(), frac(7, 3));
        assert_eq!("2_1/3".parse::<Fraction>().unwrap(), frac(7, 3));
        assert_eq!("-2 1/3".parse::<Fraction>().unwrap(), frac(-7, 3));
        assert_eq!("1  1/2".parse::<Fraction>().unwrap(), frac(3, 2));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for bad in [
            "", "   ", "-", "1/0", "1/2/3", "0.5", "abc", "2 3", "2 -1/3", "3/-4", "1 /2",
            "--1", "2 1/3 4",
        ] {
            assert!(
                matches!(bad.parse::<Fraction>(), Err(FractionError::Unparseable(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn display_parse_round_trip() {
        for (n, d) in [(0, 1), (5, 1), (-5, 1), (3, 4), (-7, 3), (22, 7)] {
            let f = frac(n, d);
            assert_eq!(f.to_string().parse::<Fraction>().unwrap(), f);
            assert_eq!(f.to_mixed_string().parse::<Fraction>().unwrap(), f);
        }
    }

    #[test]
    fn display_forms() {
        assert_eq!(frac(4, 2).to_string(), "2");
        assert_eq!(frac(-3, 4).to_string(), "-3/4");
        assert_eq!(frac(7, 3).to_mixed_string(), "2 1/3");
        assert_eq!(frac(-7, 3).to_mixed_string(), "-2 1/3");
        assert_eq!(frac(-1, 2).to_mixed_string(), "-1/2");
        assert_eq!(frac(-8, 2).to_mixed_string(), "-4");
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let json = serde_json::to_string(&frac(3, 6)).unwrap();
        assert_eq!(json, r#"{"numerator":1,"denominator":2}"#);
        let back: Fraction = serde_json::from_str(r#"{"numerator":2,"denominator":-4}"#).unwrap();
        assert_eq!(back.denominator(), 2);
        assert!(serde_json::from_str::<Fraction>(r#"{"numerator":1,"denominator":0}"#).is_err());
    }
}
