//! Session settings: defaults, validation and TOML loading.
//!
//! Settings are captured once when a game starts and never change while it
//! runs. Missing fields take their defaults; unknown fields are rejected.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::model::Category;

/// Largest number of decimal places a decimal answer may be rounded to.
pub const MAX_DECIMAL_PLACES: u32 = 6;

/// Denominators in fraction mode never exceed this value.
pub const MAX_FRACTION_DENOMINATOR: i64 = 12;

/// Complete settings for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    /// Enabled operation categories.
    pub operations: BTreeSet<Category>,
    /// Length of the timed game in seconds.
    pub duration_secs: u32,
    /// Score to pace against; 0 disables pacing.
    pub target_score: u32,
    /// Operand ranges for the addition and multiplication families.
    pub ranges: RangeSettings,
    /// Inexact division with rounded answers.
    pub decimal: DecimalMode,
    /// Exact fraction arithmetic for every category.
    pub fraction: FractionMode,
}

/// Operand ranges per family. Subtraction reuses the addition ranges and
/// division reuses the multiplication ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeSettings {
    pub addition: OperandRanges,
    pub multiplication: OperandRanges,
}

/// Two independent inclusive operand ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperandRanges {
    pub min1: i64,
    pub max1: i64,
    pub min2: i64,
    pub max2: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecimalMode {
    pub enabled: bool,
    pub places: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FractionMode {
    pub enabled: bool,
    /// Upper bound for generated denominators (capped at 12).
    pub max_range: i64,
}

impl OperandRanges {
    pub const fn new(min1: i64, max1: i64, min2: i64, max2: i64) -> Self {
        Self {
            min1,
            max1,
            min2,
            max2,
        }
    }

    pub fn first(&self) -> RangeInclusive<i64> {
        self.min1..=self.max1
    }

    pub fn second(&self) -> RangeInclusive<i64> {
        self.min2..=self.max2
    }

    fn check(&self, family: &'static str) -> Result<(), SettingsError> {
        for (which, min, max) in [(1, self.min1, self.max1), (2, self.min2, self.max2)] {
            if min > max {
                return Err(SettingsError::InvertedRange {
                    family,
                    which,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// The four combinations of extreme operands. Sums and products over the
    /// ranges reach their bounds at these corners.
    fn corners(&self) -> [(i64, i64); 4] {
        [
            (self.min1, self.min2),
            (self.min1, self.max2),
            (self.max1, self.min2),
            (self.max1, self.max2),
        ]
    }

    fn check_sums(&self, family: &'static str) -> Result<(), SettingsError> {
        let fits = self.corners().iter().all(|(a, b)| a.checked_add(*b).is_some());
        if fits {
            Ok(())
        } else {
            Err(SettingsError::RangeOverflow { family })
        }
    }

    /// With `slack`, the product may also be widened by `|a| - 1` to build
    /// an inexact dividend.
    fn check_products(&self, family: &'static str, slack: bool) -> Result<(), SettingsError> {
        let fits = self.corners().iter().all(|&(a, b)| {
            let Some(product) = a.checked_mul(b) else {
                return false;
            };
            if !slack {
                return true;
            }
            i64::try_from(a.unsigned_abs().saturating_sub(1))
                .ok()
                .and_then(|extra| product.checked_add(extra))
                .is_some()
        });
        if fits {
            Ok(())
        } else {
            Err(SettingsError::RangeOverflow { family })
        }
    }
}

impl RangeSettings {
    /// The ranges a category draws its operands from.
    pub fn for_category(&self, category: Category) -> &OperandRanges {
        match category {
            Category::Add | Category::Sub => &self.addition,
            Category::Mul | Category::Div => &self.multiplication,
        }
    }
}

impl Default for RangeSettings {
    fn default() -> Self {
        Self {
            addition: OperandRanges::new(2, 100, 2, 100),
            multiplication: OperandRanges::new(2, 12, 2, 100),
        }
    }
}

impl Default for DecimalMode {
    fn default() -> Self {
        Self {
            enabled: false,
            places: 2,
        }
    }
}

impl Default for FractionMode {
    fn default() -> Self {
        Self {
            enabled: false,
            max_range: 10,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            operations: Category::ALL.into_iter().collect(),
            duration_secs: 120,
            target_score: 0,
            ranges: RangeSettings::default(),
            decimal: DecimalMode::default(),
            fraction: FractionMode::default(),
        }
    }
}

impl SessionSettings {
    /// Enabled categories in canonical order.
    pub fn enabled_categories(&self) -> Vec<Category> {
        self.operations.iter().copied().collect()
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.operations.contains(&category)
    }

    /// Whether pacing against a target score is active.
    pub fn pacing_enabled(&self) -> bool {
        self.target_score > 0
    }

    /// Check every field; the session refuses to start on failure.
    ///
    /// An empty set of operations is valid here: the session shows a
    /// placeholder problem instead of failing.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.ranges.addition.check("addition")?;
        self.ranges.multiplication.check("multiplication")?;
        self.ranges.addition.check_sums("addition")?;
        self.ranges
            .multiplication
            .check_products("multiplication", self.decimal.enabled)?;

        if self.duration_secs == 0 {
            return Err(SettingsError::ZeroDuration);
        }
        if self.decimal.enabled && !(1..=MAX_DECIMAL_PLACES).contains(&self.decimal.places) {
            return Err(SettingsError::DecimalPlaces {
                got: self.decimal.places,
                max: MAX_DECIMAL_PLACES,
            });
        }
        if self.fraction.enabled && self.fraction.max_range < 2 {
            return Err(SettingsError::FractionRange(self.fraction.max_range));
        }

        let divisors = self.ranges.multiplication;
        if self.is_enabled(Category::Div)
            && !self.fraction.enabled
            && divisors.min1 == 0
            && divisors.max1 == 0
        {
            return Err(SettingsError::ZeroDivisorRange);
        }
        Ok(())
    }
}

/// A non-fatal remark about a settings file.
#[derive(Debug, Clone)]
pub struct SettingsWarning {
    /// Warning message.
    pub message: String,
}

/// Look for settings that are valid but probably not what the user meant.
pub fn validate_settings(settings: &SessionSettings) -> Vec<SettingsWarning> {
    let mut warnings = Vec::new();
    let mut warn = |message: String| warnings.push(SettingsWarning { message });

    if settings.operations.is_empty() {
        warn("no operations enabled; the game will only show a placeholder".into());
    }

    if settings.decimal.enabled && settings.fraction.enabled {
        warn("fraction mode takes precedence; decimal mode will be ignored".into());
    }

    if settings.decimal.enabled
        && !settings.fraction.enabled
        && !settings.is_enabled(Category::Div)
    {
        warn("decimal mode only affects division, which is disabled".into());
    }

    if settings.fraction.enabled && settings.fraction.max_range > MAX_FRACTION_DENOMINATOR {
        warn(format!(
            "fraction range {} is capped at {MAX_FRACTION_DENOMINATOR}",
            settings.fraction.max_range
        ));
    }

    if settings.target_score > settings.duration_secs {
        warn(format!(
            "target score {} in {}s needs more than one answer per second",
            settings.target_score, settings.duration_secs
        ));
    }

    if settings.is_enabled(Category::Sub) && settings.ranges.addition.min2 < 0 {
        warn("negative second addition operands produce negative subtraction answers".into());
    }

    warnings
}

/// Parse a TOML settings file and validate it.
pub fn load_settings(path: &Path) -> Result<SessionSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file: {}", path.display()))?;

    parse_settings_str(&content, path)
}

/// Parse a TOML string into validated settings (useful for testing).
pub fn parse_settings_str(content: &str, source_path: &Path) -> Result<SessionSettings> {
    let settings: SessionSettings = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", source_path.display()))?;

    Ok(settings)
}

/// Load settings from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `$MATHDRILL_CONFIG`
/// 2. `mathdrill.toml` in the current directory
/// 3. `~/.config/mathdrill/config.toml`
/// 4. Built-in defaults
pub fn load_settings_from(path: Option<&Path>) -> Result<SessionSettings> {
    let settings_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("settings file not found: {}", p.display());
        }
    } else {
        default_settings_path()
    };

    match settings_path {
        Some(path) => {
            tracing::debug!("loading settings from {}", path.display());
            load_settings(&path)
        }
        None => Ok(SessionSettings::default()),
    }
}

fn default_settings_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MATHDRILL_CONFIG") {
        let env_path = PathBuf::from(env_path);
        if env_path.exists() {
            return Some(env_path);
        }
        tracing::warn!(
            "MATHDRILL_CONFIG points to missing file {}, ignoring",
            env_path.display()
        );
    }

    let local = PathBuf::from("mathdrill.toml");
    if local.exists() {
        return Some(local);
    }

    let global = std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathdrill").join("config.toml"))?;
    global.exists().then_some(global)
}
