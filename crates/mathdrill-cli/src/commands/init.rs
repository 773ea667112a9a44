//! The `mathdrill init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("mathdrill.toml").exists() {
        println!("mathdrill.toml already exists, skipping.");
        return Ok(());
    }
    std::fs::write("mathdrill.toml", SAMPLE_CONFIG)?;
    println!("Created mathdrill.toml");

    println!("\nNext steps:");
    println!("  1. Edit mathdrill.toml to pick operations and ranges");
    println!("  2. Run: mathdrill validate --config mathdrill.toml");
    println!("  3. Run: mathdrill play");

    Ok(())
}

pub const SAMPLE_CONFIG: &str = r#"# mathdrill configuration

operations = ["add", "sub", "mul", "div"]
duration_secs = 120
# Score to pace against; 0 disables pacing.
target_score = 0

# Subtraction reuses the addition ranges.
[ranges.addition]
min1 = 2
max1 = 100
min2 = 2
max2 = 100

# Division reuses the multiplication ranges.
[ranges.multiplication]
min1 = 2
max1 = 12
min2 = 2
max2 = 100

[decimal]
enabled = false
places = 2

# Fraction mode applies to every operation and overrides decimal mode.
[fraction]
enabled = false
max_range = 10
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use mathdrill_core::settings::{parse_settings_str, SessionSettings};

    #[test]
    fn sample_config_matches_defaults() {
        let parsed = parse_settings_str(SAMPLE_CONFIG, Path::new("mathdrill.toml")).unwrap();
        assert_eq!(parsed, SessionSettings::default());
    }
}
