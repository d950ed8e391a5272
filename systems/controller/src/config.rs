//! Controller configuration loaded from TOML.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use skirmish_core::{Field, RangeClass};
use skirmish_system_tactics::RangeTable;
use thiserror::Error;

const DEFAULT_DEPLOY_INTERVAL_MS: u64 = 3_000;
const DEFAULT_THINK_INTERVAL_MS: u64 = 500;
const DEFAULT_MAX_UNITS_ON_FIELD: usize = 20;

/// Cadences, capacity and lookup tables consumed by the decision controller.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    deploy_interval: Duration,
    think_interval: Duration,
    max_units_on_field: usize,
    field: Field,
    ranges: RangeTable,
}

impl Config {
    /// Creates a configuration from explicit values without validation.
    #[must_use]
    pub fn new(
        deploy_interval: Duration,
        think_interval: Duration,
        max_units_on_field: usize,
        field: Field,
        ranges: RangeTable,
    ) -> Self {
        Self {
            deploy_interval,
            think_interval,
            max_units_on_field,
            field,
            ranges,
        }
    }

    /// Reads and validates the configuration stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Omitted keys fall back to their defaults; unknown keys are rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(contents)?;
        raw.validate()
    }

    /// Minimum time between two deployment decisions.
    #[must_use]
    pub const fn deploy_interval(&self) -> Duration {
        self.deploy_interval
    }

    /// Minimum time between two think ticks.
    #[must_use]
    pub const fn think_interval(&self) -> Duration {
        self.think_interval
    }

    /// Maximum number of controlled units allowed on the field.
    #[must_use]
    pub const fn max_units_on_field(&self) -> usize {
        self.max_units_on_field
    }

    /// Playfield the battle is fought on.
    #[must_use]
    pub const fn field(&self) -> Field {
        self.field
    }

    /// Attack distances keyed by ranged tier.
    #[must_use]
    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_DEPLOY_INTERVAL_MS),
            Duration::from_millis(DEFAULT_THINK_INTERVAL_MS),
            DEFAULT_MAX_UNITS_ON_FIELD,
            Field::default(),
            RangeTable::default(),
        )
    }
}

/// Errors that can occur while loading controller configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read controller config at {}", .path.display())]
    Read {
        /// Location of the unreadable file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The contents were not valid TOML for the expected schema.
    #[error("failed to parse controller config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A cadence was configured as zero.
    #[error("`{name}` must be greater than zero")]
    ZeroInterval {
        /// Key of the offending cadence.
        name: &'static str,
    },
    /// An attack range was attached to a melee tier.
    #[error("range class {0} is melee; attack ranges start at tier 2")]
    MeleeRangeClass(u8),
    /// An attack range was zero, negative or not a number.
    #[error("attack range for tier {range_class} must be positive, got {distance}")]
    NonPositiveRange {
        /// Tier the range was configured for.
        range_class: u8,
        /// Offending distance.
        distance: f32,
    },
    /// A tier appeared more than once.
    #[error("attack range for tier {0} is configured more than once")]
    DuplicateRangeClass(u8),
    /// The field cannot hold units between its margins.
    #[error("field {width}x{height} with margin {margin} leaves no room for units")]
    InvalidField {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
        /// Configured margin.
        margin: f32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    deploy_interval_ms: u64,
    think_interval_ms: u64,
    max_units_on_field: usize,
    field: RawField,
    attack_range: Vec<RawAttackRange>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            deploy_interval_ms: DEFAULT_DEPLOY_INTERVAL_MS,
            think_interval_ms: DEFAULT_THINK_INTERVAL_MS,
            max_units_on_field: DEFAULT_MAX_UNITS_ON_FIELD,
            field: RawField::default(),
            attack_range: RangeTable::default()
                .iter()
                .map(|(class, distance)| RawAttackRange {
                    range_class: class.get(),
                    distance,
                })
                .collect(),
        }
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        if self.deploy_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "deploy_interval_ms",
            });
        }
        if self.think_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "think_interval_ms",
            });
        }

        let RawField {
            width,
            height,
            margin,
        } = self.field;
        let roomy = width > 0.0 && margin >= 0.0 && height > margin * 2.0;
        if !roomy {
            return Err(ConfigError::InvalidField {
                width,
                height,
                margin,
            });
        }

        let mut ranges = RangeTable::new();
        for tier in self.attack_range {
            let range_class = RangeClass::new(tier.range_class);
            if !range_class.is_ranged() {
                return Err(ConfigError::MeleeRangeClass(tier.range_class));
            }
            if tier.distance.is_nan() || tier.distance <= 0.0 {
                return Err(ConfigError::NonPositiveRange {
                    range_class: tier.range_class,
                    distance: tier.distance,
                });
            }
            if ranges.insert(range_class, tier.distance).is_some() {
                return Err(ConfigError::DuplicateRangeClass(tier.range_class));
            }
        }

        Ok(Config::new(
            Duration::from_millis(self.deploy_interval_ms),
            Duration::from_millis(self.think_interval_ms),
            self.max_units_on_field,
            Field::new(width, height, margin),
            ranges,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawField {
    width: f32,
    height: f32,
    margin: f32,
}

impl Default for RawField {
    fn default() -> Self {
        let field = Field::default();
        Self {
            width: field.width(),
            height: field.height(),
            margin: field.margin(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAttackRange {
    range_class: u8,
    distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = Config::from_toml_str("").expect("defaults");
        assert_eq!(config, Config::default());
        assert_eq!(config.deploy_interval(), Duration::from_secs(3));
        assert_eq!(config.think_interval(), Duration::from_millis(500));
        assert_eq!(config.max_units_on_field(), 20);
        assert_eq!(config.ranges().attack_range(RangeClass::new(5)), Some(250.0));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            deploy_interval_ms = 1500
            max_units_on_field = 4

            [field]
            height = 600.0

            [[attack_range]]
            range_class = 2
            distance = 80.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.deploy_interval(), Duration::from_millis(1500));
        assert_eq!(config.think_interval(), Duration::from_millis(500));
        assert_eq!(config.max_units_on_field(), 4);
        assert_eq!(config.field(), Field::new(450.0, 600.0, 30.0));
        assert_eq!(config.ranges().attack_range(RangeClass::new(2)), Some(80.0));
        assert_eq!(config.ranges().attack_range(RangeClass::new(3)), None);
    }

    #[test]
    fn zero_think_interval_is_rejected() {
        let error = Config::from_toml_str("think_interval_ms = 0").expect_err("invalid");
        assert!(matches!(
            error,
            ConfigError::ZeroInterval {
                name: "think_interval_ms"
            }
        ));
    }

    #[test]
    fn melee_tier_cannot_carry_a_range() {
        let error = Config::from_toml_str(
            r#"
            [[attack_range]]
            range_class = 1
            distance = 10.0
            "#,
        )
        .expect_err("invalid");
        assert!(matches!(error, ConfigError::MeleeRangeClass(1)));
    }

    #[test]
    fn duplicate_tier_is_rejected() {
        let error = Config::from_toml_str(
            r#"
            [[attack_range]]
            range_class = 3
            distance = 10.0

            [[attack_range]]
            range_class = 3
            distance = 20.0
            "#,
        )
        .expect_err("invalid");
        assert!(matches!(error, ConfigError::DuplicateRangeClass(3)));
    }

    #[test]
    fn negative_range_is_rejected() {
        let error = Config::from_toml_str(
            r#"
            [[attack_range]]
            range_class = 2
            distance = -5.0
            "#,
        )
        .expect_err("invalid");
        assert!(matches!(
            error,
            ConfigError::NonPositiveRange { range_class: 2, .. }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = Config::from_toml_str("think_rate = 3").expect_err("invalid");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn cramped_field_is_rejected() {
        let error = Config::from_toml_str(
            r#"
            [field]
            height = 50.0
            "#,
        )
        .expect_err("invalid");
        assert!(matches!(error, ConfigError::InvalidField { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = Config::load("does/not/exist.toml").expect_err("missing");
        assert!(error.to_string().contains("does/not/exist.toml"));
    }
}
