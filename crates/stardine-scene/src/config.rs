//! Scene configuration.
//!
//! Every tunable number the scene uses lives here: where customers enter and
//! exit, the ranges their traits are drawn from, and the scenery layout.
//! Configs deserialize from JSON with every field optional, so a host can
//! override just the values it cares about.
//!
//! ```
//! use stardine_scene::config::SceneConfig;
//!
//! let config = SceneConfig::from_json_str(r#"{ "customers": { "max_visible": 2 } }"#).unwrap();
//! assert_eq!(config.customers.max_visible, 2);
//! assert_eq!(config.customers.leave_speed_factor, 2.0);
//! ```

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// Closed range `[min, max]` that random traits are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate span holding a single value.
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Draw a value uniformly from the span.
    ///
    /// A span that is a single point, inverted, or wider than `f32` can
    /// represent yields `min` instead of panicking.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.min < self.max && (self.max - self.min).is_finite() {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        let width = self.max - self.min;
        if !width.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidSpan {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CustomerConfig
// ---------------------------------------------------------------------------

/// Movement and spawn parameters for alien customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerConfig {
    /// Off-screen-left x every customer starts at.
    pub entry_x: f32,
    /// A leaving customer is removed once its x exceeds this.
    pub exit_x: f32,
    /// Bar positions customers walk up to.
    pub target_x: Span,
    /// Vertical band customers stand in.
    pub y: Span,
    /// Per-frame walking speed.
    pub walk_speed: Span,
    /// Per-frame bob phase increment.
    pub bob_speed: Span,
    /// Horizontal sway half-width while idle.
    pub sway_amplitude: f32,
    /// Multiplier on the bob phase for the sway, so swaying is slower than
    /// bobbing.
    pub sway_dampening: f32,
    /// Vertical bob half-height, applied at render time.
    pub bob_amplitude: f32,
    /// Leaving speed as a multiple of walking speed.
    pub leave_speed_factor: f32,
    /// How many customers the host should keep on screen at once. The
    /// lifecycle manager reports this but does not enforce it.
    pub max_visible: usize,
}

impl Default for CustomerConfig {
    fn default() -> Self {
        Self {
            entry_x: -60.0,
            exit_x: 860.0,
            target_x: Span::new(180.0, 620.0),
            y: Span::new(250.0, 290.0),
            walk_speed: Span::new(1.0, 2.0),
            bob_speed: Span::new(0.05, 0.1),
            sway_amplitude: 3.0,
            sway_dampening: 0.5,
            bob_amplitude: 4.0,
            leave_speed_factor: 2.0,
            max_visible: 3,
        }
    }
}

impl CustomerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target_x.validate("customers.target_x")?;
        self.y.validate("customers.y")?;
        self.walk_speed.validate("customers.walk_speed")?;
        self.bob_speed.validate("customers.bob_speed")?;

        if !(self.entry_x.is_finite() && self.exit_x.is_finite()) || self.entry_x >= self.exit_x {
            return Err(ConfigError::InvalidValue {
                field: "customers.exit_x",
                reason: format!(
                    "exit_x ({}) must be greater than entry_x ({})",
                    self.exit_x, self.entry_x
                ),
            });
        }
        if self.target_x.min < self.entry_x || self.target_x.max > self.exit_x {
            return Err(ConfigError::InvalidValue {
                field: "customers.target_x",
                reason: format!(
                    "bar range [{}, {}] must lie between entry_x and exit_x",
                    self.target_x.min, self.target_x.max
                ),
            });
        }
        if self.walk_speed.min <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "customers.walk_speed",
                reason: "walking speed must be positive or customers never arrive".to_owned(),
            });
        }
        if !(self.leave_speed_factor.is_finite() && self.leave_speed_factor > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "customers.leave_speed_factor",
                reason: format!("must be positive, got {}", self.leave_speed_factor),
            });
        }
        for (field, value) in [
            ("customers.sway_amplitude", self.sway_amplitude),
            ("customers.sway_dampening", self.sway_dampening),
            ("customers.bob_amplitude", self.bob_amplitude),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if self.max_visible == 0 {
            return Err(ConfigError::InvalidValue {
                field: "customers.max_visible",
                reason: "at least one customer must fit on screen".to_owned(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BackdropConfig
// ---------------------------------------------------------------------------

/// Layout of the static and animated scenery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    pub width: f32,
    pub height: f32,
    /// Seed for star placement. The same seed always yields the same sky.
    pub star_seed: u64,
    pub star_count: usize,
    pub window_count: usize,
    pub window_radius: f32,
    /// Y of the window centres.
    pub window_y: f32,
    /// Top edge of the conveyor belt.
    pub belt_y: f32,
    pub belt_height: f32,
    /// Stripe scroll per frame, in scene units.
    pub belt_speed: f32,
    pub roller_count: usize,
    /// X of the finish line trays are judged at.
    pub finish_x: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            star_seed: 0x5EED_CAFE,
            star_count: 120,
            window_count: 3,
            window_radius: 38.0,
            window_y: 120.0,
            belt_y: 430.0,
            belt_height: 36.0,
            belt_speed: 1.5,
            roller_count: 9,
            finish_x: 700.0,
        }
    }
}

impl BackdropConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0)
        {
            return Err(ConfigError::InvalidValue {
                field: "backdrop.width",
                reason: format!("scene must have positive size, got {}x{}", self.width, self.height),
            });
        }
        if self.belt_y < 0.0 || self.belt_height <= 0.0 || self.belt_y + self.belt_height > self.height {
            return Err(ConfigError::InvalidValue {
                field: "backdrop.belt_y",
                reason: "conveyor belt must fit inside the scene".to_owned(),
            });
        }
        if !(0.0..=self.width).contains(&self.finish_x) {
            return Err(ConfigError::InvalidValue {
                field: "backdrop.finish_x",
                reason: format!("finish line at {} is off screen", self.finish_x),
            });
        }
        if !(self.window_radius.is_finite() && self.window_radius >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "backdrop.window_radius",
                reason: format!("must be non-negative, got {}", self.window_radius),
            });
        }
        if !self.belt_speed.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "backdrop.belt_speed",
                reason: "must be finite".to_owned(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for a diner scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub customers: CustomerConfig,
    pub backdrop: BackdropConfig,
}

impl SceneConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.customers.validate()?;
        self.backdrop.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn defaults_are_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = SceneConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SceneConfig::from_json_str(
            r#"{ "customers": { "walk_speed": { "min": 0.5, "max": 0.75 } },
                 "backdrop": { "star_count": 10 } }"#,
        )
        .unwrap();
        assert_eq!(config.customers.walk_speed, Span::new(0.5, 0.75));
        assert_eq!(config.customers.exit_x, CustomerConfig::default().exit_x);
        assert_eq!(config.backdrop.star_count, 10);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SceneConfig::from_json_str("{ customers: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn inverted_span_is_rejected() {
        let err = SceneConfig::from_json_str(r#"{ "customers": { "y": { "min": 300, "max": 200 } } }"#)
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidSpan { field: "customers.y", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn zero_walk_speed_is_rejected() {
        let mut config = SceneConfig::default();
        config.customers.walk_speed = Span::fixed(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn exit_before_entry_is_rejected() {
        let mut config = SceneConfig::default();
        config.customers.exit_x = config.customers.entry_x - 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn belt_outside_scene_is_rejected() {
        let mut config = SceneConfig::default();
        config.backdrop.belt_y = config.backdrop.height;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneConfig::from_path("/definitely/not/here/scene.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn span_samples_stay_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        let span = Span::new(1.0, 2.0);
        for _ in 0..1000 {
            assert!(span.contains(span.sample(&mut rng)));
        }
        assert_eq!(Span::fixed(3.5).sample(&mut rng), 3.5);
    }

    #[test]
    fn span_wider_than_f32_is_rejected() {
        let mut config = SceneConfig::default();
        config.customers.target_x = Span::new(-f32::MAX, f32::MAX);
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidSpan { field: "customers.target_x", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn unsampleable_spans_yield_min() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(Span::new(-f32::MAX, f32::MAX).sample(&mut rng), -f32::MAX);
        assert_eq!(Span::new(2.0, 1.0).sample(&mut rng), 2.0);
        assert_eq!(Span::new(f32::NEG_INFINITY, 0.0).sample(&mut rng), f32::NEG_INFINITY);
    }
}
