//! Chain configuration.
//!
//! A [`ChainConfig`] is fixed for the lifetime of a built chain. Changing it
//! means rebuilding through [`ChainRig::reconfigure`](crate::rig::ChainRig::reconfigure).
//!
//! Two validation paths exist:
//! - [`ChainConfig::validate`] is strict and used when loading documents.
//! - [`ChainConfig::sanitized`] repairs bad values with a warning and is what
//!   the rig applies, so a misconfigured rig degrades instead of failing.
//!
//! # Example
//!
//! ```
//! use chainrig::config::ChainConfig;
//!
//! let config = ChainConfig::from_json_str(r#"{ "segment_count": 3 }"#).unwrap();
//! assert_eq!(config.segment_count, 3);
//! assert!((config.segment_spacing - 30.0).abs() < f32::EPSILON);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::handle::PrototypeHandle;
use crate::host::PinParams;

/// Segment count used when none is configured.
pub const DEFAULT_SEGMENT_COUNT: usize = 5;

/// Distance between consecutive segments along the chain axis.
pub const DEFAULT_SEGMENT_SPACING: f32 = 30.0;

/// Radius of the anchor's collider.
pub const DEFAULT_ANCHOR_RADIUS: f32 = 6.0;

/// Magnitude of the impulse given to the last segment after a build.
pub const DEFAULT_SEED_IMPULSE: f32 = 80.0;

/// Resource path tried when no segment prototype is assigned.
pub const DEFAULT_SEGMENT_PROTOTYPE_PATH: &str = "res://scenes/chain_segment";

/// Construction-time settings for a chain rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Number of segments to build.
    pub segment_count: usize,
    /// Distance between segments along the chain axis.
    pub segment_spacing: f32,
    /// Template each segment is instantiated from.
    pub segment_prototype: Option<PrototypeHandle>,
    /// Resource path loaded by `ready` when `segment_prototype` is unset.
    pub prototype_path: String,
    /// Radius of the anchor's circle collider.
    pub anchor_radius: f32,
    /// Pin constraint tuning for every link.
    pub pin: PinParams,
    /// Seed impulse magnitude; `0.0` disables the kick.
    ///
    /// Applied along [`CHAIN_AXIS`](crate::rig::CHAIN_AXIS), so the last segment
    /// is pushed away from the anchor rather than sideways.
    pub seed_impulse: f32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            segment_spacing: DEFAULT_SEGMENT_SPACING,
            segment_prototype: None,
            prototype_path: DEFAULT_SEGMENT_PROTOTYPE_PATH.to_string(),
            anchor_radius: DEFAULT_ANCHOR_RADIUS,
            pin: PinParams::default(),
            seed_impulse: DEFAULT_SEED_IMPULSE,
        }
    }
}

impl ChainConfig {
    /// Sets the segment count.
    #[must_use]
    pub fn with_segments(mut self, count: usize) -> Self {
        self.segment_count = count;
        self
    }

    /// Sets the segment spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.segment_spacing = spacing;
        self
    }

    /// Assigns the segment prototype.
    #[must_use]
    pub fn with_prototype(mut self, prototype: PrototypeHandle) -> Self {
        self.segment_prototype = Some(prototype);
        self
    }

    /// Sets the seed impulse magnitude.
    #[must_use]
    pub fn with_seed_impulse(mut self, magnitude: f32) -> Self {
        self.seed_impulse = magnitude;
        self
    }

    /// Parses a JSON document and validates it.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the matching
    /// variant for any value [`validate`](Self::validate) rejects.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every value without modifying anything.
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_count == 0 {
            return Err(ConfigError::ZeroSegments);
        }
        if !is_positive(self.segment_spacing) {
            return Err(ConfigError::InvalidSpacing(self.segment_spacing));
        }
        if !is_positive(self.anchor_radius) {
            return Err(ConfigError::InvalidAnchorRadius(self.anchor_radius));
        }
        if !self.seed_impulse.is_finite() || self.seed_impulse < 0.0 {
            return Err(ConfigError::InvalidSeedImpulse(self.seed_impulse));
        }
        if !is_unit(self.pin.bias) {
            return Err(ConfigError::InvalidPin {
                field: "bias",
                value: self.pin.bias,
            });
        }
        if !is_unit(self.pin.softness) {
            return Err(ConfigError::InvalidPin {
                field: "softness",
                value: self.pin.softness,
            });
        }
        Ok(())
    }

    /// Repairs invalid values, logging a warning for each one.
    ///
    /// A zero segment count becomes one. Spacing, anchor radius and seed
    /// impulse revert to their defaults. Pin parameters are clamped into
    /// `[0, 1]`, with NaN reverting to the default.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if self.segment_count == 0 {
            warn!("chain segment_count is 0, building a single segment");
            self.segment_count = 1;
        }
        if !is_positive(self.segment_spacing) {
            warn!(
                spacing = self.segment_spacing,
                "invalid chain segment_spacing, using {DEFAULT_SEGMENT_SPACING}"
            );
            self.segment_spacing = DEFAULT_SEGMENT_SPACING;
        }
        if !is_positive(self.anchor_radius) {
            warn!(
                radius = self.anchor_radius,
                "invalid chain anchor_radius, using {DEFAULT_ANCHOR_RADIUS}"
            );
            self.anchor_radius = DEFAULT_ANCHOR_RADIUS;
        }
        if !self.seed_impulse.is_finite() || self.seed_impulse < 0.0 {
            warn!(
                impulse = self.seed_impulse,
                "invalid chain seed_impulse, using {DEFAULT_SEED_IMPULSE}"
            );
            self.seed_impulse = DEFAULT_SEED_IMPULSE;
        }
        self.pin.bias = clamp_unit("bias", self.pin.bias, PinParams::DEFAULT_BIAS);
        self.pin.softness = clamp_unit("softness", self.pin.softness, PinParams::DEFAULT_SOFTNESS);
        self
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn is_unit(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

fn clamp_unit(field: &'static str, value: f32, fallback: f32) -> f32 {
    if is_unit(value) {
        return value;
    }
    let repaired = if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    };
    warn!(field, value, repaired, "chain pin parameter out of range");
    repaired
}
