// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapping and clipping configuration.
//!
//! Values come from [`Default`], from `FLOORSNAP_*` environment variables
//! (unset or unparsable variables fall back to the defaults), or from JSON.
//! Loaded values are validated either way.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be positive, got {}", name, value)))
    }
}

/// Snap tolerances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Snap radius on screen, in pixels.
    pub pixel_intensity: f64,
    /// Model units covered by one pixel at the current zoom.
    pub model_per_pixel: f64,
    /// Multiplier applied to the intensity while keeping an existing snap.
    pub break_factor: f64,
    /// Angles (radians) below this are treated as aligned.
    pub angle_eps: f64,
    /// Half width of the strip used as rotation reference when the
    /// snapped line has no owner outline.
    pub rotation_strip_half_width: f64,
    /// Extract room boundary curves as snap targets.
    pub include_room_curves: bool,
}

impl SnapConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let config = Self {
            pixel_intensity: env_or("FLOORSNAP_PIXEL_INTENSITY", d.pixel_intensity),
            model_per_pixel: env_or("FLOORSNAP_MODEL_PER_PIXEL", d.model_per_pixel),
            break_factor: env_or("FLOORSNAP_BREAK_FACTOR", d.break_factor),
            angle_eps: env_or("FLOORSNAP_ANGLE_EPS", d.angle_eps),
            rotation_strip_half_width: env_or(
                "FLOORSNAP_ROTATION_STRIP_HALF_WIDTH",
                d.rotation_strip_half_width,
            ),
            include_room_curves: env_or("FLOORSNAP_INCLUDE_ROOM_CURVES", d.include_room_curves),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("pixel_intensity", self.pixel_intensity)?;
        check_positive("model_per_pixel", self.model_per_pixel)?;
        check_positive("break_factor", self.break_factor)?;
        check_positive("angle_eps", self.angle_eps)?;
        check_positive("rotation_strip_half_width", self.rotation_strip_half_width)
    }

    /// Snap intensity in model units
    pub fn intensity(&self) -> f64 {
        self.pixel_intensity * self.model_per_pixel
    }

    /// Same pixel intensity, zoom chosen so the model intensity is `intensity`
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.model_per_pixel = intensity / self.pixel_intensity;
        self
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            pixel_intensity: 7.0,
            model_per_pixel: 0.01,
            break_factor: 2.0,
            angle_eps: floorsnap_geometry::tolerance::ANGLE_EPS,
            rotation_strip_half_width: 0.1,
            include_room_curves: false,
        }
    }
}

/// Beam clipping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipConfig {
    /// Distance each rail is extended past both beam ends.
    pub rail_extension: f64,
    /// Absolute tolerance for boolean and containment tests.
    pub boolean_tolerance: f64,
}

impl ClipConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let config = Self {
            rail_extension: env_or("FLOORSNAP_RAIL_EXTENSION", d.rail_extension),
            boolean_tolerance: env_or("FLOORSNAP_BOOLEAN_TOLERANCE", d.boolean_tolerance),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("rail_extension", self.rail_extension)?;
        check_positive("boolean_tolerance", self.boolean_tolerance)
    }
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            rail_extension: 10000.0,
            boolean_tolerance: 1e-6,
        }
    }
}
