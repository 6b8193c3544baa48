use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::math::Rotation;

/// Tuning parameters for a [`CameraPath`](super::CameraPath).
///
/// Deserialises with per-field defaults, so a config file only needs to
/// name the values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPathConfig {
    /// Number of straight-line arc-length samples per segment.
    pub steps_per_segment: usize,
    /// Bounding-box margin and maximum perpendicular distance accepted when
    /// projecting a point onto the path.
    pub projection_radius: f64,
    /// Tolerance used when deciding whether the tail knot closes the loop.
    pub loop_tolerance: f64,
    /// Rotation returned when the path has no rotation knots.
    pub default_rotation: Rotation,
    /// Speed returned when the path has no speed knots.
    pub default_speed: f64,
    /// Field of view (degrees) returned when the path has no fov knots.
    pub default_fov: f64,
}

impl Default for CameraPathConfig {
    fn default() -> Self {
        Self {
            steps_per_segment: 30,
            projection_radius: 0.5,
            loop_tolerance: 1e-4,
            default_rotation: Rotation::identity(),
            default_speed: 1.0,
            default_fov: 60.0,
        }
    }
}

impl CameraPathConfig {
    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if `steps_per_segment` is zero, or if a radius,
    /// tolerance or default is not finite or not positive where required.
    pub fn validate(&self) -> Result<()> {
        if self.steps_per_segment == 0 {
            return Err(invalid("steps_per_segment must be at least 1"));
        }
        if !(self.projection_radius.is_finite() && self.projection_radius > 0.0) {
            return Err(invalid("projection_radius must be positive"));
        }
        if !(self.loop_tolerance.is_finite() && self.loop_tolerance > 0.0) {
            return Err(invalid("loop_tolerance must be positive"));
        }
        if !self.default_speed.is_finite() || !self.default_fov.is_finite() {
            return Err(invalid("default speed and fov must be finite"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> crate::error::CamPathError {
    ConfigError::InvalidParameters(message.to_owned()).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = CameraPathConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.steps_per_segment, 30);
    }

    #[test]
    fn zero_steps_fails() {
        let config = CameraPathConfig {
            steps_per_segment: 0,
            ..CameraPathConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_radius_fails() {
        let config = CameraPathConfig {
            projection_radius: -1.0,
            ..CameraPathConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: CameraPathConfig =
            serde_json::from_str(r#"{ "steps_per_segment": 12, "default_fov": 75.0 }"#).unwrap();
        assert_eq!(config.steps_per_segment, 12);
        assert!((config.default_fov - 75.0).abs() < f64::EPSILON);
        assert!((config.projection_radius - 0.5).abs() < f64::EPSILON);
    }
}
