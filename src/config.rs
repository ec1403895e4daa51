//! Session configuration.
//!
//! Values come from CLI flags, which fall back to `SF_*` environment variables
//! (a `.env` file is loaded at startup) and then to the defaults below.

use crate::domain::{DosePoints, ParamKind};
use crate::error::AppError;

pub const DEFAULT_LEFT_BORDER: f64 = 0.0;
pub const DEFAULT_RIGHT_COEFFICIENT: f64 = 1.1;
pub const DEFAULT_POINTS_COUNT: usize = 100;
pub const DEFAULT_FLOAT_SHIFT: f64 = 100.0;
pub const DEFAULT_SLIDER_MAX: i64 = 1000;

/// Initial slider positions for A, E, T (0.3, 2.0, 1.0 at the default scale).
pub const DEFAULT_SLIDER_POSITIONS: [i64; 3] = [30, 200, 100];

/// Built-in observations shown before anything is imported.
pub const DEFAULT_POINTS: [(f64, f64); 8] = [
    (0.0, 1.0),
    (1.0, 0.82),
    (2.0, 0.55),
    (3.0, 0.31),
    (4.0, 0.15),
    (5.0, 0.062),
    (6.0, 0.024),
    (8.0, 0.0031),
];

/// Inclusive integer range of a parameter slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub min: i64,
    pub max: i64,
}

impl SliderRange {
    pub fn clamp(&self, position: i64) -> i64 {
        position.clamp(self.min, self.max)
    }
}

/// Everything a session needs besides its data.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Left edge of the dose domain.
    pub left_border: f64,
    /// Right edge of the dose domain is `max(doses) * right_coefficient`.
    pub right_coefficient: f64,
    /// Display resolution of live and stored curves.
    pub points_count: usize,
    /// Slider position → value divisor.
    pub float_shift: f64,
    pub slider_range: SliderRange,
    pub initial_positions: [i64; 3],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            left_border: DEFAULT_LEFT_BORDER,
            right_coefficient: DEFAULT_RIGHT_COEFFICIENT,
            points_count: DEFAULT_POINTS_COUNT,
            float_shift: DEFAULT_FLOAT_SHIFT,
            slider_range: SliderRange {
                min: 0,
                max: DEFAULT_SLIDER_MAX,
            },
            initial_positions: DEFAULT_SLIDER_POSITIONS,
        }
    }
}

impl SessionConfig {
    /// Reject settings that would make slider or text conversion meaningless.
    pub fn validate(&self) -> Result<(), AppError> {
        let SliderRange { min, max } = self.slider_range;
        if min > max {
            return Err(AppError::new(
                2,
                format!("Invalid slider range: min {min} is above max {max}"),
            ));
        }
        if !(self.float_shift.is_finite() && self.float_shift > 0.0) {
            return Err(AppError::new(
                2,
                format!("Invalid float shift {}: expected a positive number", self.float_shift),
            ));
        }
        Ok(())
    }

    pub fn initial_position(&self, kind: ParamKind) -> i64 {
        self.slider_range.clamp(self.initial_positions[kind.index()])
    }
}

pub fn default_points() -> DosePoints {
    DosePoints::from_pairs(&DEFAULT_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_positions_are_clamped() {
        let config = SessionConfig {
            slider_range: SliderRange { min: 0, max: 150 },
            ..SessionConfig::default()
        };
        assert_eq!(config.initial_position(ParamKind::A), 30);
        assert_eq!(config.initial_position(ParamKind::E), 150);
    }

    #[test]
    fn validate_rejects_inverted_range_and_bad_shift() {
        assert!(SessionConfig::default().validate().is_ok());

        let inverted = SessionConfig {
            slider_range: SliderRange { min: 0, max: -5 },
            ..SessionConfig::default()
        };
        let err = inverted.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("slider range"), "{err}");

        for shift in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SessionConfig {
                float_shift: shift,
                ..SessionConfig::default()
            };
            assert_eq!(config.validate().unwrap_err().exit_code(), 2);
        }
    }

    #[test]
    fn default_points_are_paired() {
        let points = default_points();
        assert_eq!(points.len(), DEFAULT_POINTS.len());
        assert_eq!(points.max_dose(), Some(8.0));
    }
}
