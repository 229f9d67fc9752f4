//! Physical panel dimensions and the policies that shape mesh generation.
//!
//! [`PanelParameters`] is an immutable record. It is validated once at the
//! boundary ([`PanelParameters::validate`]) before any geometry is produced.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{LithoError, Result};

/// Thickness of the back support wall, in millimetres. Not user adjustable.
pub const WALL_THICKNESS: f64 = 0.5;

/// How the radial index is resolved when a cell reads the row beyond the
/// outermost ring.
///
/// Radius is not periodic, so wrapping is questionable; `Wrap` is kept as the
/// default because it reproduces the reference output byte for byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialEdgePolicy {
    /// Row `resolution` reads row 0 (the inner ring's heights at the rim).
    #[default]
    Wrap,
    /// Row `resolution` reads row `resolution - 1`.
    Clamp,
}

/// What to do with a triangle whose normal has zero length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Keep the triangle and store the zero vector as its normal.
    #[default]
    ZeroNormal,
    /// Abort with [`LithoError::DegenerateGeometry`].
    Reject,
}

/// Accepted UI ranges, in millimetres.
pub mod ranges {
    use std::ops::RangeInclusive;

    pub const MAX_HEIGHT: RangeInclusive<f64> = 1.0..=10.0;
    pub const MIN_HEIGHT: RangeInclusive<f64> = 0.1..=2.0;
    pub const OUTER_DIAMETER: RangeInclusive<f64> = 50.0..=200.0;
    pub const INNER_DIAMETER: RangeInclusive<f64> = 10.0..=50.0;
    pub const WALL_HEIGHT: RangeInclusive<f64> = 1.0..=10.0;
    pub const WALL_DISTANCE: RangeInclusive<f64> = 20.0..=90.0;
}

/// Dimensions of one lithophane panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PanelParameters {
    /// Relief height for a black pixel.
    pub max_height: f64,
    /// Relief height for a white pixel; also the z of the flat back.
    pub min_height: f64,
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    /// How far the support stand reaches below the panel.
    pub wall_height: f64,
    /// Inner radius of the support stand.
    pub wall_distance: f64,
    #[serde(default)]
    pub radial_edge: RadialEdgePolicy,
    #[serde(default)]
    pub degenerate: DegeneratePolicy,
}

impl Default for PanelParameters {
    fn default() -> Self {
        Self {
            max_height: 3.0,
            min_height: 0.5,
            outer_diameter: 100.0,
            inner_diameter: 20.0,
            wall_height: 5.0,
            wall_distance: 30.0,
            radial_edge: RadialEdgePolicy::default(),
            degenerate: DegeneratePolicy::default(),
        }
    }
}

impl PanelParameters {
    /// A coaster-sized panel near the lower end of every range.
    pub fn compact() -> Self {
        Self {
            max_height: 2.5,
            min_height: 0.4,
            outer_diameter: 60.0,
            inner_diameter: 12.0,
            wall_height: 3.0,
            wall_distance: 22.0,
            ..Self::default()
        }
    }

    /// A wall-hanging panel near the upper end of every range.
    pub fn large() -> Self {
        Self {
            max_height: 4.0,
            min_height: 0.8,
            outer_diameter: 180.0,
            inner_diameter: 30.0,
            wall_height: 8.0,
            wall_distance: 80.0,
            ..Self::default()
        }
    }

    pub fn with_radial_edge(mut self, policy: RadialEdgePolicy) -> Self {
        self.radial_edge = policy;
        self
    }

    pub fn with_degenerate(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate = policy;
        self
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_diameter / 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_diameter / 2.0
    }

    /// Inner face of the support wall: `wall_distance`, pulled in so the
    /// wall never reaches past the panel rim.
    pub fn stand_inner_radius(&self) -> f64 {
        self.wall_distance.min(self.outer_radius() - WALL_THICKNESS)
    }

    /// Outer face of the support wall, `WALL_THICKNESS` beyond the inner one.
    pub fn stand_outer_radius(&self) -> f64 {
        self.stand_inner_radius() + WALL_THICKNESS
    }

    /// Check the geometric invariants the mesh builder relies on.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("maxHeight", self.max_height),
            ("minHeight", self.min_height),
            ("outerDiameter", self.outer_diameter),
            ("innerDiameter", self.inner_diameter),
            ("wallHeight", self.wall_height),
            ("wallDistance", self.wall_distance),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LithoError::invalid_parameters(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if self.min_height >= self.max_height {
            return Err(LithoError::invalid_parameters(format!(
                "minHeight ({}) must be less than maxHeight ({})",
                self.min_height, self.max_height
            )));
        }
        if self.inner_diameter <= 0.0 {
            return Err(LithoError::invalid_parameters(format!(
                "innerDiameter must be positive, got {}",
                self.inner_diameter
            )));
        }
        if self.inner_diameter >= self.outer_diameter {
            return Err(LithoError::invalid_parameters(format!(
                "innerDiameter ({}) must be less than outerDiameter ({})",
                self.inner_diameter, self.outer_diameter
            )));
        }
        if self.wall_distance <= 0.0 || self.wall_distance >= self.outer_radius() {
            return Err(LithoError::invalid_parameters(format!(
                "wallDistance ({}) must lie strictly between 0 and {}",
                self.wall_distance,
                self.outer_radius()
            )));
        }
        if self.wall_height <= 0.0 {
            return Err(LithoError::invalid_parameters(format!(
                "wallHeight must be positive, got {}",
                self.wall_height
            )));
        }
        Ok(())
    }

    /// Check every field against the accepted UI ranges, then the invariants.
    pub fn check_ranges(&self) -> Result<()> {
        check_range("maxHeight", self.max_height, ranges::MAX_HEIGHT)?;
        check_range("minHeight", self.min_height, ranges::MIN_HEIGHT)?;
        check_range("outerDiameter", self.outer_diameter, ranges::OUTER_DIAMETER)?;
        check_range("innerDiameter", self.inner_diameter, ranges::INNER_DIAMETER)?;
        check_range("wallHeight", self.wall_height, ranges::WALL_HEIGHT)?;
        check_range("wallDistance", self.wall_distance, ranges::WALL_DISTANCE)?;
        self.validate()
    }
}

fn check_range(name: &str, value: f64, range: RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(LithoError::invalid_parameters(format!(
            "{name} = {value} is outside {}..={}",
            range.start(),
            range.end()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_presets_are_valid() {
        for params in [
            PanelParameters::default(),
            PanelParameters::compact(),
            PanelParameters::large(),
        ] {
            params.validate().unwrap();
            params.check_ranges().unwrap();
        }
    }

    #[test]
    fn test_inner_larger_than_outer_rejected() {
        let params = PanelParameters {
            inner_diameter: 60.0,
            outer_diameter: 50.0,
            ..PanelParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(LithoError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_min_not_below_max_rejected() {
        let params = PanelParameters {
            min_height: 3.0,
            max_height: 3.0,
            ..PanelParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_wall_distance_bounds() {
        let base = PanelParameters::default();
        for wall_distance in [0.0, -1.0, base.outer_radius(), base.outer_radius() + 1.0] {
            let params = PanelParameters {
                wall_distance,
                ..base
            };
            assert!(params.validate().is_err(), "wallDistance {wall_distance}");
        }
        let params = PanelParameters {
            wall_distance: base.outer_radius() - 0.01,
            ..base
        };
        params.validate().unwrap();
    }

    #[test]
    fn test_stand_wall_stays_inside_rim() {
        let base = PanelParameters::default();
        assert_eq!(base.stand_inner_radius(), 30.0);
        assert_eq!(base.stand_outer_radius(), 30.0 + WALL_THICKNESS);

        let near_rim = PanelParameters {
            wall_distance: base.outer_radius() - 0.1,
            ..base
        };
        assert_eq!(near_rim.stand_outer_radius(), base.outer_radius());
        assert_eq!(
            near_rim.stand_outer_radius() - near_rim.stand_inner_radius(),
            WALL_THICKNESS
        );
    }

    #[test]
    fn test_nan_rejected() {
        let params = PanelParameters {
            max_height: f64::NAN,
            ..PanelParameters::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("maxHeight"));
    }

    #[test]
    fn test_range_check_is_stricter_than_validate() {
        let params = PanelParameters {
            max_height: 12.0,
            ..PanelParameters::default()
        };
        params.validate().unwrap();
        assert!(params.check_ranges().is_err());
    }

    #[test]
    fn test_serde_uses_camel_case_and_defaults_policies() {
        let json = r#"{
            "maxHeight": 3.0, "minHeight": 0.5,
            "outerDiameter": 100.0, "innerDiameter": 20.0,
            "wallHeight": 5.0, "wallDistance": 30.0
        }"#;
        let params: PanelParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params, PanelParameters::default());
    }
}
