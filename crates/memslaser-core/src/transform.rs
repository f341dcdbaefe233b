//! Affine layout transformations
//!
//! Any 2D affine transformation can be built by applying translation,
//! independent x/y scaling (negative factors reflect) and rotation about the
//! origin, in any order and any number of times. Order matters since these
//! operations do not generally commute.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single transformation primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transformation {
    /// Shift by `(dx, dy)`
    Translation { dx: f64, dy: f64 },
    /// Independent scaling of each axis
    Scaling { sx: f64, sy: f64 },
    /// Counter-clockwise rotation about (0, 0)
    Rotation { angle_rad: f64 },
}

impl Transformation {
    /// Uniform scaling of both axes
    pub fn uniform_scaling(factor: f64) -> Self {
        Self::Scaling {
            sx: factor,
            sy: factor,
        }
    }

    /// Apply this transformation to a point
    pub fn apply(&self, p: Point) -> Point {
        match *self {
            Self::Translation { dx, dy } => Point::new(p.x + dx, p.y + dy),
            Self::Scaling { sx, sy } => Point::new(p.x * sx, p.y * sy),
            Self::Rotation { angle_rad } => {
                let (sin, cos) = angle_rad.sin_cos();
                Point::new(cos * p.x - sin * p.y, sin * p.x + cos * p.y)
            }
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Translation { dx, dy } => write!(f, "Translation (dx = {}, dy = {})", dx, dy),
            Self::Scaling { sx, sy } => write!(f, "Scaling (sx = {}, sy = {})", sx, sy),
            Self::Rotation { angle_rad } => write!(f, "Rotation ({} rad)", angle_rad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_is_counter_clockwise() {
        let p = Transformation::Rotation {
            angle_rad: FRAC_PI_2,
        }
        .apply(Point::new(1.0, 0.0));
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_order_matters() {
        let translate = Transformation::Translation { dx: 1.0, dy: 0.0 };
        let scale = Transformation::uniform_scaling(2.0);
        let origin = Point::new(0.0, 0.0);

        let a = scale.apply(translate.apply(origin));
        let b = translate.apply(scale.apply(origin));
        assert_eq!(a, Point::new(2.0, 0.0));
        assert_eq!(b, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_negative_scaling_reflects() {
        let p = Transformation::Scaling { sx: -1.0, sy: 1.0 }.apply(Point::new(3.0, 4.0));
        assert_eq!(p, Point::new(-3.0, 4.0));
    }

    #[test]
    fn test_deserialize_tagged() {
        let t: Transformation =
            serde_json::from_str(r#"{"type": "translation", "dx": 1.5, "dy": -2.0}"#).unwrap();
        assert_eq!(t, Transformation::Translation { dx: 1.5, dy: -2.0 });
    }
}
