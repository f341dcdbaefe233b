//! Membrane corner alignment
//!
//! Registers a layout centered at the origin to a square membrane mounted on
//! the stage. The operator measures the displacement from the bottom-left to
//! the bottom-right membrane corner; from it follow the actual membrane size
//! and its angular misalignment. The stage is zeroed at the bottom-right
//! corner, so the layout origin is moved there last.

use crate::interfaces::LayoutAligner;
use memslaser_core::{AlignmentError, Transformation};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, SQRT_2};
use tracing::debug;

/// Measured membrane corners; all values share one length unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembraneCornerMeasurement {
    /// Membrane side length assumed by the layout design
    pub nominal_side_length: f64,
    /// X displacement from the bottom-left to the bottom-right corner
    pub dx: f64,
    /// Y displacement from the bottom-left to the bottom-right corner
    pub dy: f64,
}

/// Aligner computing scaling, rotation and translation from corner measurements
#[derive(Debug, Clone, PartialEq)]
pub struct MembraneCornerAligner {
    measurement: MembraneCornerMeasurement,
    transformations: Vec<Transformation>,
}

impl MembraneCornerAligner {
    pub fn new(measurement: MembraneCornerMeasurement) -> Result<Self, AlignmentError> {
        let MembraneCornerMeasurement {
            nominal_side_length,
            dx,
            dy,
        } = measurement;

        if !(nominal_side_length.is_finite() && nominal_side_length > 0.0) {
            return Err(AlignmentError::InvalidSideLength {
                value: nominal_side_length,
            });
        }

        let actual_side_length = dx.hypot(dy);
        if actual_side_length == 0.0 {
            return Err(AlignmentError::ZeroDisplacement);
        }
        let scaling_factor = actual_side_length / nominal_side_length;

        let rotation = dy.atan2(dx);
        if !(-FRAC_PI_4..=FRAC_PI_4).contains(&rotation) {
            return Err(AlignmentError::AngleOutOfRange {
                angle_deg: rotation.to_degrees(),
            });
        }

        // Vector from the bottom-right corner to the membrane center
        let center_angle = FRAC_PI_4 - rotation;
        let half_diagonal = SQRT_2 / 2.0 * actual_side_length;
        let to_center_x = -half_diagonal * center_angle.cos();
        let to_center_y = half_diagonal * center_angle.sin();

        debug!(
            scaling_factor,
            rotation_deg = rotation.to_degrees(),
            to_center_x,
            to_center_y,
            "Computed membrane alignment"
        );

        // Scaling and rotation act about the layout center, translation goes last
        let transformations = vec![
            Transformation::uniform_scaling(scaling_factor),
            Transformation::Rotation {
                angle_rad: rotation,
            },
            Transformation::Translation {
                dx: to_center_x,
                dy: to_center_y,
            },
        ];

        Ok(Self {
            measurement,
            transformations,
        })
    }

    pub fn measurement(&self) -> &MembraneCornerMeasurement {
        &self.measurement
    }
}

impl LayoutAligner for MembraneCornerAligner {
    fn transformations(&self) -> Vec<Transformation> {
        self.transformations.clone()
    }

    fn describe(&self) -> Vec<String> {
        vec![
            format!(
                "Nominal membrane side length: {}",
                self.measurement.nominal_side_length
            ),
            format!(
                "Displacement from bottom-left to bottom-right corner of membrane: dx = {}, dy = {}",
                self.measurement.dx, self.measurement.dy
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memslaser_core::Point;

    fn aligner(nominal: f64, dx: f64, dy: f64) -> Result<MembraneCornerAligner, AlignmentError> {
        MembraneCornerAligner::new(MembraneCornerMeasurement {
            nominal_side_length: nominal,
            dx,
            dy,
        })
    }

    fn apply_all(aligner: &MembraneCornerAligner, p: Point) -> Point {
        aligner
            .transformations()
            .iter()
            .fold(p, |p, t| t.apply(p))
    }

    #[test]
    fn test_aligned_membrane_moves_center_to_bottom_right_frame() {
        let aligner = aligner(100.0, 100.0, 0.0).unwrap();
        let transformations = aligner.transformations();
        assert_eq!(transformations.len(), 3);
        assert_eq!(transformations[0], Transformation::uniform_scaling(1.0));

        // Layout center lands at (-50, 50) relative to the bottom-right corner
        let center = apply_all(&aligner, Point::new(0.0, 0.0));
        assert!((center.x + 50.0).abs() < 1e-9);
        assert!((center.y - 50.0).abs() < 1e-9);

        // Bottom-right corner of the layout becomes the origin
        let corner = apply_all(&aligner, Point::new(50.0, -50.0));
        assert!(corner.x.abs() < 1e-9);
        assert!(corner.y.abs() < 1e-9);
    }

    #[test]
    fn test_scaled_and_rotated_membrane() {
        let angle = 10f64.to_radians();
        let aligner = aligner(100.0, 110.0 * angle.cos(), 110.0 * angle.sin()).unwrap();
        let corner = apply_all(&aligner, Point::new(50.0, -50.0));
        assert!(corner.x.abs() < 1e-9);
        assert!(corner.y.abs() < 1e-9);

        match aligner.transformations()[0] {
            Transformation::Scaling { sx, sy } => {
                assert!((sx - 1.1).abs() < 1e-12);
                assert_eq!(sx, sy);
            }
            ref other => panic!("expected scaling, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_corners_rejected() {
        let err = aligner(100.0, 0.0, 100.0).unwrap_err();
        assert!(matches!(err, AlignmentError::AngleOutOfRange { angle_deg } if (angle_deg - 90.0).abs() < 1e-9));
    }

    #[test]
    fn test_invalid_measurements() {
        assert_eq!(
            aligner(0.0, 1.0, 0.0).unwrap_err(),
            AlignmentError::InvalidSideLength { value: 0.0 }
        );
        assert_eq!(
            aligner(100.0, 0.0, 0.0).unwrap_err(),
            AlignmentError::ZeroDisplacement
        );
    }

    #[test]
    fn test_describe() {
        let lines = aligner(100.0, 99.0, 1.0).unwrap().describe();
        assert_eq!(lines[0], "Nominal membrane side length: 100");
        assert!(lines[1].ends_with("dx = 99, dy = 1"));
    }
}
