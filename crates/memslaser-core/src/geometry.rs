//! 2D geometry model
//!
//! Provides [`Point`] for hole and vertex coordinates and [`Polygon`], an
//! implicitly closed vertex list validated on construction.

use crate::error::GeometryError;
use crate::transform::Transformation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the layout plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point on the line towards `other` at `distance` from `self`
    ///
    /// `self` and `other` must not coincide.
    pub fn towards(&self, other: &Point, distance: f64) -> Point {
        let length = self.distance_to(other);
        let ux = (other.x - self.x) / length;
        let uy = (other.y - self.y) / length;
        Point::new(self.x + distance * ux, self.y + distance * uy)
    }

    /// Multiply both coordinates by a factor
    pub fn scaled(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from(coords: [f64; 2]) -> Self {
        Point::new(coords[0], coords[1])
    }
}

/// Closed polygon boundary
///
/// The last vertex connects back to the first. Holds at least three vertices
/// with finite coordinates and a non-zero perimeter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Minimum number of vertices of a polygon
    pub const MIN_VERTICES: usize = 3;

    /// Build a polygon from points
    pub fn new(vertices: Vec<Point>) -> Result<Self, GeometryError> {
        if vertices.len() < Self::MIN_VERTICES {
            return Err(GeometryError::TooFewVertices {
                found: vertices.len(),
            });
        }
        if let Some(vertex_index) = vertices
            .iter()
            .position(|v| !v.x.is_finite() || !v.y.is_finite())
        {
            return Err(GeometryError::NonFiniteCoordinate { vertex_index });
        }
        let polygon = Self { vertices };
        if polygon.perimeter() <= 0.0 {
            return Err(GeometryError::ZeroPerimeter);
        }
        Ok(polygon)
    }

    /// Build a polygon from coordinate rows of shape `[N][2]`
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, GeometryError> {
        let mut vertices = Vec::with_capacity(rows.len());
        for (vertex_index, row) in rows.iter().enumerate() {
            match row.as_ref() {
                [x, y] => vertices.push(Point::new(*x, *y)),
                other => {
                    return Err(GeometryError::WrongDimensionality {
                        vertex_index,
                        found: other.len(),
                    })
                }
            }
        }
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Sum of edge lengths including the closing edge
    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance_to(b)).sum()
    }

    /// Iterate over edges as vertex pairs, closing edge last
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
    }

    /// Apply a transformation to every vertex
    pub fn transform(&mut self, transformation: &Transformation) {
        for vertex in &mut self.vertices {
            *vertex = transformation.apply(*vertex);
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform(&Transformation::Translation { dx, dy });
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform(&Transformation::Scaling { sx, sy });
    }

    /// Rotate counter-clockwise about (0, 0)
    pub fn rotate(&mut self, angle_rad: f64) {
        self.transform(&Transformation::Rotation { angle_rad });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Polygon {
        Polygon::from_rows(&[[0.0, 0.0], [side, 0.0], [side, side], [0.0, side]]).unwrap()
    }

    #[test]
    fn test_perimeter_includes_closing_edge() {
        assert_eq!(square(10.0).perimeter(), 40.0);

        let triangle = Polygon::from_rows(&[[0.0, 0.0], [3.0, 0.0], [3.0, 4.0]]).unwrap();
        assert!((triangle.perimeter() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wrong_dimensionality() {
        let rows = vec![vec![0.0, 0.0], vec![1.0, 0.0, 5.0], vec![1.0, 1.0]];
        assert_eq!(
            Polygon::from_rows(&rows).unwrap_err(),
            GeometryError::WrongDimensionality {
                vertex_index: 1,
                found: 3
            }
        );
    }

    #[test]
    fn test_rejects_too_few_vertices() {
        assert_eq!(
            Polygon::from_rows(&[[0.0, 0.0], [1.0, 0.0]]).unwrap_err(),
            GeometryError::TooFewVertices { found: 2 }
        );
    }

    #[test]
    fn test_rejects_degenerate_polygons() {
        assert_eq!(
            Polygon::from_rows(&[[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]]).unwrap_err(),
            GeometryError::ZeroPerimeter
        );
        assert_eq!(
            Polygon::from_rows(&[[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0]]).unwrap_err(),
            GeometryError::NonFiniteCoordinate { vertex_index: 1 }
        );
    }

    #[test]
    fn test_towards() {
        let p = Point::new(0.0, 0.0).towards(&Point::new(10.0, 0.0), 2.5);
        assert_eq!(p, Point::new(2.5, 0.0));
    }

    #[test]
    fn test_transform_preserves_perimeter_under_rigid_motion() {
        let mut polygon = square(10.0);
        polygon.rotate(0.3);
        polygon.translate(-4.0, 7.0);
        assert!((polygon.perimeter() - 40.0).abs() < 1e-9);

        polygon.scale(0.5, 0.5);
        assert!((polygon.perimeter() - 20.0).abs() < 1e-9);
    }
}
