//! Perimeter hole placement
//!
//! Holes are placed by one continuous walk around the polygon boundary. Arc
//! length that is left over at the end of an edge is carried into the next
//! edge, so consecutive holes are always `spacing` apart along the boundary.

use memslaser_core::{GeometryError, Point, Polygon};

/// Place `num_points` equidistant holes along a closed boundary
///
/// The first hole is exactly `vertices[0]`. The walk wraps around to the
/// first vertex when it passes the last one.
pub fn place_holes(
    vertices: &[Point],
    num_points: usize,
    spacing: f64,
) -> Result<Vec<Point>, GeometryError> {
    if vertices.len() < Polygon::MIN_VERTICES {
        return Err(GeometryError::TooFewVertices {
            found: vertices.len(),
        });
    }
    if num_points < 2 {
        return Err(GeometryError::TooFewPoints {
            requested: num_points,
        });
    }
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(GeometryError::InvalidSpacing { spacing });
    }
    let perimeter: f64 = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(a, b)| a.distance_to(b))
        .sum();
    if !(perimeter.is_finite() && perimeter > 0.0) {
        return Err(GeometryError::ZeroPerimeter);
    }

    let mut points = Vec::with_capacity(num_points);
    let mut start = vertices[0];
    let mut end = vertices[1];
    let mut vertex_index = 1;
    let mut carry = 0.0;
    points.push(start);

    while points.len() < num_points {
        let distance = start.distance_to(&end);
        let effective = spacing - carry;

        if distance <= effective {
            // A hole landing exactly on a vertex takes this branch with
            // effective == 0 and is placed at the start of the next edge.
            carry += distance;
            vertex_index = (vertex_index + 1) % vertices.len();
            start = end;
            end = vertices[vertex_index];
        } else {
            let hole = start.towards(&end, effective);
            points.push(hole);
            start = hole;
            carry = 0.0;
        }
    }

    Ok(points)
}

/// Place holes along a validated polygon
pub fn place_polygon_holes(
    polygon: &Polygon,
    num_points: usize,
    spacing: f64,
) -> Result<Vec<Point>, GeometryError> {
    place_holes(polygon.vertices(), num_points, spacing)
}
