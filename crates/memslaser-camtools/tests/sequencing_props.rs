use memslaser_camtools::{
    place_holes, plan_polygon_hole_sequence, schedule_hole_indices, SegmentTemplate,
};
use memslaser_core::{Point, Polygon};
use proptest::prelude::*;

fn rectangle(width: f64, height: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(width, 0.0),
        Point::new(width, height),
        Point::new(0.0, height),
    ]
}

/// Arc length of a point on the rectangle boundary, walking from the origin
fn rectangle_arc(p: &Point, width: f64, height: f64) -> f64 {
    let eps = 1e-6;
    if p.y.abs() < eps {
        p.x
    } else if (p.x - width).abs() < eps {
        width + p.y
    } else if (p.y - height).abs() < eps {
        width + height + (width - p.x)
    } else {
        2.0 * width + height + (height - p.y)
    }
}

/// Star-shaped polygon from (angular gap, radius) spokes, non-convex in general
fn star_polygon(spokes: &[(f64, f64)]) -> Vec<Point> {
    let total: f64 = spokes.iter().map(|(gap, _)| gap).sum();
    let mut angle = 0.0_f64;
    spokes
        .iter()
        .map(|&(gap, radius)| {
            let vertex = Point::new(radius * angle.cos(), radius * angle.sin());
            angle += gap / total * std::f64::consts::TAU;
            vertex
        })
        .collect()
}

/// Arc length of each point along the boundary, walking the edges from the
/// first vertex. Points must be in boundary order.
fn boundary_arcs(vertices: &[Point], points: &[Point]) -> Vec<f64> {
    let n = vertices.len();
    let mut arcs = Vec::with_capacity(points.len());
    let mut edge = 0;
    let mut walked = 0.0;
    for point in points {
        while edge < n {
            let (a, b) = (vertices[edge], vertices[(edge + 1) % n]);
            let length = a.distance_to(&b);
            if a.distance_to(point) + point.distance_to(&b) - length < 1e-9 {
                arcs.push(walked + a.distance_to(point));
                break;
            }
            walked += length;
            edge += 1;
        }
    }
    arcs
}

proptest! {
    #[test]
    fn plan_invariants_hold(
        perimeter in 10.0f64..2000.0,
        min_initial in 2.0f64..50.0,
        final_ratio in 0.01f64..0.9,
    ) {
        let target_final = min_initial * final_ratio;
        prop_assume!(perimeter / min_initial >= 2.0);

        let plan = plan_polygon_hole_sequence(perimeter, min_initial, None, target_final).unwrap();
        prop_assert_eq!(
            plan.total_num_holes,
            plan.initial_num_holes * (1usize << plan.num_extra_passes)
        );
        prop_assert!(plan.initial_num_holes >= 2);
        prop_assert!(plan.initial_spacing >= min_initial);
        prop_assert!((plan.final_spacing - perimeter / plan.total_num_holes as f64).abs() < 1e-12);

        let again = plan_polygon_hole_sequence(perimeter, min_initial, None, target_final).unwrap();
        prop_assert_eq!(plan, again);
    }

    #[test]
    fn schedule_covers_every_hole_once(
        num_extra_passes in 0u32..8,
        initial_num_holes in 2usize..40,
    ) {
        let template = SegmentTemplate::new(num_extra_passes);
        let schedule = schedule_hole_indices(&template, initial_num_holes);
        prop_assert_eq!(schedule.len(), num_extra_passes as usize + 1);

        let total = initial_num_holes << num_extra_passes;
        let mut indices: Vec<usize> = schedule.into_iter().flatten().collect();
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn placement_walks_equal_arcs(
        width in 1.0f64..100.0,
        height in 1.0f64..100.0,
        num_points in 2usize..200,
    ) {
        let vertices = rectangle(width, height);
        let perimeter = Polygon::new(vertices.clone()).unwrap().perimeter();
        let spacing = perimeter / num_points as f64;

        let holes = place_holes(&vertices, num_points, spacing).unwrap();
        prop_assert_eq!(holes.len(), num_points);
        prop_assert_eq!(holes[0], vertices[0]);
        for (i, hole) in holes.iter().enumerate() {
            let arc = rectangle_arc(hole, width, height);
            prop_assert!(
                (arc - i as f64 * spacing).abs() < 1e-6,
                "hole {} at {} expected arc {}, got {}", i, hole, i as f64 * spacing, arc
            );
        }
    }

    #[test]
    fn placement_walks_equal_arcs_on_any_polygon(
        spokes in prop::collection::vec((0.5f64..1.0, 20.0f64..100.0), 3..12),
        num_points in 2usize..200,
    ) {
        let vertices = star_polygon(&spokes);
        let perimeter = Polygon::new(vertices.clone()).unwrap().perimeter();
        let spacing = perimeter / num_points as f64;

        let holes = place_holes(&vertices, num_points, spacing).unwrap();
        prop_assert_eq!(holes.len(), num_points);
        prop_assert_eq!(holes[0], vertices[0]);

        let arcs = boundary_arcs(&vertices, &holes);
        prop_assert_eq!(arcs.len(), num_points, "every hole lies on the boundary");
        for (i, arc) in arcs.iter().enumerate() {
            prop_assert!(
                (arc - i as f64 * spacing).abs() < 1e-6,
                "hole {} expected arc {}, got {}", i, i as f64 * spacing, arc
            );
        }
        let walked: f64 = holes.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
        prop_assert!(walked <= (num_points - 1) as f64 * spacing + 1e-6);
    }
}
