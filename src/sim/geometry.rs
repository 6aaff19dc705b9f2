//! Segment and polygon math for the trail
//!
//! Everything here is pure. "No intersection" is the common answer and is
//! reported as `None`, not as an error.

use glam::Vec2;

/// 2D cross product (z component of u × v)
#[inline]
pub fn cross(u: Vec2, v: Vec2) -> f32 {
    u.x * v.y - u.y * v.x
}

/// Intersect segment p→p2 with segment q→q2
///
/// Solves `p + t*r = q + u*s` with the cross-product method and returns the
/// intersection point when both `t` and `u` fall in `[0, 1]`. Parallel
/// segments (`r × s == 0`, compared exactly) never intersect, so callers must
/// live with false negatives for nearly parallel ones.
pub fn intersect(p: Vec2, p2: Vec2, q: Vec2, q2: Vec2) -> Option<Vec2> {
    let r = p2 - p;
    let s = q2 - q;
    let rs = cross(r, s);
    if rs == 0.0 {
        return None;
    }
    let qp = q - p;
    let t = cross(qp, s) / rs;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let u = cross(qp, r) / rs;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(p + t * r)
}

/// Squared distance between two points
#[inline]
pub fn distance_squared(u: Vec2, v: Vec2) -> f32 {
    let d = u - v;
    d.x * d.x + d.y * d.y
}

/// Squared distance from `p` to the segment v–w
pub fn distance_to_segment_squared(p: Vec2, v: Vec2, w: Vec2) -> f32 {
    let l2 = distance_squared(v, w);
    if l2 == 0.0 {
        return distance_squared(p, v);
    }
    let t = (p - v).dot(w - v) / l2;
    if t < 0.0 {
        return distance_squared(p, v);
    }
    if t > 1.0 {
        return distance_squared(p, w);
    }
    distance_squared(p, v + t * (w - v))
}

/// Even-odd test of `p` against a polygon given as an implicitly closed ring
///
/// Points exactly on an edge may land on either side; polygons with fewer
/// than three vertices enclose nothing. Self-intersecting rings follow the
/// even-odd rule, so doubly wound regions count as outside.
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for (i, a) in polygon.iter().enumerate() {
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            // Edge straddles the horizontal ray; a.y != b.y here
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cross() {
        assert_eq!(cross(Vec2::X, Vec2::Y), 1.0);
        assert_eq!(cross(Vec2::Y, Vec2::X), -1.0);
        assert_eq!(cross(Vec2::new(2.0, 4.0), Vec2::new(1.0, 2.0)), 0.0);
    }

    #[test]
    fn test_intersect_crossing() {
        let hit = intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0),
        );
        let hit = hit.expect("diagonals cross");
        assert!((hit - Vec2::new(5.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_intersect_touching_endpoint() {
        // Shared endpoint counts (t = 1, u = 0)
        let hit = intersect(
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert_eq!(hit, Some(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_intersect_misses() {
        // Parallel
        assert_eq!(
            intersect(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::new(1.0, 1.0)),
            None
        );
        // Collinear overlap is still "parallel"
        assert_eq!(
            intersect(Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::X, Vec2::new(3.0, 0.0)),
            None
        );
        // Lines cross but outside the second segment
        assert_eq!(
            intersect(
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(5.0, 1.0),
                Vec2::new(5.0, 4.0)
            ),
            None
        );
        // Zero-length segment
        assert_eq!(
            intersect(Vec2::ZERO, Vec2::ZERO, Vec2::new(-1.0, 0.0), Vec2::X),
            None
        );
    }

    #[test]
    fn test_distance_to_segment_squared() {
        let v = Vec2::new(0.0, 0.0);
        let w = Vec2::new(10.0, 0.0);
        // Projection inside the segment
        assert_eq!(distance_to_segment_squared(Vec2::new(5.0, 3.0), v, w), 9.0);
        // Clamped to either end
        assert_eq!(distance_to_segment_squared(Vec2::new(-3.0, 4.0), v, w), 25.0);
        assert_eq!(distance_to_segment_squared(Vec2::new(13.0, 4.0), v, w), 25.0);
        // Degenerate segment
        assert_eq!(distance_to_segment_squared(Vec2::new(3.0, 4.0), v, v), 25.0);
    }

    #[test]
    fn test_point_in_polygon_square() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, 100.0),
        ];
        assert!(point_in_polygon(Vec2::new(50.0, 50.0), &square));
        assert!(!point_in_polygon(Vec2::new(150.0, 50.0), &square));
        assert!(!point_in_polygon(Vec2::new(50.0, -1.0), &square));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // U shape open at the top; the notch is outside
        let u = [
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(30.0, 30.0),
            Vec2::new(20.0, 30.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 30.0),
            Vec2::new(0.0, 30.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 20.0), &u));
        assert!(point_in_polygon(Vec2::new(25.0, 20.0), &u));
        assert!(!point_in_polygon(Vec2::new(15.0, 20.0), &u));
    }

    #[test]
    fn test_point_in_polygon_degenerate() {
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
        assert!(!point_in_polygon(Vec2::ZERO, &[Vec2::X, Vec2::Y]));
    }

    fn grid_point() -> impl Strategy<Value = Vec2> {
        (-500i32..500, -500i32..500).prop_map(|(x, y)| Vec2::new(x as f32, y as f32))
    }

    proptest! {
        #[test]
        fn test_intersect_symmetry(p in grid_point(), p2 in grid_point(), q in grid_point(), q2 in grid_point()) {
            let a = intersect(p, p2, q, q2);
            let b = intersect(q, q2, p, p2);
            match (a, b) {
                (None, None) => {}
                (Some(a), Some(b)) => prop_assert!((a - b).length() < 1e-2, "{a} vs {b}"),
                _ => prop_assert!(false, "asymmetric result {a:?} vs {b:?}"),
            }
        }
    }
}
