use super::orientation::{orientation, Orientation};
use super::polygon_2d::signed_area_xz;
use super::{Point3, TOLERANCE};

/// Computes the convex hull of a point set in the `(x, z)` plane by gift
/// wrapping (Jarvis march).
///
/// The walk starts at the minimum-x point and, at every step, keeps the
/// candidate that leaves all other points on its left, so the hull comes out
/// anticlockwise. Returns an empty vector for fewer than 3 points, when the
/// walk fails to close within `n` steps, or when the hull has no area
/// (coincident or collinear input).
#[must_use]
pub fn convex_hull(points: &[Point3]) -> Vec<Point3> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut start = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        if pt.x < points[start].x {
            start = i;
        }
    }

    let mut hull = Vec::new();
    let mut current = start;
    loop {
        if hull.len() == n {
            return Vec::new();
        }
        hull.push(points[current]);

        let mut next = (current + 1) % n;
        for (i, candidate) in points.iter().enumerate() {
            let turn = orientation(&points[current], candidate, &points[next]);
            if turn == Orientation::Anticlockwise {
                next = i;
            }
        }

        current = next;
        if current == start {
            break;
        }
    }

    if hull.len() < 3 || signed_area_xz(&hull).abs() < TOLERANCE {
        return Vec::new();
    }
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    #[test]
    fn interior_points_are_dropped() {
        let pts = vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(1.0, 1.0),
            p(4.0, 4.0),
            p(2.0, 2.5),
            p(0.0, 4.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&p(1.0, 1.0)));
        assert!(!hull.contains(&p(2.0, 2.5)));
    }

    #[test]
    fn hull_starts_at_minimum_x() {
        let pts = vec![p(3.0, 0.0), p(5.0, 2.0), p(-1.0, 1.0), p(2.0, 4.0)];
        let hull = convex_hull(&pts);
        assert_eq!(hull[0], p(-1.0, 1.0));
    }

    #[test]
    fn hull_is_anticlockwise() {
        let pts = vec![
            p(0.0, 0.0),
            p(0.0, 3.0),
            p(3.0, 3.0),
            p(3.0, 0.0),
            p(1.0, 1.0),
        ];
        let hull = convex_hull(&pts);
        assert!(signed_area_xz(&hull) > 0.0);
    }

    #[test]
    fn too_few_points_yield_empty() {
        assert!(convex_hull(&[p(0.0, 0.0), p(1.0, 1.0)]).is_empty());
        assert!(convex_hull(&[]).is_empty());
    }

    #[test]
    fn coincident_points_yield_empty() {
        let pts = vec![p(1.0, 1.0), p(1.0, 1.0), p(1.0, 1.0)];
        assert!(convex_hull(&pts).is_empty());
    }
}
