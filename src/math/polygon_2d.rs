use super::intersect_2d::segments_intersect;
use super::{Point3, Vector3, TOLERANCE};

/// Computes the signed area of a closed polygon in the `(x, z)` plane
/// (shoelace formula).
///
/// Positive for anticlockwise, negative for clockwise.
#[must_use]
pub fn signed_area_xz(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].z - points[j].x * points[i].z;
    }
    sum * 0.5
}

/// Returns whether every point lies inside the rectangle of the given
/// `(width, depth)` centred on the origin.
#[must_use]
pub fn within_bounds(points: &[Point3], size: [f64; 2]) -> bool {
    let half_w = size[0] * 0.5;
    let half_d = size[1] * 0.5;
    points
        .iter()
        .all(|p| p.x.abs() <= half_w && p.z.abs() <= half_d)
}

/// Returns whether any two non-adjacent edges of the closed loop intersect.
///
/// Adjacent edges share an endpoint and are never compared.
#[must_use]
pub fn loop_self_intersects(points: &[Point3]) -> bool {
    let n = points.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a1 = &points[i];
        let a2 = &points[(i + 1) % n];
        // n − 3 edges are neither edge i nor its two neighbours.
        for j in (i + 2)..(i + n - 1) {
            let b1 = &points[j % n];
            let b2 = &points[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

/// Signed turn angle at `current`, in degrees, between the incoming direction
/// `current − prev` and the outgoing direction `next − current`.
///
/// Measured in the ground plane; positive is anticlockwise. Degenerate
/// (zero-length) directions yield `0.0`.
#[must_use]
pub fn signed_turn_angle(prev: &Point3, current: &Point3, next: &Point3) -> f64 {
    let incoming = current - prev;
    let outgoing = next - current;
    let cross = incoming.x * outgoing.z - incoming.z * outgoing.x;
    let dot = incoming.x * outgoing.x + incoming.z * outgoing.z;
    if cross.abs() < TOLERANCE && dot.abs() < TOLERANCE {
        return 0.0;
    }
    cross.atan2(dot).to_degrees()
}

/// Rotates a vector about the vertical axis by `degrees` (anticlockwise
/// positive), leaving its elevation untouched.
#[must_use]
pub fn rotate_xz(v: &Vector3, degrees: f64) -> Vector3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vector3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    fn square() -> Vec<Point3> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
    }

    #[test]
    fn signed_area_anticlockwise_square() {
        assert_abs_diff_eq!(signed_area_xz(&square()), 1.0, epsilon = TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert_abs_diff_eq!(signed_area_xz(&[p(0.0, 0.0)]), 0.0);
        assert_abs_diff_eq!(signed_area_xz(&[]), 0.0);
    }

    #[test]
    fn bounds_are_inclusive() {
        let pts = vec![p(-5.0, 2.0), p(5.0, -2.0)];
        assert!(within_bounds(&pts, [10.0, 4.0]));
        assert!(!within_bounds(&pts, [9.9, 4.0]));
    }

    #[test]
    fn bounds_ignore_elevation() {
        let pts = vec![Point3::new(0.0, 100.0, 0.0)];
        assert!(within_bounds(&pts, [1.0, 1.0]));
    }

    #[test]
    fn square_does_not_self_intersect() {
        assert!(!loop_self_intersects(&square()));
    }

    #[test]
    fn bowtie_self_intersects() {
        let bowtie = vec![p(0.0, 0.0), p(1.0, 1.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert!(loop_self_intersects(&bowtie));
    }

    #[test]
    fn triangle_never_self_intersects() {
        let triangle = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert!(!loop_self_intersects(&triangle));
    }

    #[test]
    fn turn_angle_left_and_right() {
        let left = signed_turn_angle(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 1.0));
        let right = signed_turn_angle(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, -1.0));
        assert_abs_diff_eq!(left, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(right, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn turn_angle_straight() {
        let a = signed_turn_angle(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0));
        assert_abs_diff_eq!(a, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = rotate_xz(&Vector3::new(1.0, 0.5, 0.0), 90.0);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(v.z, 1.0, epsilon = 1e-12);
    }
}
