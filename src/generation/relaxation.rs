//! In-place constraint relaxation passes over a point loop.
//!
//! Each pass visits points in index order and mutates the buffer as it goes,
//! so the result depends on visitation order but is fully deterministic.

use rand::Rng;

use crate::geometry::PointLoop;
use crate::math::{horizontal, rotate_xz, signed_turn_angle, Point3, Vector3, TOLERANCE};

/// Slack allowed above the maximum turn angle before a vertex is corrected,
/// in degrees.
pub const ANGLE_TOLERANCE: f64 = 1e-6;

/// Pushes apart every unordered pair of points closer than `min_spacing` in
/// the ground plane, half the deficit to each point, for `iterations` passes.
///
/// Coincident points are separated along `+x`. Elevation is untouched.
/// Returns the number of pair adjustments made.
pub fn relax_spacing(points: &mut [Point3], min_spacing: f64, iterations: usize) -> usize {
    let min_spacing_sq = min_spacing * min_spacing;
    let n = points.len();
    let mut adjustments = 0;

    for _ in 0..iterations {
        for i in 0..n {
            for j in (i + 1)..n {
                let offset = horizontal(&(points[j] - points[i]));
                let dist_sq = offset.norm_squared();
                if dist_sq >= min_spacing_sq {
                    continue;
                }

                let (direction, dist) = if dist_sq < TOLERANCE * TOLERANCE {
                    (Vector3::x(), 0.0)
                } else {
                    let dist = dist_sq.sqrt();
                    (offset / dist, dist)
                };
                let push = direction * ((min_spacing - dist) * 0.5);
                points[i] -= push;
                points[j] += push;
                adjustments += 1;
            }
        }
    }

    adjustments
}

/// Inserts a displaced midpoint after every point, doubling the loop.
///
/// Each midpoint moves in a random horizontal direction by
/// `max_displacement · r^displacement_scale` with `r` uniform in `[0, 1]`.
pub fn displace_midpoints<R: Rng + ?Sized>(
    points: &PointLoop,
    max_displacement: f64,
    displacement_scale: f64,
    rng: &mut R,
) -> PointLoop {
    let mut extended = Vec::with_capacity(points.len() * 2);

    for (current, next) in points.pairs() {
        let midpoint = Point3::from((current.coords + next.coords) * 0.5);

        let amount = rng.gen::<f64>().powf(displacement_scale) * max_displacement;
        let direction = random_horizontal_direction(rng);

        extended.push(*current);
        extended.push(midpoint + direction * amount);
    }

    PointLoop::new(extended)
}

/// Caps the turn angle at every vertex to `max_turn_angle` degrees by rotating
/// the outgoing neighbour around the vertex, then runs one spacing pass; repeats
/// for `iterations` passes.
///
/// The rotated neighbour keeps its distance to the vertex in the ground plane
/// and its own elevation. Returns the number of vertices corrected.
pub fn relax_angles(
    points: &mut PointLoop,
    max_turn_angle: f64,
    min_spacing: f64,
    iterations: usize,
) -> usize {
    let n = points.len();
    if n < 3 {
        return 0;
    }
    let mut corrections = 0;

    for _ in 0..iterations {
        for i in 0..n {
            let prev = points[points.prev_index(i)];
            let current = points[i];
            let next_idx = points.next_index(i);
            let next = points[next_idx];

            if let Some(moved) = cap_turn(&prev, &current, &next, max_turn_angle) {
                points[next_idx] = moved;
                corrections += 1;
            }
        }

        relax_spacing(points.as_mut_slice(), min_spacing, 1);
    }

    corrections
}

/// Returns the corrected position of `next` if the turn at `current` exceeds
/// `max_turn_angle` degrees, or `None` if it is within the limit.
///
/// The outgoing direction is rotated about the vertical axis through
/// `current` so the turn lands exactly on the limit with its original sign.
#[must_use]
pub fn cap_turn(
    prev: &Point3,
    current: &Point3,
    next: &Point3,
    max_turn_angle: f64,
) -> Option<Point3> {
    let angle = signed_turn_angle(prev, current, next);
    if angle.abs() <= max_turn_angle + ANGLE_TOLERANCE {
        return None;
    }

    let correction = max_turn_angle.copysign(angle) - angle;
    let outgoing = rotate_xz(&horizontal(&(next - current)), correction);
    Some(Point3::new(
        current.x + outgoing.x,
        next.y,
        current.z + outgoing.z,
    ))
}

/// Unit vector in the ground plane; falls back to `+x` when the sampled vector
/// is too short to normalize.
fn random_horizontal_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector3 {
    let v = Vector3::new(rng.gen_range(-1.0..=1.0), 0.0, rng.gen_range(-1.0..=1.0));
    let norm = v.norm();
    if norm < TOLERANCE {
        Vector3::x()
    } else {
        v / norm
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    fn horizontal_distance(a: &Point3, b: &Point3) -> f64 {
        horizontal(&(b - a)).norm()
    }

    fn hexagon(radius: f64) -> PointLoop {
        PointLoop::new(
            (0..6)
                .map(|k| {
                    let a = f64::from(k) * 60.0_f64.to_radians();
                    p(radius * a.cos(), radius * a.sin())
                })
                .collect(),
        )
    }

    // ── Spacing ────────────────────────────────────────────────

    #[test]
    fn close_pair_is_pushed_to_exact_spacing() {
        let mut pts = vec![p(0.0, 0.0), p(1.0, 0.0)];
        let adjusted = relax_spacing(&mut pts, 3.0, 1);
        assert_eq!(adjusted, 1);
        assert_abs_diff_eq!(pts[0].x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[1].x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn well_spaced_points_are_untouched() {
        let mut pts = vec![p(0.0, 0.0), p(5.0, 0.0), p(0.0, 5.0)];
        let before = pts.clone();
        assert_eq!(relax_spacing(&mut pts, 2.0, 10), 0);
        assert_eq!(pts, before);
    }

    #[test]
    fn coincident_points_are_separated() {
        let mut pts = vec![p(1.0, 1.0), p(1.0, 1.0)];
        relax_spacing(&mut pts, 2.0, 1);
        let distance = horizontal_distance(&pts[0], &pts[1]);
        assert_abs_diff_eq!(distance, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn spacing_ignores_elevation() {
        let mut pts = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 10.0, 1.0)];
        relax_spacing(&mut pts, 2.0, 1);
        assert_abs_diff_eq!(pts[1].y, 10.0);
        let distance = horizontal_distance(&pts[0], &pts[1]);
        assert_abs_diff_eq!(distance, 2.0, epsilon = 1e-12);
    }

    // ── Midpoints ──────────────────────────────────────────────

    #[test]
    fn zero_displacement_inserts_exact_midpoints() {
        let square = PointLoop::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]);
        let mut rng = StdRng::seed_from_u64(7);
        let out = displace_midpoints(&square, 0.0, 1.0, &mut rng);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], p(0.0, 0.0));
        assert_eq!(out[1], p(1.0, 0.0));
        assert_eq!(out[7], p(0.0, 1.0));
    }

    #[test]
    fn displacement_is_bounded() {
        let square = PointLoop::new(vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)]);
        let mut rng = StdRng::seed_from_u64(11);
        let out = displace_midpoints(&square, 3.0, 2.0, &mut rng);
        for (k, (a, b)) in square.pairs().enumerate() {
            let mid = Point3::from((a.coords + b.coords) * 0.5);
            assert!(horizontal_distance(&mid, &out[2 * k + 1]) <= 3.0 + 1e-12);
        }
    }

    // ── Angles ─────────────────────────────────────────────────

    #[test]
    fn regular_hexagon_needs_no_angle_correction() {
        let mut hex = hexagon(5.0);
        let before = hex.clone();
        assert_eq!(relax_angles(&mut hex, 60.0, 2.0, 5), 0);
        assert_eq!(hex, before);
    }

    #[test]
    fn sharp_turn_is_capped() {
        // A 90° left turn at (10, 0) with a 45° limit.
        let prev = p(0.0, 0.0);
        let current = p(10.0, 0.0);
        let next = Point3::new(10.0, 3.0, 10.0);
        let moved = cap_turn(&prev, &current, &next, 45.0).unwrap();
        let turn = signed_turn_angle(&prev, &current, &moved);
        assert_abs_diff_eq!(turn, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(horizontal_distance(&current, &moved), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(moved.y, 3.0);
    }

    #[test]
    fn correction_preserves_turn_sign() {
        let prev = p(0.0, 0.0);
        let current = p(10.0, 0.0);
        let next = p(10.0, -10.0);
        let moved = cap_turn(&prev, &current, &next, 45.0).unwrap();
        let turn = signed_turn_angle(&prev, &current, &moved);
        assert_abs_diff_eq!(turn, -45.0, epsilon = 1e-9);
    }

    #[test]
    fn gentle_turn_is_left_alone() {
        let (prev, current, next) = (p(0.0, 0.0), p(10.0, 0.0), p(20.0, 5.0));
        assert!(cap_turn(&prev, &current, &next, 45.0).is_none());
    }

    #[test]
    fn relax_angles_moves_the_outgoing_neighbour() {
        let mut pts = PointLoop::new(vec![
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 10.0),
            p(-20.0, 5.0),
        ]);
        let corrections = relax_angles(&mut pts, 45.0, 0.1, 1);
        assert!(corrections >= 1);
        assert!(pts[2] != p(10.0, 10.0));
        assert_abs_diff_eq!(horizontal_distance(&pts[1], &pts[2]), 10.0, epsilon = 1e-9);
    }
}
