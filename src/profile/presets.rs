//! Built-in road cross-sections.

use crate::math::{Point2, Vector2, TOLERANCE};

use super::{CrossSectionProfile, ProfileVertex};

/// Names accepted by [`preset`].
pub const PRESET_NAMES: [&str; 3] = ["basic_road", "curb_road", "wall_road"];

/// A flat 10-unit road with sloped shoulders, smooth shaded (4 vertices).
#[must_use]
pub fn basic_road() -> CrossSectionProfile {
    smooth_polyline(&[
        Point2::new(-6.0, -0.5),
        Point2::new(-5.0, 0.0),
        Point2::new(5.0, 0.0),
        Point2::new(6.0, -0.5),
    ])
}

/// The basic road with a raised curb on each side.
#[must_use]
pub fn curb_road() -> CrossSectionProfile {
    hard_polyline(&[
        Point2::new(-6.5, -0.5),
        Point2::new(-6.0, 0.25),
        Point2::new(-5.5, 0.25),
        Point2::new(-5.0, 0.0),
        Point2::new(5.0, 0.0),
        Point2::new(5.5, 0.25),
        Point2::new(6.0, 0.25),
        Point2::new(6.5, -0.5),
    ])
}

/// A road enclosed by solid walls.
#[must_use]
pub fn wall_road() -> CrossSectionProfile {
    hard_polyline(&[
        Point2::new(-6.5, -0.5),
        Point2::new(-6.5, 1.5),
        Point2::new(-6.0, 1.5),
        Point2::new(-6.0, 0.0),
        Point2::new(6.0, 0.0),
        Point2::new(6.0, 1.5),
        Point2::new(6.5, 1.5),
        Point2::new(6.5, -0.5),
    ])
}

/// Looks up a built-in profile by name.
#[must_use]
pub fn preset(name: &str) -> Option<CrossSectionProfile> {
    match name {
        "basic_road" => Some(basic_road()),
        "curb_road" => Some(curb_road()),
        "wall_road" => Some(wall_road()),
        _ => None,
    }
}

/// Left normal of `b − a`, normalized.
fn edge_normal(a: &Point2, b: &Point2) -> Vector2 {
    let d = b - a;
    Vector2::new(-d.y, d.x).normalize()
}

/// `u` for each point: cumulative length along the polyline over its total.
fn arc_fractions(points: &[Point2]) -> Vec<f64> {
    let mut acc = vec![0.0];
    for w in points.windows(2) {
        let last = acc[acc.len() - 1];
        acc.push(last + (w[1] - w[0]).norm());
    }
    let total = acc[acc.len() - 1];
    if total > TOLERANCE {
        for u in &mut acc {
            *u /= total;
        }
    }
    acc
}

/// One shared vertex per point; normals averaged across adjacent edges.
fn smooth_polyline(points: &[Point2]) -> CrossSectionProfile {
    let us = arc_fractions(points);
    let last = points.len() - 1;
    let vertices = points
        .iter()
        .zip(us)
        .enumerate()
        .map(|(i, (p, u))| {
            let mut normal = Vector2::zeros();
            if i > 0 {
                normal += edge_normal(&points[i - 1], p);
            }
            if i < last {
                normal += edge_normal(p, &points[i + 1]);
            }
            ProfileVertex {
                position: *p,
                normal: normal.normalize(),
                u,
            }
        })
        .collect();
    let edges = (0..last).map(|i| [i, i + 1]).collect();
    CrossSectionProfile { vertices, edges }
}

/// Two vertices per edge so every face shades flat.
fn hard_polyline(points: &[Point2]) -> CrossSectionProfile {
    let us = arc_fractions(points);
    let mut vertices = Vec::with_capacity((points.len() - 1) * 2);
    let mut edges = Vec::with_capacity(points.len() - 1);
    for (i, w) in points.windows(2).enumerate() {
        let normal = edge_normal(&w[0], &w[1]);
        let base = vertices.len();
        vertices.push(ProfileVertex {
            position: w[0],
            normal,
            u: us[i],
        });
        vertices.push(ProfileVertex {
            position: w[1],
            normal,
            u: us[i + 1],
        });
        edges.push([base, base + 1]);
    }
    CrossSectionProfile { vertices, edges }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn presets_pass_validation() {
        for name in PRESET_NAMES {
            let p = preset(name).unwrap();
            let checked = CrossSectionProfile::new(p.vertices().to_vec(), p.edges().to_vec());
            assert!(checked.is_ok(), "{name}");
        }
        assert!(preset("dirt_road").is_none());
    }

    #[test]
    fn basic_road_has_four_vertices() {
        let p = basic_road();
        assert_eq!(p.vertex_count(), 4);
        assert_eq!(p.edge_count(), 3);
        assert!(p.vertices()[1].normal.y > 0.9);
    }

    #[test]
    fn hard_profiles_duplicate_corners() {
        let p = wall_road();
        assert_eq!(p.vertex_count(), 14);
        assert_eq!(p.edge_count(), 7);
    }

    #[test]
    fn road_surface_faces_up() {
        for name in PRESET_NAMES {
            let p = preset(name).unwrap();
            let up_facing = (0..p.edge_count()).any(|k| p.face_normal(k).y > 0.999);
            assert!(up_facing, "{name}");
        }
    }

    #[test]
    fn wall_faces_point_away_from_the_solid() {
        let p = wall_road();
        // Outer face of the left wall, then its inner face towards the road.
        assert_relative_eq!(p.face_normal(0), -Vector2::x());
        assert_relative_eq!(p.face_normal(2), Vector2::x());
    }

    #[test]
    fn u_runs_from_zero_to_one() {
        let p = curb_road();
        assert_relative_eq!(p.vertices()[0].u, 0.0);
        assert_relative_eq!(p.vertices()[p.vertex_count() - 1].u, 1.0);
    }
}
