//! Cross-section profiles extruded along the track spline.
//!
//! A profile lives in its own 2D space: `x` runs across the track from left
//! to right when looking along the direction of travel, so positive `x` lands
//! on the traveller's right, and `y` points up. Each edge `(a, b)` is wound
//! so that its left normal, `(−dy, dx)` of `b − a`, faces out of the solid.

mod presets;

pub use presets::{basic_road, curb_road, preset, wall_road, PRESET_NAMES};

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

/// One vertex of a cross-section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileVertex {
    /// Position in profile space.
    pub position: Point2,
    /// Unit shading normal in profile space.
    pub normal: Vector2,
    /// Horizontal texture coordinate.
    pub u: f64,
}

/// A validated 2D cross-section: vertices plus the edges joining them.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionProfile {
    vertices: Vec<ProfileVertex>,
    edges: Vec<[usize; 2]>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    vertices: Vec<VertexFile>,
    edges: EdgeList,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VertexFile {
    position: [f64; 2],
    normal: [f64; 2],
    #[serde(default)]
    u: f64,
}

/// Edges either as index pairs or as a flat list read two at a time.
#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeList {
    Pairs(Vec<[usize; 2]>),
    Flat(Vec<usize>),
}

impl CrossSectionProfile {
    /// Builds a profile, normalizing vertex normals.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidProfile`] if there are no vertices or
    /// edges, an edge references a missing vertex or joins a vertex to itself,
    /// a value is not finite, or a normal has zero length.
    pub fn new(vertices: Vec<ProfileVertex>, edges: Vec<[usize; 2]>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(invalid("profile has no vertices"));
        }
        if edges.is_empty() {
            return Err(invalid("profile has no edges"));
        }

        let mut vertices = vertices;
        for (i, v) in vertices.iter_mut().enumerate() {
            let finite = v.u.is_finite()
                && v.position.iter().all(|c| c.is_finite())
                && v.normal.iter().all(|c| c.is_finite());
            if !finite {
                return Err(invalid(format!("vertex {i} has a non-finite value")));
            }
            let len = v.normal.norm();
            if len < TOLERANCE {
                return Err(invalid(format!("vertex {i} has a zero-length normal")));
            }
            v.normal /= len;
        }

        let n = vertices.len();
        for (k, &[a, b]) in edges.iter().enumerate() {
            if a >= n || b >= n {
                return Err(invalid(format!(
                    "edge {k} ({a}, {b}) references a vertex outside 0..{n}"
                )));
            }
            if a == b {
                return Err(invalid(format!("edge {k} joins vertex {a} to itself")));
            }
        }

        Ok(Self { vertices, edges })
    }

    /// Parses and validates a profile from JSON of the form
    /// `{"vertices": [{"position": [x, y], "normal": [nx, ny], "u": u}], "edges": [[a, b]]}`.
    ///
    /// `edges` may also be a flat index list, read in pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and
    /// [`ConfigError::InvalidProfile`] if the profile fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ProfileFile =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let edges = match file.edges {
            EdgeList::Pairs(pairs) => pairs,
            EdgeList::Flat(flat) => {
                if flat.len() % 2 != 0 {
                    return Err(invalid(format!(
                        "flat edge list has an odd length of {}",
                        flat.len()
                    )));
                }
                flat.chunks_exact(2).map(|c| [c[0], c[1]]).collect()
            }
        };
        let vertices = file
            .vertices
            .into_iter()
            .map(|v| ProfileVertex {
                position: Point2::new(v.position[0], v.position[1]),
                normal: Vector2::new(v.normal[0], v.normal[1]),
                u: v.u,
            })
            .collect();

        Self::new(vertices, edges)
    }

    /// The vertices in index order.
    #[must_use]
    pub fn vertices(&self) -> &[ProfileVertex] {
        &self.vertices
    }

    /// The edges as vertex index pairs.
    #[must_use]
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Summed length of all edges.
    #[must_use]
    pub fn u_span(&self) -> f64 {
        self.edges
            .iter()
            .map(|&[a, b]| {
                let d = self.vertices[b].position - self.vertices[a].position;
                d.norm()
            })
            .sum()
    }

    /// Outward face normal of edge `index`: the unit left normal of `b − a`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn face_normal(&self, index: usize) -> Vector2 {
        let [a, b] = self.edges[index];
        let d = self.vertices[b].position - self.vertices[a].position;
        let n = Vector2::new(-d.y, d.x);
        let len = n.norm();
        if len < TOLERANCE {
            n
        } else {
            n / len
        }
    }
}

impl Default for CrossSectionProfile {
    fn default() -> Self {
        basic_road()
    }
}

fn invalid(reason: impl Into<String>) -> crate::error::TrackgenError {
    ConfigError::InvalidProfile(reason.into()).into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::TrackgenError;

    const STRIP: &str = r#"{
        "vertices": [
            { "position": [-2.0, 0.0], "normal": [0.0, 3.0], "u": 0.0 },
            { "position": [2.0, 0.0], "normal": [0.0, 1.0], "u": 1.0 }
        ],
        "edges": [[0, 1]]
    }"#;

    fn is_invalid_profile(result: &Result<CrossSectionProfile>) -> bool {
        matches!(
            result,
            Err(TrackgenError::Config(ConfigError::InvalidProfile(_)))
        )
    }

    #[test]
    fn parses_pair_edges_and_normalizes() {
        let profile = CrossSectionProfile::from_json_str(STRIP).unwrap();
        assert_eq!(profile.vertex_count(), 2);
        assert_eq!(profile.edges(), &[[0, 1]]);
        assert_relative_eq!(profile.vertices()[0].normal, Vector2::y());
        assert_relative_eq!(profile.u_span(), 4.0);
    }

    #[test]
    fn parses_flat_edges() {
        let json = STRIP.replace("[[0, 1]]", "[0, 1]");
        let profile = CrossSectionProfile::from_json_str(&json).unwrap();
        assert_eq!(profile.edges(), &[[0, 1]]);
    }

    #[test]
    fn odd_flat_edge_list_is_rejected() {
        let json = STRIP.replace("[[0, 1]]", "[0, 1, 1]");
        let result = CrossSectionProfile::from_json_str(&json);
        assert!(is_invalid_profile(&result));
    }

    #[test]
    fn out_of_range_edge_is_rejected() {
        let json = STRIP.replace("[[0, 1]]", "[[0, 2]]");
        let result = CrossSectionProfile::from_json_str(&json);
        assert!(is_invalid_profile(&result));
    }

    #[test]
    fn empty_profiles_are_rejected() {
        let result = CrossSectionProfile::new(Vec::new(), vec![[0, 1]]);
        assert!(is_invalid_profile(&result));
        let json = STRIP.replace("[[0, 1]]", "[]");
        let result = CrossSectionProfile::from_json_str(&json);
        assert!(is_invalid_profile(&result));
    }

    #[test]
    fn zero_normal_is_rejected() {
        let json = STRIP.replace("[0.0, 3.0]", "[0.0, 0.0]");
        let result = CrossSectionProfile::from_json_str(&json);
        assert!(is_invalid_profile(&result));
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        let json = STRIP.replace("\"u\": 1.0", "\"u\": 1.0, \"v\": 2.0");
        assert!(matches!(
            CrossSectionProfile::from_json_str(&json),
            Err(TrackgenError::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn flat_edge_faces_up() {
        let profile = CrossSectionProfile::from_json_str(STRIP).unwrap();
        assert_relative_eq!(profile.face_normal(0), Vector2::y());
    }
}
