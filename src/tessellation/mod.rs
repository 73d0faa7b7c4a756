mod tessellate_terrain;
mod tessellate_track;

pub use tessellate_terrain::TessellateTerrain;
pub use tessellate_track::{TessellateTrack, TrackMesh};

use crate::error::{Result, TessellationError};
use crate::math::{up, Point2, Point3, Vector3, TOLERANCE};

/// Which consumer a mesh is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshDetail {
    /// Rendered mesh: full density, normals and UVs.
    Visual,
    /// Physics mesh: reduced density, positions and indices only.
    Collision,
}

/// An indexed triangle mesh with optional per-vertex attributes.
///
/// `normals` and `uvs` are either empty or parallel to `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates.
    pub uvs: Vec<Point2>,
    /// Triangle indices, anticlockwise when viewed from the front.
    pub indices: Vec<[u32; 3]>,
}

impl MeshBuffers {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns whether every index refers to an existing vertex.
    #[must_use]
    pub fn indices_valid(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().flatten().all(|&i| (i as usize) < n)
    }

    /// Unnormalized normal of triangle `index`; its length is twice the
    /// triangle's area.
    ///
    /// # Panics
    ///
    /// Panics if `index` or one of the triangle's vertex indices is out of
    /// range.
    #[must_use]
    pub fn triangle_normal(&self, index: usize) -> Vector3 {
        let [a, b, c] = self.indices[index];
        let pa = self.positions[a as usize];
        let pb = self.positions[b as usize];
        let pc = self.positions[c as usize];
        (pb - pa).cross(&(pc - pa))
    }

    /// Replaces `normals` with smooth, area-weighted vertex normals computed
    /// from the triangle list. Vertices without any area fall back to `+y`.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for t in 0..self.indices.len() {
            let n = self.triangle_normal(t);
            for &i in &self.indices[t] {
                normals[i as usize] += n;
            }
        }
        for n in &mut normals {
            let len = n.norm();
            *n = if len < TOLERANCE { up() } else { *n / len };
        }
        self.normals = normals;
    }
}

/// Vertex count of a square grid `resolution` cells wide, or `None` if those
/// vertices cannot all be addressed by `u32` indices.
pub(crate) fn grid_vertex_count(resolution: usize) -> Option<usize> {
    let cols = resolution.checked_add(1)?;
    cols.checked_mul(cols).filter(|&n| u32::try_from(n).is_ok())
}

/// Fails if `vertex_count` vertices cannot all be addressed by `u32` indices.
fn ensure_indexable(vertex_count: usize) -> Result<()> {
    if u32::try_from(vertex_count).is_err() {
        return Err(TessellationError::Failed(format!(
            "{vertex_count} vertices exceed the u32 index range"
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn quad() -> MeshBuffers {
        MeshBuffers {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
            ],
            indices: vec![[0, 2, 1], [1, 2, 3]],
            ..MeshBuffers::default()
        }
    }

    #[test]
    fn counts_and_validity() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.indices_valid());

        let mut broken = quad();
        broken.indices.push([0, 1, 4]);
        assert!(!broken.indices_valid());
    }

    #[test]
    fn smooth_normals_of_flat_quad_point_up() {
        let mut mesh = quad();
        mesh.recalculate_normals();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert_relative_eq!(*n, Vector3::y(), epsilon = 1e-12);
        }
    }

    #[test]
    fn triangle_normal_length_is_twice_the_area() {
        assert_relative_eq!(quad().triangle_normal(0), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn isolated_vertex_gets_default_normal() {
        let mut mesh = quad();
        mesh.positions.push(Point3::new(5.0, 5.0, 5.0));
        mesh.recalculate_normals();
        assert_eq!(mesh.normals[4], Vector3::y());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn index_range_is_enforced() {
        assert!(ensure_indexable(u32::MAX as usize).is_ok());
        assert!(ensure_indexable(u32::MAX as usize + 1).is_err());
    }

    #[test]
    fn grid_vertex_count_stays_indexable() {
        assert_eq!(grid_vertex_count(0), Some(1));
        assert_eq!(grid_vertex_count(128), Some(129 * 129));
        assert_eq!(grid_vertex_count(65_534), Some(65_535 * 65_535));
        assert_eq!(grid_vertex_count(65_535), None);
        assert_eq!(grid_vertex_count(usize::MAX), None);
    }
}
