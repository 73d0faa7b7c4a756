use tracing::debug;

use crate::config::TerrainConfig;
use crate::error::{Result, TessellationError};
use crate::math::{Point2, Point3};
use crate::terrain::HeightField;

use super::{grid_vertex_count, MeshBuffers, MeshDetail};

/// Samples a height field on a square grid centred on the origin.
pub struct TessellateTerrain<'a> {
    height_field: &'a HeightField,
    params: &'a TerrainConfig,
    detail: MeshDetail,
}

impl<'a> TessellateTerrain<'a> {
    /// Creates a new `TessellateTerrain` operation.
    #[must_use]
    pub fn new(
        height_field: &'a HeightField,
        params: &'a TerrainConfig,
        detail: MeshDetail,
    ) -> Self {
        Self {
            height_field,
            params,
            detail,
        }
    }

    /// Executes the tessellation, returning `(resolution + 1)²` vertices and
    /// two upward-facing triangles per cell.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidParameters`] for a zero resolution
    /// or non-positive size and [`TessellationError::Failed`] if the grid
    /// exceeds the `u32` index range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<MeshBuffers> {
        let resolution = match self.detail {
            MeshDetail::Visual => self.params.resolution,
            MeshDetail::Collision => self.params.collision_resolution,
        };
        let size = self.params.size;
        if resolution == 0 || !(size.is_finite() && size > 0.0) {
            return Err(TessellationError::InvalidParameters(format!(
                "terrain grid needs a positive size and resolution, got {size} and {resolution}"
            ))
            .into());
        }

        let Some(vertex_count) = grid_vertex_count(resolution) else {
            return Err(TessellationError::Failed(format!(
                "a grid of resolution {resolution} exceeds the u32 index range"
            ))
            .into());
        };
        let cols = resolution + 1;

        let visual = self.detail == MeshDetail::Visual;
        let mut mesh = MeshBuffers::default();
        mesh.positions.reserve(vertex_count);
        let triangles = (resolution * resolution).saturating_mul(2);
        mesh.indices.reserve(triangles);
        if visual {
            mesh.uvs.reserve(vertex_count);
        }

        let res = resolution as f64;
        let step = size / res;
        let origin = -size * 0.5;
        let tiling = self.params.texture_tiling;

        for j in 0..cols {
            let z = origin + step * j as f64;
            for i in 0..cols {
                let x = origin + step * i as f64;
                let y = self.height_field.height_at(x, z);
                mesh.positions.push(Point3::new(x, y, z));
                if visual {
                    let u = i as f64 / res * tiling;
                    let v = j as f64 / res * tiling;
                    mesh.uvs.push(Point2::new(u, v));
                }
            }
        }

        for j in 0..resolution {
            for i in 0..resolution {
                let a = (j * cols + i) as u32;
                let b = a + 1;
                let c = a + cols as u32;
                let d = c + 1;
                mesh.indices.push([a, c, b]);
                mesh.indices.push([b, c, d]);
            }
        }

        if visual {
            mesh.recalculate_normals();
        }

        debug!(
            detail = ?self.detail,
            resolution,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "terrain mesh tessellated"
        );
        Ok(mesh)
    }
}
