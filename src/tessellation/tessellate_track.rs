use tracing::debug;

use crate::config::TrackConfig;
use crate::error::{Result, TessellationError};
use crate::geometry::{OrientedPoint, Spline};
use crate::math::{Point2, Point3, Vector2, Vector3};
use crate::profile::CrossSectionProfile;
use crate::terrain::HeightField;

use super::{ensure_indexable, MeshBuffers, MeshDetail};

/// The extruded track surface plus the frame at the start line.
#[derive(Debug, Clone)]
pub struct TrackMesh {
    pub buffers: MeshBuffers,
    /// Ring frame at segment 0, `t = 0`, lifted onto the terrain.
    pub start: OrientedPoint,
}

/// Extrudes a cross-section profile along a closed spline.
///
/// Each segment gets its own run of rings, so the first ring of a segment
/// duplicates the last ring of the previous one. Rings are lifted so no
/// profile vertex sits below the terrain. Positive profile `x` is placed on
/// the traveller's right.
pub struct TessellateTrack<'a> {
    spline: &'a Spline,
    profile: &'a CrossSectionProfile,
    height_field: &'a HeightField,
    params: &'a TrackConfig,
    detail: MeshDetail,
}

impl<'a> TessellateTrack<'a> {
    /// Creates a new `TessellateTrack` operation.
    #[must_use]
    pub fn new(
        spline: &'a Spline,
        profile: &'a CrossSectionProfile,
        height_field: &'a HeightField,
        params: &'a TrackConfig,
        detail: MeshDetail,
    ) -> Self {
        Self {
            spline,
            profile,
            height_field,
            params,
            detail,
        }
    }

    /// Executes the tessellation.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidParameters`] if the loop bounds are
    /// unusable and [`TessellationError::Failed`] if the mesh would need more
    /// vertices than `u32` indices can address.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn execute(&self) -> Result<TrackMesh> {
        let min_loops = self.min_loops();
        if min_loops < 2 || self.params.max_loops_per_segment < min_loops {
            return Err(TessellationError::InvalidParameters(format!(
                "loops per segment must satisfy 2 <= {min_loops} <= {}",
                self.params.max_loops_per_segment
            ))
            .into());
        }

        let loop_counts: Vec<usize> = (0..self.spline.segment_count())
            .map(|i| self.loop_count(i, min_loops))
            .collect();
        let profile_verts = self.profile.vertex_count();
        let overflow = || TessellationError::Failed("track vertex count overflows".into());
        let total_vertices = loop_counts
            .iter()
            .try_fold(0_usize, |rings, &loops| rings.checked_add(loops))
            .and_then(|rings| rings.checked_mul(profile_verts))
            .ok_or_else(overflow)?;
        ensure_indexable(total_vertices)?;

        let visual = self.detail == MeshDetail::Visual;
        let total_triangles: usize = loop_counts
            .iter()
            .map(|l| (l - 1) * self.profile.edge_count() * 2)
            .sum();
        let mut mesh = MeshBuffers::default();
        mesh.positions.reserve(total_vertices);
        mesh.indices.reserve(total_triangles);
        if visual {
            mesh.normals.reserve(total_vertices);
            mesh.uvs.reserve(total_vertices);
        }

        let span = self.profile.u_span();
        let u_span = if span > 0.0 { span } else { 1.0 };
        let mut distance = 0.0;
        let mut last_centre: Option<Point3> = None;
        let mut start = None;

        for (segment, &loops) in loop_counts.iter().enumerate() {
            let segment_base = mesh.positions.len();

            for k in 0..loops {
                let t = k as f64 / (loops - 1) as f64;
                let frame = self.spline.sample_orientation(segment, t);
                let ring: Vec<Point3> = self
                    .profile
                    .vertices()
                    .iter()
                    .map(|v| frame.local_to_world(&profile_to_local(&v.position)))
                    .collect();
                let offset = ring
                    .iter()
                    .map(|p| self.height_field.height_at(p.x, p.z))
                    .fold(f64::NEG_INFINITY, f64::max);

                let lifted = frame.lifted(offset);
                if let Some(prev) = last_centre {
                    distance += (lifted.position - prev).norm();
                }
                last_centre = Some(lifted.position);
                if start.is_none() {
                    start = Some(lifted);
                }

                let v = distance / u_span;
                for (p, vertex) in ring.iter().zip(self.profile.vertices()) {
                    mesh.positions.push(Point3::new(p.x, p.y + offset, p.z));
                    if visual {
                        let n = normal_to_local(&vertex.normal);
                        mesh.normals.push(frame.rotate_vector(&n));
                        mesh.uvs.push(Point2::new(vertex.u, v));
                    }
                }
            }

            // Mirroring profile x into the frame flips the winding, so each
            // quad is emitted as (a0, b0, a1) and (b0, b1, a1).
            for k in 0..loops - 1 {
                let ring0 = (segment_base + k * profile_verts) as u32;
                let ring1 = ring0 + profile_verts as u32;
                for &[a, b] in self.profile.edges() {
                    let (a, b) = (a as u32, b as u32);
                    mesh.indices.push([ring0 + a, ring0 + b, ring1 + a]);
                    mesh.indices.push([ring0 + b, ring1 + b, ring1 + a]);
                }
            }
        }

        let Some(start) = start else {
            return Err(TessellationError::Failed("spline is empty".into()).into());
        };
        debug!(
            detail = ?self.detail,
            segments = loop_counts.len(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "track mesh tessellated"
        );
        Ok(TrackMesh {
            buffers: mesh,
            start,
        })
    }

    fn min_loops(&self) -> usize {
        match self.detail {
            MeshDetail::Visual => self.params.min_loops_per_segment,
            MeshDetail::Collision => self.params.collision_min_loops_per_segment,
        }
    }

    /// Rings for `segment`: more where it turns or climbs.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn loop_count(&self, segment: usize, min_loops: usize) -> usize {
        let max_loops = self.params.max_loops_per_segment;
        let heading_start = self.spline.sample_orientation(segment, 0.0).forward();
        let heading_end = self.spline.sample_orientation(segment, 1.0).forward();
        let turn_degrees = heading_start.angle(&heading_end).to_degrees();
        let rise = self.spline.evaluate(segment, 1.0).y - self.spline.evaluate(segment, 0.0).y;

        let turn_loops = turn_degrees * self.params.loops_per_degree;
        let climb_loops = rise.abs() * self.params.elevation_weight;
        let wanted = (turn_loops + climb_loops).ceil();
        if !wanted.is_finite() || wanted >= max_loops as f64 {
            return max_loops;
        }
        (wanted.max(0.0) as usize).clamp(min_loops, max_loops)
    }
}

/// Profile `+x` is the traveller's right while frame `+x` is their left.
fn profile_to_local(position: &Point2) -> Point3 {
    Point3::new(-position.x, position.y, 0.0)
}

fn normal_to_local(normal: &Vector2) -> Vector3 {
    Vector3::new(-normal.x, normal.y, 0.0)
}
