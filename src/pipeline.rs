//! End-to-end generation: points, spline, track mesh and terrain mesh.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{GeneratorConfig, SplineConfig, TerrainConfig, TrackConfig};
use crate::error::Result;
use crate::generation::{FitSpline, PointGenerator};
use crate::geometry::{OrientedPoint, PointLoop, Spline};
use crate::math::Point3;
use crate::profile::CrossSectionProfile;
use crate::terrain::HeightField;
use crate::tessellation::{MeshBuffers, MeshDetail, TessellateTerrain, TessellateTrack, TrackMesh};

/// Everything produced by one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedTrack {
    /// Control points the spline passes through.
    pub points: PointLoop,
    pub spline: Spline,
    /// Polyline sampled along the spline at the configured preview step.
    pub preview: Vec<Point3>,
    pub track: MeshBuffers,
    pub track_collision: MeshBuffers,
    pub terrain: MeshBuffers,
    pub terrain_collision: MeshBuffers,
    /// Frame at the start of the track, on the road surface.
    pub start: OrientedPoint,
}

impl GeneratedTrack {
    /// Where to place a vehicle: the start frame raised by `y_offset`.
    #[must_use]
    pub fn spawn_transform(&self, y_offset: f64) -> OrientedPoint {
        self.start.lifted(y_offset)
    }
}

/// Owns generator state between runs: the point RNG, the terrain seed and the
/// active cross-section profile.
#[derive(Debug)]
pub struct TrackPipeline {
    points: PointGenerator,
    spline: SplineConfig,
    track: TrackConfig,
    terrain: TerrainConfig,
    height_field: HeightField,
    profile: CrossSectionProfile,
    runs: u64,
}

impl TrackPipeline {
    /// Creates a pipeline from a configuration and a starting profile.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if the configuration
    /// fails validation.
    pub fn new(config: GeneratorConfig, profile: CrossSectionProfile) -> Result<Self> {
        config.validate()?;
        let height_field = HeightField::from_config(&config.terrain)?;
        Ok(Self {
            points: PointGenerator::new(config.points, config.seed)?,
            spline: config.spline,
            track: config.track,
            terrain: config.terrain,
            height_field,
            profile,
            runs: 0,
        })
    }

    /// Runs the full pipeline. Every run after the first moves the terrain to
    /// a new seed.
    ///
    /// # Errors
    ///
    /// Propagates point-generation exhaustion, spline degeneracy and
    /// tessellation failures.
    pub fn generate(&mut self) -> Result<GeneratedTrack> {
        let started = Instant::now();

        if self.runs > 0 {
            self.height_field.advance_seed(self.terrain.reseed_step);
            debug!(seed = self.height_field.seed(), "terrain reseeded");
        }
        self.runs += 1;

        let points = self.points.generate()?;
        let spline = FitSpline::new(&points, self.spline.alpha).execute()?;
        let preview = spline.polyline(self.spline.preview_step)?;

        let track = self.tessellate_track(&spline, MeshDetail::Visual)?;
        let track_collision = self.tessellate_track(&spline, MeshDetail::Collision)?;
        let terrain = self.tessellate_terrain(MeshDetail::Visual)?;
        let terrain_collision = self.tessellate_terrain(MeshDetail::Collision)?;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!(
            points = points.len(),
            segments = spline.segment_count(),
            track_vertices = track.buffers.vertex_count(),
            track_triangles = track.buffers.triangle_count(),
            terrain_vertices = terrain.vertex_count(),
            terrain_triangles = terrain.triangle_count(),
            elapsed_ms,
            "track generated"
        );

        Ok(GeneratedTrack {
            points,
            spline,
            preview,
            start: track.start,
            track: track.buffers,
            track_collision: track_collision.buffers,
            terrain,
            terrain_collision,
        })
    }

    fn tessellate_track(&self, spline: &Spline, detail: MeshDetail) -> Result<TrackMesh> {
        let profile = &self.profile;
        let op = TessellateTrack::new(spline, profile, &self.height_field, &self.track, detail);
        op.execute()
    }

    fn tessellate_terrain(&self, detail: MeshDetail) -> Result<MeshBuffers> {
        let op = TessellateTerrain::new(&self.height_field, &self.terrain, detail);
        op.execute()
    }

    /// The active cross-section profile.
    #[must_use]
    pub fn profile(&self) -> &CrossSectionProfile {
        &self.profile
    }

    /// Swaps the cross-section used by subsequent runs.
    pub fn set_profile(&mut self, profile: CrossSectionProfile) {
        self.profile = profile;
    }

    /// The terrain height field in its current state.
    #[must_use]
    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    /// Fixes the number of initially sampled points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if the count is
    /// unusable; the previous setting is kept.
    pub fn set_initial_points(&mut self, count: usize) -> Result<()> {
        self.points.set_initial_points(count)
    }

    /// Changes the maximum midpoint displacement.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if `displacement`
    /// is negative or not finite.
    pub fn set_max_displacement(&mut self, displacement: f64) -> Result<()> {
        self.points.set_max_displacement(displacement)
    }

    /// Changes the terrain's peak-to-trough height.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if `height_scale`
    /// is negative or not finite.
    pub fn set_height_scale(&mut self, height_scale: f64) -> Result<()> {
        self.height_field.set_height_scale(height_scale)?;
        self.terrain.height_scale = height_scale;
        Ok(())
    }

    /// Changes the terrain noise frequency.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if `noise_detail`
    /// is not positive.
    pub fn set_noise_detail(&mut self, noise_detail: f64) -> Result<()> {
        self.height_field.set_noise_detail(noise_detail)?;
        self.terrain.noise_detail = noise_detail;
        Ok(())
    }
}
