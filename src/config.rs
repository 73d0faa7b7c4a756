//! Generator configuration.
//!
//! Every section deserializes from JSON with all fields optional; missing
//! fields take the defaults below. Call [`GeneratorConfig::validate`] (done by
//! [`GeneratorConfig::from_json_str`] and the pipeline constructor) before use.

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::tessellation::grid_vertex_count;

/// Point-loop generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointConfig {
    /// Width and depth of the bounding rectangle, centred on the origin.
    pub bounds: [f64; 2],
    /// Fraction of `bounds` used when sampling the initial random points.
    pub sampling_fraction: f64,
    /// Maximum elevation spread of the initial points.
    pub max_elevation: f64,
    /// Inclusive lower bound of the initial point count.
    pub min_points: usize,
    /// Inclusive upper bound of the initial point count.
    pub max_points: usize,
    /// Relaxation passes per spacing stage.
    pub spacing_iterations: usize,
    /// Angle relaxation passes.
    pub angling_iterations: usize,
    /// Minimum horizontal distance between any two points.
    pub min_point_spacing: f64,
    /// Maximum turn angle at any vertex, in degrees.
    pub max_turn_angle: f64,
    /// Maximum midpoint displacement distance.
    pub max_displacement: f64,
    /// Exponent biasing midpoint displacement towards small values.
    pub displacement_scale: f64,
    /// Degrees a final turn may exceed `max_turn_angle` before the attempt is
    /// rejected.
    pub angle_slack: f64,
    /// Fraction of `min_point_spacing` a final pair may fall short by before
    /// the attempt is rejected.
    pub spacing_slack: f64,
    /// Attempts before giving up with an error.
    pub max_attempts: usize,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            bounds: [400.0, 400.0],
            sampling_fraction: 5.0 / 6.0,
            max_elevation: 6.0,
            min_points: 8,
            max_points: 14,
            spacing_iterations: 10,
            angling_iterations: 10,
            min_point_spacing: 30.0,
            max_turn_angle: 100.0,
            max_displacement: 40.0,
            displacement_scale: 2.0,
            angle_slack: 1.0,
            spacing_slack: 0.05,
            max_attempts: 1000,
        }
    }
}

/// Spline fitting settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplineConfig {
    /// Knot-spacing exponent: `0` uniform, `0.5` centripetal, `1` chordal.
    pub alpha: f64,
    /// Parameter step used for polyline previews.
    pub preview_step: f64,
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            preview_step: 0.05,
        }
    }
}

/// Track extrusion settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackConfig {
    /// Minimum rings per segment for visual meshes.
    pub min_loops_per_segment: usize,
    /// Minimum rings per segment for collision meshes.
    pub collision_min_loops_per_segment: usize,
    /// Upper bound on rings per segment.
    pub max_loops_per_segment: usize,
    /// Rings added per degree of heading change over a segment.
    pub loops_per_degree: f64,
    /// Rings added per unit of elevation change over a segment.
    pub elevation_weight: f64,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            min_loops_per_segment: 4,
            collision_min_loops_per_segment: 2,
            max_loops_per_segment: 32,
            loops_per_degree: 0.25,
            elevation_weight: 1.0,
        }
    }
}

/// Terrain surface settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainConfig {
    /// Edge length of the square terrain footprint, centred on the origin.
    pub size: f64,
    /// Cells per edge of the visual grid.
    pub resolution: usize,
    /// Cells per edge of the collision grid.
    pub collision_resolution: usize,
    /// Noise frequency; higher values give busier terrain.
    pub noise_detail: f64,
    /// Peak-to-trough height of the terrain.
    pub height_scale: f64,
    /// Texture repeats across the whole footprint.
    pub texture_tiling: f64,
    /// Initial noise seed.
    pub seed: i32,
    /// Amount the seed advances between generations.
    pub reseed_step: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 500.0,
            resolution: 128,
            collision_resolution: 32,
            noise_detail: 0.01,
            height_scale: 8.0,
            texture_tiling: 50.0,
            seed: 0,
            reseed_step: 1,
        }
    }
}

/// Complete generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub points: PointConfig,
    pub spline: SplineConfig,
    pub track: TrackConfig,
    pub terrain: TerrainConfig,
    /// Seed for the point generator RNG; drawn from entropy when absent.
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or unknown fields, and
    /// [`ConfigError::InvalidValue`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section for values the generator cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.points.validate()?;
        self.spline.validate()?;
        self.track.validate()?;
        self.terrain.validate()?;
        Ok(())
    }
}

impl PointConfig {
    /// Checks the point-generation settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let [w, d] = self.bounds;
        if !(w.is_finite() && d.is_finite() && w > 0.0 && d > 0.0) {
            return invalid("points.bounds", "both extents must be positive");
        }
        if !(self.sampling_fraction > 0.0 && self.sampling_fraction <= 1.0) {
            return invalid("points.sampling_fraction", "must be in (0, 1]");
        }
        if !(self.max_elevation.is_finite() && self.max_elevation >= 0.0) {
            return invalid("points.max_elevation", "must be non-negative");
        }
        if self.min_points < 3 {
            return invalid("points.min_points", "at least 3 points are required");
        }
        if self.min_points > self.max_points {
            return invalid(
                "points.max_points",
                format!("must be at least min_points ({})", self.min_points),
            );
        }
        if !(self.min_point_spacing.is_finite() && self.min_point_spacing > 0.0) {
            return invalid("points.min_point_spacing", "must be positive");
        }
        // The smallest loop is a 3-point hull doubled by midpoint insertion.
        let perimeter = 2.0 * (w + d);
        if self.min_point_spacing * 6.0 > perimeter {
            return invalid(
                "points.min_point_spacing",
                format!(
                    "6 points spaced {} apart cannot fit inside bounds of perimeter {perimeter}",
                    self.min_point_spacing
                ),
            );
        }
        if !(self.max_turn_angle > 0.0 && self.max_turn_angle < 180.0) {
            return invalid("points.max_turn_angle", "must be in (0, 180) degrees");
        }
        if !(self.max_displacement.is_finite() && self.max_displacement >= 0.0) {
            return invalid("points.max_displacement", "must be non-negative");
        }
        if !(self.displacement_scale.is_finite() && self.displacement_scale > 0.0) {
            return invalid("points.displacement_scale", "must be positive");
        }
        if !(self.angle_slack.is_finite() && self.angle_slack >= 0.0) {
            return invalid("points.angle_slack", "must be non-negative");
        }
        if !(0.0..1.0).contains(&self.spacing_slack) {
            return invalid("points.spacing_slack", "must be in [0, 1)");
        }
        if self.max_attempts == 0 {
            return invalid("points.max_attempts", "must be at least 1");
        }
        Ok(())
    }
}

impl SplineConfig {
    /// Checks the spline settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return invalid("spline.alpha", "must be in [0, 1]");
        }
        if !(self.preview_step > 0.0 && self.preview_step <= 1.0) {
            return invalid("spline.preview_step", "must be in (0, 1]");
        }
        Ok(())
    }
}

impl TrackConfig {
    /// Checks the extrusion settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.min_loops_per_segment < 2 {
            return invalid("track.min_loops_per_segment", "must be at least 2");
        }
        if self.collision_min_loops_per_segment < 2 {
            return invalid(
                "track.collision_min_loops_per_segment",
                "must be at least 2",
            );
        }
        let floor = self
            .min_loops_per_segment
            .max(self.collision_min_loops_per_segment);
        if self.max_loops_per_segment < floor {
            return invalid(
                "track.max_loops_per_segment",
                format!("must be at least {floor}"),
            );
        }
        if u32::try_from(self.max_loops_per_segment).is_err() {
            return invalid(
                "track.max_loops_per_segment",
                "must fit the u32 index range",
            );
        }
        if !(self.loops_per_degree.is_finite() && self.loops_per_degree >= 0.0) {
            return invalid("track.loops_per_degree", "must be non-negative");
        }
        if !(self.elevation_weight.is_finite() && self.elevation_weight >= 0.0) {
            return invalid("track.elevation_weight", "must be non-negative");
        }
        Ok(())
    }
}

impl TerrainConfig {
    /// Checks the terrain settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return invalid("terrain.size", "must be positive");
        }
        check_resolution("terrain.resolution", self.resolution)?;
        check_resolution("terrain.collision_resolution", self.collision_resolution)?;
        if !(self.noise_detail.is_finite() && self.noise_detail > 0.0) {
            return invalid("terrain.noise_detail", "must be positive");
        }
        if !(self.height_scale.is_finite() && self.height_scale >= 0.0) {
            return invalid("terrain.height_scale", "must be non-negative");
        }
        if !(self.texture_tiling.is_finite() && self.texture_tiling > 0.0) {
            return invalid("terrain.texture_tiling", "must be positive");
        }
        Ok(())
    }
}

/// A grid of `resolution` cells per side needs `(resolution + 1)²` vertices,
/// all addressable by `u32` indices.
fn check_resolution(field: &'static str, resolution: usize) -> Result<()> {
    if resolution == 0 {
        return invalid(field, "must be at least 1");
    }
    if grid_vertex_count(resolution).is_none() {
        return invalid(field, "grid vertices exceed the u32 index range");
    }
    Ok(())
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Result<()> {
    Err(ConfigError::invalid(field, reason).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::TrackgenError;

    fn invalid_field(result: Result<()>) -> &'static str {
        match result {
            Err(TrackgenError::Config(ConfigError::InvalidValue { field, .. })) => field,
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        GeneratorConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = GeneratorConfig::from_json_str(
            r#"{ "points": { "min_points": 5, "max_points": 7 }, "seed": 42 }"#,
        )
        .unwrap();
        assert_eq!(config.points.min_points, 5);
        assert_eq!(config.points.max_points, 7);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.terrain, TerrainConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = GeneratorConfig::from_json_str(r#"{ "points": { "min_pints": 5 } }"#);
        assert!(matches!(
            err,
            Err(TrackgenError::Config(ConfigError::Parse(_)))
        ));
    }

    #[test]
    fn inverted_point_range() {
        let config = PointConfig {
            min_points: 10,
            max_points: 5,
            ..PointConfig::default()
        };
        assert_eq!(invalid_field(config.validate()), "points.max_points");
    }

    #[test]
    fn spacing_too_large_for_bounds() {
        let config = PointConfig {
            bounds: [10.0, 10.0],
            min_point_spacing: 7.0,
            ..PointConfig::default()
        };
        assert_eq!(invalid_field(config.validate()), "points.min_point_spacing");
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = PointConfig {
            max_attempts: 0,
            ..PointConfig::default()
        };
        assert_eq!(invalid_field(config.validate()), "points.max_attempts");
    }

    #[test]
    fn alpha_out_of_range() {
        let config = SplineConfig {
            alpha: 1.5,
            ..SplineConfig::default()
        };
        assert_eq!(invalid_field(config.validate()), "spline.alpha");
    }

    #[test]
    fn single_loop_per_segment_rejected() {
        let config = TrackConfig {
            min_loops_per_segment: 1,
            ..TrackConfig::default()
        };
        assert_eq!(
            invalid_field(config.validate()),
            "track.min_loops_per_segment"
        );
    }

    #[test]
    fn zero_terrain_resolution_rejected() {
        let config = TerrainConfig {
            resolution: 0,
            ..TerrainConfig::default()
        };
        assert_eq!(invalid_field(config.validate()), "terrain.resolution");
    }

    #[test]
    fn oversized_terrain_grids_rejected() {
        let config = TerrainConfig {
            resolution: 1 << 20,
            ..TerrainConfig::default()
        };
        assert_eq!(invalid_field(config.validate()), "terrain.resolution");

        let config = TerrainConfig {
            collision_resolution: usize::MAX,
            ..TerrainConfig::default()
        };
        assert_eq!(
            invalid_field(config.validate()),
            "terrain.collision_resolution"
        );

        let config = TerrainConfig {
            resolution: 65_534,
            ..TerrainConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn unindexable_loop_cap_rejected() {
        let config = TrackConfig {
            max_loops_per_segment: usize::MAX,
            ..TrackConfig::default()
        };
        assert_eq!(
            invalid_field(config.validate()),
            "track.max_loops_per_segment"
        );
    }
}
