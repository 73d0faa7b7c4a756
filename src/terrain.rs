//! Noise-driven terrain height field.

use std::fmt;

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::TerrainConfig;
use crate::error::{ConfigError, Result};

/// Deterministic terrain elevation sampled from seeded Perlin noise.
///
/// Heights lie in `[-height_scale / 2, height_scale / 2]`.
pub struct HeightField {
    seed: i32,
    noise_detail: f64,
    height_scale: f64,
    noise: FastNoiseLite,
}

impl HeightField {
    /// Creates a height field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `noise_detail` is not positive
    /// or `height_scale` is negative or not finite.
    pub fn new(seed: i32, noise_detail: f64, height_scale: f64) -> Result<Self> {
        check_noise_detail(noise_detail)?;
        check_height_scale(height_scale)?;
        Ok(Self {
            seed,
            noise_detail,
            height_scale,
            noise: make_perlin(seed, noise_detail),
        })
    }

    /// Creates a height field from the terrain section of the configuration.
    ///
    /// # Errors
    ///
    /// See [`HeightField::new`].
    pub fn from_config(config: &TerrainConfig) -> Result<Self> {
        Self::new(config.seed, config.noise_detail, config.height_scale)
    }

    /// Terrain elevation at ground position `(x, z)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        let sample = f64::from(self.noise.get_noise_2d(x as f32, z as f32));
        sample * 0.5 * self.height_scale
    }

    /// Current noise seed.
    #[must_use]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Noise frequency.
    #[must_use]
    pub fn noise_detail(&self) -> f64 {
        self.noise_detail
    }

    /// Peak-to-trough height.
    #[must_use]
    pub fn height_scale(&self) -> f64 {
        self.height_scale
    }

    /// Moves the seed forward by `step`, wrapping on overflow, so the next
    /// terrain differs from the last.
    pub fn advance_seed(&mut self, step: i32) {
        self.seed = self.seed.wrapping_add(step);
        self.noise = make_perlin(self.seed, self.noise_detail);
    }

    /// Changes the noise frequency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `noise_detail` is not positive.
    pub fn set_noise_detail(&mut self, noise_detail: f64) -> Result<()> {
        check_noise_detail(noise_detail)?;
        self.noise_detail = noise_detail;
        self.noise = make_perlin(self.seed, noise_detail);
        Ok(())
    }

    /// Changes the peak-to-trough height.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `height_scale` is negative or
    /// not finite.
    pub fn set_height_scale(&mut self, height_scale: f64) -> Result<()> {
        check_height_scale(height_scale)?;
        self.height_scale = height_scale;
        Ok(())
    }
}

impl Clone for HeightField {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            noise_detail: self.noise_detail,
            height_scale: self.height_scale,
            noise: make_perlin(self.seed, self.noise_detail),
        }
    }
}

impl fmt::Debug for HeightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightField")
            .field("seed", &self.seed)
            .field("noise_detail", &self.noise_detail)
            .field("height_scale", &self.height_scale)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn make_perlin(seed: i32, frequency: f64) -> FastNoiseLite {
    let mut noise = FastNoiseLite::new();
    noise.set_seed(Some(seed));
    noise.set_noise_type(Some(NoiseType::Perlin));
    noise.set_frequency(Some(frequency as f32));
    noise
}

fn check_noise_detail(noise_detail: f64) -> Result<()> {
    if noise_detail.is_finite() && noise_detail > 0.0 {
        return Ok(());
    }
    let reason = "must be positive";
    Err(ConfigError::invalid("terrain.noise_detail", reason).into())
}

fn check_height_scale(height_scale: f64) -> Result<()> {
    if height_scale.is_finite() && height_scale >= 0.0 {
        return Ok(());
    }
    let reason = "must be non-negative";
    Err(ConfigError::invalid("terrain.height_scale", reason).into())
}
