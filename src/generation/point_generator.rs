//! Random control-point loop generation.
//!
//! An attempt samples random points, wraps them in their convex hull, roughens
//! the hull with displaced midpoints and then relaxes spacing and turn angles.
//! Attempts that still break a constraint are thrown away and retried, up to
//! [`PointConfig::max_attempts`] times.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::PointConfig;
use crate::error::{GenerationError, Result};
use crate::geometry::PointLoop;
use crate::math::{
    convex_hull, horizontal, loop_self_intersects, signed_turn_angle, within_bounds, Point3,
};

use super::relaxation::{displace_midpoints, relax_angles, relax_spacing};

/// Why an attempt was discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rejection {
    EmptyHull,
    TooFewPoints(usize),
    SelfIntersecting,
    OutOfBounds,
    TurnTooSharp { vertex: usize, degrees: f64 },
    TooClose {
        first: usize,
        second: usize,
        distance: f64,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHull => write!(f, "convex hull is empty"),
            Self::TooFewPoints(n) => write!(f, "only {n} points"),
            Self::SelfIntersecting => write!(f, "loop self-intersects"),
            Self::OutOfBounds => write!(f, "loop leaves the bounds"),
            Self::TurnTooSharp { vertex, degrees } => {
                write!(f, "turn of {degrees:.2}° at vertex {vertex}")
            }
            Self::TooClose {
                first,
                second,
                distance,
            } => write!(f, "points {first} and {second} are {distance:.2} apart"),
        }
    }
}

/// Produces closed loops of control points satisfying [`PointConfig`].
#[derive(Debug, Clone)]
pub struct PointGenerator {
    config: PointConfig,
    rng: StdRng,
}

impl PointGenerator {
    /// Creates a generator. A `seed` makes every subsequent loop reproducible;
    /// without one the RNG is seeded from entropy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if `config` fails validation.
    pub fn new(config: PointConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PointConfig {
        &self.config
    }

    /// Fixes the number of initially sampled points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if the resulting configuration is
    /// invalid; the previous configuration is kept.
    pub fn set_initial_points(&mut self, count: usize) -> Result<()> {
        let mut config = self.config.clone();
        config.min_points = count;
        config.max_points = count;
        self.replace_config(config)
    }

    /// Changes the maximum midpoint displacement.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] if `displacement` is negative or
    /// not finite.
    pub fn set_max_displacement(&mut self, displacement: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.max_displacement = displacement;
        self.replace_config(config)
    }

    fn replace_config(&mut self, config: PointConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Generates a loop, retrying until every constraint holds.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ConstraintsUnsatisfied`] once
    /// `max_attempts` attempts have been rejected.
    pub fn generate(&mut self) -> Result<PointLoop> {
        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            match self.attempt() {
                Ok(points) => {
                    debug!(attempt, points = points.len(), "point loop accepted");
                    return Ok(points);
                }
                Err(reason) => debug!(attempt, %reason, "point loop rejected"),
            }
        }
        warn!(
            attempts = max_attempts,
            "point generation exhausted its attempts"
        );
        Err(GenerationError::ConstraintsUnsatisfied {
            attempts: max_attempts,
        }
        .into())
    }

    fn attempt(&mut self) -> std::result::Result<PointLoop, Rejection> {
        let cfg = &self.config;
        let samples = sample_points(cfg, &mut self.rng);

        let mut hull = convex_hull(&samples);
        if hull.is_empty() {
            return Err(Rejection::EmptyHull);
        }
        relax_spacing(&mut hull, cfg.min_point_spacing, cfg.spacing_iterations);

        let mut points = displace_midpoints(
            &PointLoop::new(hull),
            cfg.max_displacement,
            cfg.displacement_scale,
            &mut self.rng,
        );
        relax_spacing(
            points.as_mut_slice(),
            cfg.min_point_spacing,
            cfg.spacing_iterations,
        );
        relax_angles(
            &mut points,
            cfg.max_turn_angle,
            cfg.min_point_spacing,
            cfg.angling_iterations,
        );
        relax_spacing(
            points.as_mut_slice(),
            cfg.min_point_spacing,
            cfg.spacing_iterations,
        );

        check_loop(cfg, &points)?;
        Ok(points)
    }
}

fn sample_points<R: Rng + ?Sized>(cfg: &PointConfig, rng: &mut R) -> Vec<Point3> {
    let count = rng.gen_range(cfg.min_points..=cfg.max_points);
    let half_w = cfg.bounds[0] * 0.5 * cfg.sampling_fraction;
    let half_d = cfg.bounds[1] * 0.5 * cfg.sampling_fraction;
    let half_h = cfg.max_elevation * 0.5;

    (0..count)
        .map(|_| {
            Point3::new(
                rng.gen_range(-half_w..=half_w),
                rng.gen_range(-half_h..=half_h),
                rng.gen_range(-half_d..=half_d),
            )
        })
        .collect()
}

fn check_loop(cfg: &PointConfig, points: &PointLoop) -> std::result::Result<(), Rejection> {
    let n = points.len();
    if n < 4 {
        return Err(Rejection::TooFewPoints(n));
    }
    if loop_self_intersects(points.as_slice()) {
        return Err(Rejection::SelfIntersecting);
    }
    if !within_bounds(points.as_slice(), cfg.bounds) {
        return Err(Rejection::OutOfBounds);
    }

    let max_turn = cfg.max_turn_angle + cfg.angle_slack;
    for i in 0..n {
        let degrees = signed_turn_angle(&points[points.prev_index(i)], &points[i], &points[i + 1]);
        if degrees.abs() > max_turn {
            return Err(Rejection::TurnTooSharp { vertex: i, degrees });
        }
    }

    let min_spacing = cfg.min_point_spacing * (1.0 - cfg.spacing_slack);
    for first in 0..n {
        for second in (first + 1)..n {
            let distance = horizontal(&(points[second] - points[first])).norm();
            if distance < min_spacing {
                return Err(Rejection::TooClose {
                    first,
                    second,
                    distance,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::TrackgenError;

    #[test]
    fn seeded_generation_is_reproducible() {
        let mut a = PointGenerator::new(PointConfig::default(), Some(42)).unwrap();
        let mut b = PointGenerator::new(PointConfig::default(), Some(42)).unwrap();
        assert_eq!(a.generate().unwrap(), b.generate().unwrap());
        assert_eq!(a.generate().unwrap(), b.generate().unwrap());
    }

    #[test]
    fn successive_loops_differ() {
        let mut generator = PointGenerator::new(PointConfig::default(), Some(3)).unwrap();
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn generated_loop_passes_its_own_checks() {
        let config = PointConfig::default();
        let mut generator = PointGenerator::new(config.clone(), Some(9)).unwrap();
        let points = generator.generate().unwrap();
        assert!(points.len() >= 2 * 3);
        assert_eq!(check_loop(&config, &points), Ok(()));
    }

    #[test]
    fn impossible_constraints_exhaust_attempts() {
        // Six points cannot close a loop turning at most 1° per vertex.
        let config = PointConfig {
            min_points: 3,
            max_points: 3,
            max_turn_angle: 1.0,
            angle_slack: 0.0,
            max_attempts: 5,
            ..PointConfig::default()
        };
        let mut generator = PointGenerator::new(config, Some(1)).unwrap();
        let err = generator.generate().unwrap_err();
        assert!(matches!(
            err,
            TrackgenError::Generation(GenerationError::ConstraintsUnsatisfied { attempts: 5 })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PointConfig {
            max_attempts: 0,
            ..PointConfig::default()
        };
        assert!(PointGenerator::new(config, None).is_err());
    }

    #[test]
    fn knob_setters_validate() {
        let mut generator = PointGenerator::new(PointConfig::default(), Some(5)).unwrap();
        generator.set_initial_points(10).unwrap();
        assert_eq!(generator.config().min_points, 10);
        assert_eq!(generator.config().max_points, 10);

        assert!(generator.set_initial_points(2).is_err());
        assert_eq!(generator.config().min_points, 10);

        assert!(generator.set_max_displacement(-1.0).is_err());
        generator.set_max_displacement(0.0).unwrap();
        assert_abs_diff_eq!(generator.config().max_displacement, 0.0);
    }

    #[test]
    fn rejection_reasons_read_well() {
        let reason = Rejection::TooClose {
            first: 1,
            second: 4,
            distance: 2.5,
        };
        assert_eq!(reason.to_string(), "points 1 and 4 are 2.50 apart");
    }

    #[test]
    fn bowtie_is_rejected() {
        let config = PointConfig {
            min_point_spacing: 1.0,
            ..PointConfig::default()
        };
        let bowtie = PointLoop::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(50.0, 0.0, 50.0),
            Point3::new(50.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 50.0),
        ]);
        assert!(check_loop(&config, &bowtie).is_err());
    }
}
