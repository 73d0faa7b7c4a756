use crate::error::{GeometryError, Result};
use crate::geometry::spline::{Segment, Spline};
use crate::geometry::{Cyclic, PointLoop};
use crate::math::TOLERANCE;

/// Fits a closed Catmull-Rom spline through a point loop.
///
/// `alpha` selects the knot parameterization: `0` uniform, `0.5` centripetal,
/// `1` chordal. Segment `i` runs from point `i` to point `i + 1`.
pub struct FitSpline<'a> {
    points: &'a PointLoop,
    alpha: f64,
}

impl<'a> FitSpline<'a> {
    /// Creates a new `FitSpline` operation.
    #[must_use]
    pub fn new(points: &'a PointLoop, alpha: f64) -> Self {
        Self { points, alpha }
    }

    /// Executes the operation, producing one segment per control point.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] if `alpha` is outside
    /// `[0, 1]`, and [`GeometryError::Degenerate`] for fewer than 4 points or
    /// when consecutive points coincide.
    pub fn execute(&self) -> Result<Spline> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "alpha",
                value: self.alpha,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        let n = self.points.len();
        if n < 4 {
            return Err(GeometryError::Degenerate(format!(
                "a closed spline needs at least 4 points, got {n}"
            ))
            .into());
        }

        let chords: Vec<f64> = self.points.pairs().map(|(a, b)| (b - a).norm()).collect();
        if let Some(i) = chords.iter().position(|c| *c < TOLERANCE) {
            return Err(GeometryError::Degenerate(format!(
                "points {i} and {} coincide",
                self.points.next_index(i)
            ))
            .into());
        }
        // Knot spacing of edge i → i+1.
        let weights: Vec<f64> = chords.iter().map(|c| c.powf(self.alpha)).collect();
        let weights = Cyclic::new(weights);

        let p = self.points;
        let segments = (0..n)
            .map(|i| {
                let prev = n + i - 1;
                Segment::catmull_rom(
                    [&p[prev], &p[i], &p[i + 1], &p[i + 2]],
                    [weights[prev], weights[i], weights[i + 1]],
                )
            })
            .collect();

        Spline::new(Cyclic::new(segments))
    }
}
