mod segment;

pub use segment::Segment;

use crate::error::{GeometryError, Result};
use crate::math::Point3;

use super::cyclic::Cyclic;
use super::oriented_point::OrientedPoint;

/// Parameter step used for finite-difference forward estimation.
pub const TANGENT_EPSILON: f64 = 0.001;

/// A closed spline made of cubic segments; segment `i` runs from control point
/// `i` to control point `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    segments: Cyclic<Segment>,
}

impl Spline {
    /// Wraps a cyclic list of segments.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the list is empty or any
    /// segment has non-finite coefficients.
    pub fn new(segments: Cyclic<Segment>) -> Result<Self> {
        if segments.is_empty() {
            let reason = "spline has no segments".to_owned();
            return Err(GeometryError::Degenerate(reason).into());
        }
        if let Some(i) = segments.iter().position(|s| !s.is_finite()) {
            return Err(GeometryError::Degenerate(format!(
                "segment {i} has non-finite coefficients"
            ))
            .into());
        }
        Ok(Self { segments })
    }

    /// The segments in loop order.
    #[must_use]
    pub fn segments(&self) -> &Cyclic<Segment> {
        &self.segments
    }

    /// Number of segments (equal to the number of control points).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Evaluates segment `index` (wrapping) at `t`.
    #[must_use]
    pub fn evaluate(&self, index: usize, t: f64) -> Point3 {
        self.segments[index].evaluate(t)
    }

    /// Samples a position and rotation frame on segment `index` at `t`.
    ///
    /// Forward is the normalized average of the secants to `t − ε` and
    /// `t + ε`; samples past either end of the segment are taken from the
    /// neighbouring segment with the parameter shifted by one.
    #[must_use]
    pub fn sample_orientation(&self, index: usize, t: f64) -> OrientedPoint {
        let index = index % self.segments.len();
        let position = self.segments[index].evaluate(t);

        let before = t - TANGENT_EPSILON;
        let behind = if before < 0.0 {
            let prev = self.segments.prev_index(index);
            self.segments[prev].evaluate(before + 1.0)
        } else {
            self.segments[index].evaluate(before)
        };

        let after = t + TANGENT_EPSILON;
        let ahead = if after > 1.0 {
            let next = self.segments.next_index(index);
            self.segments[next].evaluate(after - 1.0)
        } else {
            self.segments[index].evaluate(after)
        };

        let forward = ((position - behind) + (ahead - position)) * 0.5;
        OrientedPoint::looking_along(position, &forward)
    }

    /// Samples the whole loop into an open polyline preview, `step` apart in
    /// parameter space per segment.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] if `step` is not in
    /// `(0, 1]`.
    pub fn polyline(&self, step: f64) -> Result<Vec<Point3>> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "step",
                value: step,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        let mut points = Vec::new();
        for segment in &self.segments {
            let mut t = 0.0;
            while t < 1.0 {
                points.push(segment.evaluate(t));
                t += step;
            }
        }
        Ok(points)
    }

    /// Approximates the total arc length using `samples_per_segment` chords per
    /// segment.
    #[must_use]
    pub fn length(&self, samples_per_segment: usize) -> f64 {
        let samples = samples_per_segment.max(1);
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / samples as f64;
        let mut total = 0.0;
        for segment in &self.segments {
            let mut prev = segment.start();
            for k in 1..=samples {
                #[allow(clippy::cast_precision_loss)]
                let p = segment.evaluate(k as f64 * inv);
                total += (p - prev).norm();
                prev = p;
            }
        }
        total
    }
}
