use crate::math::{Point3, Vector3};

/// One cubic piece of a closed spline: `P(t) = a·t³ + b·t² + c·t + d`,
/// `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    a: Vector3,
    b: Vector3,
    c: Vector3,
    d: Point3,
}

impl Segment {
    /// Creates a segment from its polynomial coefficients.
    #[must_use]
    pub fn new(a: Vector3, b: Vector3, c: Vector3, d: Point3) -> Self {
        Self { a, b, c, d }
    }

    /// Builds the segment between `p1` and `p2` using neighbours `p0` and `p3`
    /// and the knot-spacing exponent already applied to the chord lengths
    /// `t01`, `t12` and `t23`.
    ///
    /// Callers must ensure the chord weights are non-zero.
    #[must_use]
    pub fn catmull_rom(
        [p0, p1, p2, p3]: [&Point3; 4],
        [t01, t12, t23]: [f64; 3],
    ) -> Self {
        let m1 = (p2 - p1) + ((p1 - p0) / t01 - (p2 - p0) / (t01 + t12)) * t12;
        let m2 = (p2 - p1) + ((p3 - p2) / t23 - (p3 - p1) / (t12 + t23)) * t12;

        let chord = p1 - p2;
        let a = chord * 2.0 + m1 + m2;
        let b = chord * -3.0 - m1 * 2.0 - m2;
        Self::new(a, b, m1, *p1)
    }

    /// Evaluates the polynomial at `t` (Horner form).
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point3 {
        self.d + ((self.a * t + self.b) * t + self.c) * t
    }

    /// Start point, `P(0)`.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.d
    }

    /// Returns whether every coefficient is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.a
            .iter()
            .chain(self.b.iter())
            .chain(self.c.iter())
            .chain(self.d.coords.iter())
            .all(|v| v.is_finite())
    }
}
