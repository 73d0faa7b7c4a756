use crate::math::{up, Point3, UnitQuaternion, Vector3, TOLERANCE};

/// A position with a rotation frame, sampled along a spline.
///
/// Local axes are right-handed: `+z` is forward along the track, `+y` is up and
/// `+x` points to the traveller's left, so their right is local `-x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedPoint {
    /// World-space position.
    pub position: Point3,
    /// Rotation from local to world space.
    pub rotation: UnitQuaternion,
}

impl OrientedPoint {
    /// Creates an oriented point from a position and rotation.
    #[must_use]
    pub fn new(position: Point3, rotation: UnitQuaternion) -> Self {
        Self { position, rotation }
    }

    /// Creates an oriented point whose local `+z` axis faces `forward`, keeping
    /// local `+y` as close to world up as possible.
    ///
    /// A vertical `forward` falls back to the shortest-arc rotation from `+z`.
    /// A zero `forward` yields the identity rotation.
    #[must_use]
    pub fn looking_along(position: Point3, forward: &Vector3) -> Self {
        let norm = forward.norm();
        if norm < TOLERANCE {
            return Self::new(position, UnitQuaternion::identity());
        }
        let forward = forward / norm;
        let rotation = if forward.cross(&up()).norm() < TOLERANCE {
            UnitQuaternion::rotation_between(&Vector3::z(), &forward)
                .unwrap_or_else(UnitQuaternion::identity)
        } else {
            UnitQuaternion::face_towards(&forward, &up())
        };
        Self::new(position, rotation)
    }

    /// Transforms a local-space point into world space.
    #[must_use]
    pub fn local_to_world(&self, local: &Point3) -> Point3 {
        self.position + self.rotation * local.coords
    }

    /// Rotates a local-space direction into world space (no translation).
    #[must_use]
    pub fn rotate_vector(&self, local: &Vector3) -> Vector3 {
        self.rotation * local
    }

    /// World-space forward direction.
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        self.rotation * Vector3::z()
    }

    /// World-space direction to the traveller's right, `forward × up` for a
    /// level frame.
    #[must_use]
    pub fn right(&self) -> Vector3 {
        self.rotation * -Vector3::x()
    }

    /// Returns a copy raised by `dy` along world up.
    #[must_use]
    pub fn lifted(&self, dy: f64) -> Self {
        Self::new(self.position + up() * dy, self.rotation)
    }

    /// Heading around the vertical axis in degrees, `0` facing `+z` and
    /// increasing towards `+x`.
    #[must_use]
    pub fn yaw_degrees(&self) -> f64 {
        let f = self.forward();
        f.x.atan2(f.z).to_degrees()
    }
}
