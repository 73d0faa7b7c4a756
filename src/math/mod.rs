pub mod convex_hull;
pub mod intersect_2d;
pub mod orientation;
pub mod polygon_2d;

pub use convex_hull::convex_hull;
pub use intersect_2d::{on_segment, segments_intersect};
pub use orientation::{orientation, Orientation};
pub use polygon_2d::{loop_self_intersects, rotate_xz, signed_turn_angle, within_bounds};

/// 2D point type (profile space).
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type. `x`/`z` span the ground plane, `y` is elevation.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type (profile space).
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rotation type used for oriented frames.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// World up axis.
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}

/// Projects a vector onto the ground plane (drops elevation).
#[must_use]
pub fn horizontal(v: &Vector3) -> Vector3 {
    Vector3::new(v.x, 0.0, v.z)
}
