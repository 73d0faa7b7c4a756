pub mod cyclic;
pub mod oriented_point;
pub mod spline;

pub use cyclic::Cyclic;
pub use oriented_point::OrientedPoint;
pub use spline::{Segment, Spline};

use crate::math::Point3;

/// A closed loop of track control points.
pub type PointLoop = Cyclic<Point3>;
