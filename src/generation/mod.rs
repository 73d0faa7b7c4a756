pub mod fit_spline;
pub mod point_generator;
pub mod relaxation;

pub use fit_spline::FitSpline;
pub use point_generator::PointGenerator;
pub use relaxation::{cap_turn, displace_midpoints, relax_angles, relax_spacing};
