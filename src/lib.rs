pub mod config;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod math;
pub mod pipeline;
pub mod profile;
pub mod terrain;
pub mod tessellation;

pub use config::GeneratorConfig;
pub use error::{Result, TrackgenError};
pub use pipeline::{GeneratedTrack, TrackPipeline};
