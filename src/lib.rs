pub mod catalog;
pub mod cometrail_errors;
pub mod config;
pub mod constants;
pub mod ephemeris;
pub mod forces;
pub mod integrator;
pub mod kepler;
pub mod orbit_type;
pub mod ref_system;
pub mod time;
pub mod trajectory;

pub use cometrail_errors::CometrailError;
pub use config::PropagationConfig;
pub use trajectory::{TrajectoryGenerator, TrajectoryPoint};
