#![allow(dead_code)]

use approx::assert_relative_eq;
use cometrail::{
    orbit_type::{OrbitalElements, StateVector},
    trajectory::TrajectoryPoint,
};
use hifitime::Epoch;
use nalgebra::Vector3;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn epoch(y: i32, m: u8, d: u8) -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(y, m, d)
}

/// State of the reference scenario: 1 AU on the x axis, 0.02 AU/day along y.
pub fn reference_state() -> StateVector {
    StateVector::new(
        epoch(2025, 10, 29),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 0.02, 0.0),
    )
}

/// Hyperbolic orbit with perihelion at 1 AU, leaving the planetary region within a few years.
pub fn fast_hyperbola() -> OrbitalElements {
    let tp = epoch(2026, 1, 15);
    OrbitalElements::new(tp, 6.14, 1.0, 175.0, 128.0, 322.0, Some(tp)).unwrap()
}

pub fn assert_points_close(actual: &[TrajectoryPoint], expected: &[TrajectoryPoint], epsilon: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert_eq!(a.date, e.date);
        assert_relative_eq!(a.x, e.x, epsilon = epsilon);
        assert_relative_eq!(a.y, e.y, epsilon = epsilon);
        assert_relative_eq!(a.z, e.z, epsilon = epsilon);
        assert_eq!(a.uncertainty, e.uncertainty);
    }
}
