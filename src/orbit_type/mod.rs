//! # Orbit representations
//!
//! This module defines the inputs and intermediate products of the propagation engine:
//!
//! - [`cometary_element`](crate::orbit_type::cometary_element): Perihelion-based elements
//!   `(q, e, i, ω, Ω, T)`, the form in which comet orbits are published. Valid for elliptic,
//!   parabolic and hyperbolic orbits.
//! - [`non_grav`](crate::orbit_type::non_grav): Marsden–Sekanina non-gravitational parameters.
//! - [`state_vector`](crate::orbit_type::state_vector): Heliocentric ecliptic position and
//!   velocity at an epoch.
//!
//! [`OrbitFamily`] is the tagged variant over conic type. Every eccentricity-dependent
//! computation (mean motion, anomaly equation, span of an orbit overlay) matches on it instead
//! of repeating `e < 1` tests.
//!
//! ## Typical workflow
//!
//! ```rust
//! use cometrail::catalog;
//! use cometrail::orbit_type::OrbitFamily;
//!
//! let atlas = catalog::atlas_3i();
//! match atlas.family() {
//!     OrbitFamily::Hyperbolic { semi_major_axis } => assert!(semi_major_axis < 0.0),
//!     _ => unreachable!("3I/ATLAS is on an open orbit"),
//! }
//! ```

/// Perihelion-based (cometary) orbital elements.
pub mod cometary_element;

/// Marsden–Sekanina non-gravitational force parameters.
pub mod non_grav;

/// Heliocentric Cartesian state vectors.
pub mod state_vector;

pub use cometary_element::OrbitalElements;
pub use non_grav::NonGravParams;
pub use state_vector::StateVector;

/// Eccentricity band treated as an exact parabola.
pub const PARABOLIC_TOLERANCE: f64 = 1e-10;

/// Conic family of an orbit, with the quantities that only exist for that family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitFamily {
    /// `e < 1`: closed orbit, `a = q / (1 - e) > 0`.
    Elliptic { semi_major_axis: f64 },
    /// `e = 1` (within [`PARABOLIC_TOLERANCE`]): the semi-major axis is infinite.
    Parabolic,
    /// `e > 1`: open orbit, `a = q / (1 - e) < 0`.
    Hyperbolic { semi_major_axis: f64 },
}

impl OrbitFamily {
    /// Classify a conic from its eccentricity and perihelion distance.
    pub fn classify(eccentricity: f64, perihelion_distance: f64) -> Self {
        if (eccentricity - 1.0).abs() < PARABOLIC_TOLERANCE {
            OrbitFamily::Parabolic
        } else if eccentricity < 1.0 {
            OrbitFamily::Elliptic {
                semi_major_axis: perihelion_distance / (1.0 - eccentricity),
            }
        } else {
            OrbitFamily::Hyperbolic {
                semi_major_axis: perihelion_distance / (1.0 - eccentricity),
            }
        }
    }

    /// Mean motion (rad/day).
    ///
    /// `sqrt(μ/|a|³)` for elliptic and hyperbolic orbits, and the Barker rate
    /// `sqrt(μ/(2q³))` for the parabola.
    pub fn mean_motion(&self, mu: f64, perihelion_distance: f64) -> f64 {
        match *self {
            OrbitFamily::Elliptic { semi_major_axis }
            | OrbitFamily::Hyperbolic { semi_major_axis } => {
                (mu / semi_major_axis.abs().powi(3)).sqrt()
            }
            OrbitFamily::Parabolic => (mu / (2.0 * perihelion_distance.powi(3))).sqrt(),
        }
    }

    /// Orbital period (days), only defined for closed orbits.
    pub fn period(&self, mu: f64) -> Option<f64> {
        match *self {
            OrbitFamily::Elliptic { semi_major_axis } => {
                Some(std::f64::consts::TAU / (mu / semi_major_axis.powi(3)).sqrt())
            }
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, OrbitFamily::Elliptic { .. })
    }
}
