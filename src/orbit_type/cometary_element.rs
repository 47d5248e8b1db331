use std::fmt;

use hifitime::Epoch;
use nalgebra::Matrix3;

use crate::{
    cometrail_errors::CometrailError,
    constants::{Degree, RADEG},
    orbit_type::OrbitFamily,
    ref_system::orbital_plane_to_ecliptic,
    time::to_iso8601,
};

/// # Cometary orbital elements
///
/// Perihelion-based elements are the natural form for comets: they stay finite for parabolic
/// orbits and keep a positive distance parameter for hyperbolic ones.
///
/// Units & conventions
/// --------------------
/// - Distances in **AU**; angles in **degrees**; instants are UTC [`Epoch`]s.
/// - Elements are heliocentric, ecliptic mean J2000.
/// - `e < 1`: elliptic, `a = q/(1-e) > 0`; `e ≥ 1`: open orbit with `a < 0` (or infinite).
///
/// An element set is a constant: it is never mutated by the engine.
///
/// See also
/// ------------
/// * [`OrbitFamily`] – Conic classification derived from `(e, q)`.
/// * [`crate::kepler::position_at`] – Closed-form position at a date.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalElements {
    /// Osculation epoch of the element set.
    pub epoch: Epoch,

    /// Eccentricity `e` (≥ 0).
    pub eccentricity: f64,

    /// Perihelion distance `q` (AU, > 0).
    pub perihelion_distance: f64,

    /// Inclination `i` (deg).
    pub inclination: Degree,

    /// Argument of perihelion `ω` (deg).
    pub periapsis_argument: Degree,

    /// Longitude of the ascending node `Ω` (deg).
    pub ascending_node: Degree,

    /// Time of perihelion passage `T`. Without it no position can be computed.
    pub perihelion_time: Option<Epoch>,
}

impl OrbitalElements {
    /// Build and validate an element set.
    ///
    /// Arguments
    /// -----------------
    /// * `epoch` – Osculation epoch.
    /// * `eccentricity` – `e`, finite and ≥ 0.
    /// * `perihelion_distance` – `q` in AU, finite and > 0.
    /// * `inclination`, `periapsis_argument`, `ascending_node` – `i`, `ω`, `Ω` in degrees.
    /// * `perihelion_time` – `T`, or `None` if it has not been determined yet.
    ///
    /// Errors
    /// ----------
    /// * [`CometrailError::InvalidElements`] when `e` or `q` is out of its domain, or an angle is
    ///   not finite.
    pub fn new(
        epoch: Epoch,
        eccentricity: f64,
        perihelion_distance: f64,
        inclination: Degree,
        periapsis_argument: Degree,
        ascending_node: Degree,
        perihelion_time: Option<Epoch>,
    ) -> Result<Self, CometrailError> {
        if !eccentricity.is_finite() || eccentricity < 0.0 {
            return Err(CometrailError::InvalidElements(format!(
                "eccentricity must be finite and >= 0, got {eccentricity}"
            )));
        }
        if !perihelion_distance.is_finite() || perihelion_distance <= 0.0 {
            return Err(CometrailError::InvalidElements(format!(
                "perihelion distance must be finite and > 0, got {perihelion_distance}"
            )));
        }
        if ![inclination, periapsis_argument, ascending_node]
            .iter()
            .all(|angle| angle.is_finite())
        {
            return Err(CometrailError::InvalidElements(
                "angular elements must be finite".into(),
            ));
        }

        Ok(OrbitalElements {
            epoch,
            eccentricity,
            perihelion_distance,
            inclination,
            periapsis_argument,
            ascending_node,
            perihelion_time,
        })
    }

    /// Conic family of this orbit.
    pub fn family(&self) -> OrbitFamily {
        OrbitFamily::classify(self.eccentricity, self.perihelion_distance)
    }

    /// Semi-major axis `a = q / (1 - e)` (AU), negative for hyperbolas, `None` for a parabola.
    pub fn semi_major_axis(&self) -> Option<f64> {
        match self.family() {
            OrbitFamily::Elliptic { semi_major_axis }
            | OrbitFamily::Hyperbolic { semi_major_axis } => Some(semi_major_axis),
            OrbitFamily::Parabolic => None,
        }
    }

    /// Semi-latus rectum `p = q (1 + e)` (AU).
    pub fn semi_latus_rectum(&self) -> f64 {
        self.perihelion_distance * (1.0 + self.eccentricity)
    }

    /// Combined perifocal → ecliptic J2000 rotation for this orbit.
    pub fn orbital_plane_rotation(&self) -> Matrix3<f64> {
        orbital_plane_to_ecliptic(
            self.inclination * RADEG,
            self.periapsis_argument * RADEG,
            self.ascending_node * RADEG,
        )
    }

    /// Same elements with a known perihelion time.
    pub fn with_perihelion_time(mut self, perihelion_time: Epoch) -> Self {
        self.perihelion_time = Some(perihelion_time);
        self
    }
}

impl fmt::Display for OrbitalElements {
    /// Pretty-print cometary elements, angles in degrees.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cometary Elements @ epoch {}", to_iso8601(&self.epoch))?;
        writeln!(f, "------------------------------------------------")?;
        writeln!(
            f,
            "  q   (perihelion distance)     = {:.8} AU",
            self.perihelion_distance
        )?;
        writeln!(
            f,
            "  e   (eccentricity)            = {:.8}",
            self.eccentricity
        )?;
        writeln!(f, "  i   (inclination)             = {:.6}°", self.inclination)?;
        writeln!(
            f,
            "  ω   (argument of perihelion)  = {:.6}°",
            self.periapsis_argument
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)       = {:.6}°",
            self.ascending_node
        )?;
        match &self.perihelion_time {
            Some(tp) => writeln!(f, "  T   (perihelion time)         = {}", to_iso8601(tp)),
            None => writeln!(f, "  T   (perihelion time)         = unknown"),
        }
    }
}

#[cfg(test)]
mod cometary_element_test {
    use super::*;
    use approx::assert_relative_eq;

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc(2025, 7, 1, 0, 0, 0, 0)
    }

    #[test]
    fn test_new_rejects_invalid() {
        assert!(OrbitalElements::new(epoch(), -0.1, 1.0, 0.0, 0.0, 0.0, None).is_err());
        assert!(OrbitalElements::new(epoch(), 0.5, 0.0, 0.0, 0.0, 0.0, None).is_err());
        assert!(OrbitalElements::new(epoch(), 0.5, 1.0, f64::NAN, 0.0, 0.0, None).is_err());
        assert!(OrbitalElements::new(epoch(), 0.5, 1.0, 10.0, 20.0, 30.0, None).is_ok());
    }

    #[test]
    fn test_semi_major_axis_sign() {
        let ell = OrbitalElements::new(epoch(), 0.5, 1.0, 0.0, 0.0, 0.0, None).unwrap();
        assert_relative_eq!(ell.semi_major_axis().unwrap(), 2.0);

        let hyp = OrbitalElements::new(epoch(), 3.0, 1.0, 0.0, 0.0, 0.0, None).unwrap();
        assert_relative_eq!(hyp.semi_major_axis().unwrap(), -0.5);

        let par = OrbitalElements::new(epoch(), 1.0, 1.0, 0.0, 0.0, 0.0, None).unwrap();
        assert!(par.semi_major_axis().is_none());
        assert_relative_eq!(par.semi_latus_rectum(), 2.0);
    }

    #[test]
    fn test_display_mentions_unknown_perihelion() {
        let elem = OrbitalElements::new(epoch(), 0.5, 1.0, 0.0, 0.0, 0.0, None).unwrap();
        let text = elem.to_string();
        assert!(text.contains("unknown"));

        let elem = elem.with_perihelion_time(epoch());
        assert!(elem.to_string().contains("2025-07-01T00:00:00.000Z"));
    }
}
