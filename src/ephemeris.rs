//! # Planetary ephemerides
//!
//! The propagation engine never computes planetary positions itself: it asks an
//! [`EphemerisProvider`] for the heliocentric position of a [`Body`] at a date. The force model
//! uses it for third-body perturbations and the coordinate transforms use it for the
//! heliocentric → geocentric translation.
//!
//! A host application usually plugs in its own high-precision provider (JPL Horizons, a SPICE
//! kernel, …). [`MeanElementsEphemeris`] is the built-in fallback: the JPL *Keplerian elements
//! for approximate positions of the major planets* (E. M. Standish), valid from 1800 to 2050,
//! with an accuracy of a few arcminutes which is plenty for perturbation terms.
//!
//! All positions are **heliocentric ecliptic J2000**, in **AU**.
use std::fmt;

use hifitime::Epoch;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    cometrail_errors::CometrailError,
    constants::{DAYS_PER_CENTURY, GAUSS_GRAV_SQUARED, JD2000, RADEG},
    kepler::solve_elliptic_kepler,
    ref_system::orbital_plane_to_ecliptic,
    time::epoch_to_jd,
};

/// Planets that can act as perturbers or observers.
///
/// `Earth` designates the Earth–Moon barycentre, which is what the mean elements describe and
/// what matters for a comet passing at several lunar distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    pub const ALL: [Body; 8] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// Sun-to-body mass ratio (IAU 2009 / DE430 values).
    pub fn sun_mass_ratio(&self) -> f64 {
        match self {
            Body::Mercury => 6_023_597.4,
            Body::Venus => 408_523.72,
            Body::Earth => 328_900.56,
            Body::Mars => 3_098_703.6,
            Body::Jupiter => 1_047.348_6,
            Body::Saturn => 3_497.901_8,
            Body::Uranus => 22_902.98,
            Body::Neptune => 19_412.26,
        }
    }

    /// Gravitational parameter GM of the body in AU³/day².
    pub fn gm(&self) -> f64 {
        GAUSS_GRAV_SQUARED / self.sun_mass_ratio()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Source of heliocentric planetary positions.
///
/// Implementations must be shareable across threads; the engine only ever calls them through
/// a shared reference.
pub trait EphemerisProvider: Send + Sync {
    /// Heliocentric ecliptic J2000 position of `body` at `epoch`, in AU.
    fn heliocentric_position(
        &self,
        body: Body,
        epoch: &Epoch,
    ) -> Result<Vector3<f64>, CometrailError>;
}

/// Mean elements at J2000 and their rates per Julian century:
/// `[a (AU), e, I (deg), L (deg), ϖ (deg), Ω (deg)]`.
struct MeanElements {
    at_j2000: [f64; 6],
    rate: [f64; 6],
}

fn mean_elements(body: Body) -> MeanElements {
    match body {
        Body::Mercury => MeanElements {
            at_j2000: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
            rate: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
        },
        Body::Venus => MeanElements {
            at_j2000: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
            rate: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
        },
        Body::Earth => MeanElements {
            at_j2000: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
            rate: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
        },
        Body::Mars => MeanElements {
            at_j2000: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
            rate: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
        },
        Body::Jupiter => MeanElements {
            at_j2000: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
            rate: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
        },
        Body::Saturn => MeanElements {
            at_j2000: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
            rate: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
        },
        Body::Uranus => MeanElements {
            at_j2000: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
            rate: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
        },
        Body::Neptune => MeanElements {
            at_j2000: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
            rate: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
        },
    }
}

/// Analytic low-precision ephemeris built from JPL mean orbital elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElementsEphemeris {
    /// Tolerance of the internal elliptic Kepler solve (rad).
    tolerance: f64,
}

impl Default for MeanElementsEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

impl MeanElementsEphemeris {
    /// Julian date range in which the element table is valid (1800-01-01 → 2050-12-31).
    pub const VALID_JD: (f64, f64) = (2_378_496.5, 2_470_171.5);

    pub fn new() -> Self {
        MeanElementsEphemeris { tolerance: 1e-12 }
    }

    /// Heliocentric ecliptic J2000 position from the mean elements at a Julian date.
    ///
    /// No range check is done here; see [`EphemerisProvider::heliocentric_position`].
    pub fn position_at_jd(&self, body: Body, jd: f64) -> Vector3<f64> {
        let t = (jd - JD2000) / DAYS_PER_CENTURY;
        let elem = mean_elements(body);
        let [a, e, incl, mean_lon, peri_lon, node] = std::array::from_fn::<f64, 6, _>(|k| {
            elem.at_j2000[k] + elem.rate[k] * t
        });

        let arg_peri = (peri_lon - node) * RADEG;
        let mean_anomaly = ((mean_lon - peri_lon) * RADEG).rem_euclid(std::f64::consts::TAU);

        let ecc_anomaly = solve_elliptic_kepler(mean_anomaly, e, self.tolerance, 50).anomaly;

        let x_orb = a * (ecc_anomaly.cos() - e);
        let y_orb = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

        orbital_plane_to_ecliptic(incl * RADEG, arg_peri, node * RADEG)
            * Vector3::new(x_orb, y_orb, 0.0)
    }
}

impl EphemerisProvider for MeanElementsEphemeris {
    fn heliocentric_position(
        &self,
        body: Body,
        epoch: &Epoch,
    ) -> Result<Vector3<f64>, CometrailError> {
        let jd = epoch_to_jd(epoch);
        let (start, end) = Self::VALID_JD;
        if !(start..=end).contains(&jd) {
            return Err(CometrailError::EphemerisUnavailable {
                body,
                reason: format!("JD {jd:.1} outside the mean elements validity range"),
            });
        }
        Ok(self.position_at_jd(body, jd))
    }
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;

    #[test]
    fn test_gm_values() {
        assert!((Body::Jupiter.gm() - 2.825345e-7).abs() < 1e-12);
        assert!(Body::Earth.gm() < Body::Jupiter.gm());
        assert_eq!(Body::Saturn.to_string(), "Saturn");
    }

    #[test]
    fn test_planet_distances() {
        let ephem = MeanElementsEphemeris::new();
        let epoch = Epoch::from_gregorian_utc(2025, 10, 29, 0, 0, 0, 0);

        for body in Body::ALL {
            let r = ephem.heliocentric_position(body, &epoch).unwrap().norm();
            let elem = mean_elements(body);
            let (a, e) = (elem.at_j2000[0], elem.at_j2000[1]);
            assert!(
                r >= a * (1.0 - e) - 0.01 && r <= a * (1.0 + e) + 0.01,
                "{body}: r = {r}"
            );
        }
    }

    #[test]
    fn test_earth_at_j2000() {
        // Earth–Moon barycentre on 2000-01-01.5: ~ (-0.177, 0.967, 0.0) AU
        let pos = MeanElementsEphemeris::new().position_at_jd(Body::Earth, JD2000);
        assert!((pos.x + 0.1771).abs() < 0.005);
        assert!((pos.y - 0.9672).abs() < 0.005);
        assert!(pos.z.abs() < 1e-4);
    }

    #[test]
    fn test_out_of_range() {
        let epoch = Epoch::from_gregorian_utc(2100, 1, 1, 0, 0, 0, 0);
        let err = MeanElementsEphemeris::new()
            .heliocentric_position(Body::Jupiter, &epoch)
            .unwrap_err();
        assert!(matches!(
            err,
            CometrailError::EphemerisUnavailable {
                body: Body::Jupiter,
                ..
            }
        ));
    }
}
