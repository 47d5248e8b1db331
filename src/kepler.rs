//! # Closed-form two-body motion
//!
//! Position and velocity of a body on a fixed conic, from its [`OrbitalElements`] and a date.
//! The anomaly equation depends on the [`OrbitFamily`]:
//!
//! | family     | equation                 | solver                         |
//! |------------|--------------------------|--------------------------------|
//! | elliptic   | `E - e sin E = M`        | Newton-Raphson                 |
//! | parabolic  | `s + s³/3 = W`           | Cardano (closed form)          |
//! | hyperbolic | `e sinh H - H = M`       | Newton-Raphson                 |
//!
//! The Newton solvers stop when the increment falls below the configured tolerance or when
//! the iteration cap is reached; in the latter case the last iterate is returned as the best
//! available estimate and the non-convergence is only logged.
//!
//! The perifocal position `(r cos ν, r sin ν, 0)` is taken to ecliptic J2000 with the combined
//! rotation [`orbital_plane_to_ecliptic`](crate::ref_system::orbital_plane_to_ecliptic).
use std::f64::consts::PI;

use hifitime::Epoch;
use nalgebra::Vector3;
use tracing::debug;

use crate::{
    cometrail_errors::CometrailError,
    config::PropagationConfig,
    constants::{Radian, DPI},
    orbit_type::{OrbitFamily, OrbitalElements, StateVector},
    time::days_between,
};

/// Outcome of an iterative anomaly solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric (E) or hyperbolic (H) anomaly, radians.
    pub anomaly: Radian,
    pub iterations: usize,
    pub converged: bool,
}

/// Position and velocity on the conic at a given date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerPosition {
    /// Heliocentric ecliptic J2000 position (AU).
    pub position: Vector3<f64>,
    /// Heliocentric ecliptic J2000 velocity (AU/day).
    pub velocity: Vector3<f64>,
    /// True anomaly ν (rad).
    pub true_anomaly: Radian,
    /// Heliocentric distance (AU).
    pub distance: f64,
    /// Signed time since perihelion (days).
    pub days_from_perihelion: f64,
}

/// Retourne la valeur principale d'un angle dans [-π, π).
///
/// Un angle déjà dans l'intervalle est rendu tel quel, sans perte de précision.
fn principal_angle(a: f64) -> f64 {
    if (-PI..PI).contains(&a) {
        a
    } else {
        (a + PI).rem_euclid(DPI) - PI
    }
}

/// Solve the elliptic Kepler equation `E - e·sin(E) = M` for `E`.
///
/// The mean anomaly is first reduced to [-π, π); a value already in range is used as is, which
/// keeps the tiny mean anomalies of near-parabolic ellipses exact. Initial guess
/// `E₀ = M + e·sin(M)·(1 + e·cos(M))`.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: `M` (rad), any value
/// * `eccentricity`: `e` in [0, 1)
/// * `tolerance`: stop when `|ΔE| < tolerance`
/// * `max_iterations`: iteration cap
///
/// Return
/// ------
/// * the eccentric anomaly consistent with the reduced `M`, with convergence information
pub fn solve_elliptic_kepler(
    mean_anomaly: f64,
    eccentricity: f64,
    tolerance: f64,
    max_iterations: usize,
) -> KeplerSolution {
    let m = principal_angle(mean_anomaly);
    let e = eccentricity;

    let mut ecc_anomaly = m + e * m.sin() * (1.0 + e * m.cos());

    for iteration in 1..=max_iterations {
        let delta = (ecc_anomaly - e * ecc_anomaly.sin() - m) / (1.0 - e * ecc_anomaly.cos());
        ecc_anomaly -= delta;
        if delta.abs() < tolerance {
            return KeplerSolution {
                anomaly: ecc_anomaly,
                iterations: iteration,
                converged: true,
            };
        }
    }

    debug!(
        mean_anomaly = m,
        eccentricity = e,
        "elliptic Kepler equation did not converge, keeping last iterate"
    );
    KeplerSolution {
        anomaly: ecc_anomaly,
        iterations: max_iterations,
        converged: false,
    }
}

/// Solve the hyperbolic Kepler equation `e·sinh(H) - H = M` for `H`.
///
/// The start point `H₀ = sign(M)·asinh(|M| / (e - 1))` is log-based
/// (`asinh x = ln(x + sqrt(x² + 1))`) and bounds the root from above, so the iterates decrease
/// monotonically on this convex function and never overflow `sinh`.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: hyperbolic mean anomaly `M` (rad)
/// * `eccentricity`: `e` > 1
/// * `tolerance`: stop when `|ΔH| < tolerance`
/// * `max_iterations`: iteration cap
pub fn solve_hyperbolic_kepler(
    mean_anomaly: f64,
    eccentricity: f64,
    tolerance: f64,
    max_iterations: usize,
) -> KeplerSolution {
    let m = mean_anomaly;
    let e = eccentricity;

    let mut hyp_anomaly = m.signum() * (m.abs() / (e - 1.0)).asinh();
    if m == 0.0 {
        hyp_anomaly = 0.0;
    }

    for iteration in 1..=max_iterations {
        let delta =
            (e * hyp_anomaly.sinh() - hyp_anomaly - m) / (e * hyp_anomaly.cosh() - 1.0);
        hyp_anomaly -= delta;
        if delta.abs() < tolerance {
            return KeplerSolution {
                anomaly: hyp_anomaly,
                iterations: iteration,
                converged: true,
            };
        }
    }

    debug!(
        mean_anomaly = m,
        eccentricity = e,
        "hyperbolic Kepler equation did not converge, keeping last iterate"
    );
    KeplerSolution {
        anomaly: hyp_anomaly,
        iterations: max_iterations,
        converged: false,
    }
}

/// Solve Barker's equation `s + s³/3 = W` for `s = tan(ν/2)`.
///
/// Closed form from Cardano: with `y = cbrt(3W/2 + sqrt(9W²/4 + 1))`, `s = y - 1/y`.
/// Evaluated on `|W|` and signed afterwards, which avoids the cancellation of the second cube
/// root for negative `W`.
pub fn solve_barker(w: f64) -> f64 {
    let half = 1.5 * w.abs();
    let y = (half + (half * half + 1.0).sqrt()).cbrt();
    w.signum() * (y - 1.0 / y)
}

/// True anomaly from the eccentric anomaly (elliptic orbits).
///
/// Half-angle relation `tan(ν/2) = sqrt((1+e)/(1-e))·tan(E/2)`, written with `atan2` so that
/// `E = ±π` (aphelion) stays finite.
fn elliptic_true_anomaly(ecc_anomaly: f64, e: f64) -> Radian {
    let half = ecc_anomaly / 2.0;
    2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos())
}

/// True anomaly from the hyperbolic anomaly: `ν = 2·atan(sqrt((e+1)/(e-1))·tanh(H/2))`.
fn hyperbolic_true_anomaly(hyp_anomaly: f64, e: f64) -> Radian {
    2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (hyp_anomaly / 2.0).tanh()).atan()
}

/// True anomaly at `days_from_perihelion` for the given orbit.
pub fn true_anomaly(
    elements: &OrbitalElements,
    days_from_perihelion: f64,
    config: &PropagationConfig,
) -> Radian {
    let family = elements.family();
    let e = elements.eccentricity;
    let mean_anomaly =
        family.mean_motion(config.mu_sun, elements.perihelion_distance) * days_from_perihelion;

    match family {
        OrbitFamily::Elliptic { .. } => {
            let sol = solve_elliptic_kepler(
                mean_anomaly,
                e,
                config.kepler_tolerance,
                config.kepler_max_iterations,
            );
            elliptic_true_anomaly(sol.anomaly, e)
        }
        OrbitFamily::Parabolic => 2.0 * solve_barker(mean_anomaly).atan(),
        OrbitFamily::Hyperbolic { .. } => {
            let sol = solve_hyperbolic_kepler(
                mean_anomaly,
                e,
                config.kepler_tolerance,
                config.kepler_max_iterations,
            );
            hyperbolic_true_anomaly(sol.anomaly, e)
        }
    }
}

/// Heliocentric ecliptic J2000 position and velocity of a body on its conic at `date`.
///
/// Steps: days from perihelion → mean anomaly → anomaly equation of the orbit family → true
/// anomaly `ν` → radius `r = q(1+e)/(1+e·cos ν)` → perifocal position and velocity → combined
/// rotation to the ecliptic.
///
/// Arguments
/// -----------------
/// * `elements`: the orbit
/// * `date`: evaluation instant
/// * `config`: supplies `μ`, the Newton tolerance and iteration cap
///
/// Return
/// ----------
/// * `None` when the perihelion time of `elements` is unknown; the position is never guessed.
pub fn position_at(
    elements: &OrbitalElements,
    date: &Epoch,
    config: &PropagationConfig,
) -> Option<KeplerPosition> {
    let perihelion_time = elements.perihelion_time?;
    let days_from_perihelion = days_between(&perihelion_time, date);

    let e = elements.eccentricity;
    let p = elements.semi_latus_rectum();
    let nu = true_anomaly(elements, days_from_perihelion, config);
    let (sin_nu, cos_nu) = nu.sin_cos();

    let distance = p / (1.0 + e * cos_nu);
    let perifocal_position = Vector3::new(distance * cos_nu, distance * sin_nu, 0.0);
    let perifocal_velocity =
        (config.mu_sun / p).sqrt() * Vector3::new(-sin_nu, e + cos_nu, 0.0);

    let rotation = elements.orbital_plane_rotation();

    Some(KeplerPosition {
        position: rotation * perifocal_position,
        velocity: rotation * perifocal_velocity,
        true_anomaly: nu,
        distance,
        days_from_perihelion,
    })
}

impl OrbitalElements {
    /// State vector of the body at `date`, e.g. to seed a numerical propagation.
    ///
    /// Errors
    /// ----------
    /// * [`CometrailError::MissingPerihelionTime`] if the perihelion time is unknown.
    pub fn state_at(
        &self,
        date: &Epoch,
        config: &PropagationConfig,
    ) -> Result<StateVector, CometrailError> {
        let kepler = position_at(self, date, config).ok_or(CometrailError::MissingPerihelionTime)?;
        Ok(StateVector::new(*date, kepler.position, kepler.velocity))
    }
}
