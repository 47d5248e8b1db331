//! # Heliocentric force model
//!
//! Accelerations acting on a small body propagated in the heliocentric ecliptic J2000 frame,
//! in AU/day²:
//!
//! - [`gravitational_acceleration`]: point-mass solar gravity.
//! - [`planetary_perturbation`]: third-body attraction of the planets, with the indirect term
//!   that accounts for the acceleration of the Sun itself (the frame is not inertial).
//! - [`non_gravitational_acceleration`]: Marsden–Sekanina outgassing model in the RTN basis.
//!
//! [`ForceModel`] combines the enabled terms into the single acceleration function consumed by
//! the [`integrator`](crate::integrator).
//!
//! Degenerate geometry (zero position, colliding with a planet) never fails: the term falls back
//! to zero and a warning is logged.
use hifitime::Epoch;
use nalgebra::Vector3;
use tracing::warn;

use crate::{
    config::PropagationConfig,
    ephemeris::{Body, EphemerisProvider},
    orbit_type::NonGravParams,
    time::to_iso8601,
};

/// Below this norm a vector is treated as zero.
const DEGENERATE_NORM: f64 = 1e-15;

/// Point-mass solar gravity `-μ·r/|r|³`.
///
/// Returns the zero vector, with a warning, when `|r| = 0`.
pub fn gravitational_acceleration(position: &Vector3<f64>, mu: f64) -> Vector3<f64> {
    let r = position.norm();
    if r < DEGENERATE_NORM {
        warn!("gravitational acceleration requested at the origin, returning zero");
        return Vector3::zeros();
    }
    -mu * position / (r * r * r)
}

/// Third-body perturbation of the listed planets.
///
/// For each body: `GM·[(r_b − r)/|r_b − r|³ − r_b/|r_b|³]`. The second term is the indirect
/// term, the attraction the planet exerts on the Sun.
///
/// Arguments
/// -----------------
/// * `position`: heliocentric position of the comet (AU)
/// * `epoch`: instant at which the planets are evaluated
/// * `provider`: source of the planets' heliocentric positions
/// * `bodies`: perturbing planets
///
/// A planet whose position cannot be obtained is skipped with a warning, and so is a planet
/// coincident with the comet.
pub fn planetary_perturbation(
    position: &Vector3<f64>,
    epoch: &Epoch,
    provider: &dyn EphemerisProvider,
    bodies: &[Body],
) -> Vector3<f64> {
    bodies
        .iter()
        .filter_map(|&body| match provider.heliocentric_position(body, epoch) {
            Ok(body_position) => Some((body, body_position)),
            Err(err) => {
                warn!(
                    %body,
                    epoch = %to_iso8601(epoch),
                    error = %err,
                    "perturbing body skipped"
                );
                None
            }
        })
        .fold(Vector3::zeros(), |acc, (body, body_position)| {
            let relative = body_position - position;
            let d = relative.norm();
            let rb = body_position.norm();
            if d < DEGENERATE_NORM || rb < DEGENERATE_NORM {
                warn!(%body, "degenerate geometry for perturbing body, term skipped");
                return acc;
            }
            acc + body.gm() * (relative / (d * d * d) - body_position / (rb * rb * rb))
        })
}

/// Marsden–Sekanina non-gravitational acceleration `g(r)·(A1·r̂ + A2·t̂ + A3·n̂)`.
///
/// The basis is radial `r̂`, normal `n̂ ∝ r × v` and transverse `t̂ ∝ (r × v) × r`, which lies in
/// the orbital plane, is perpendicular to `r̂` and points along the motion. When the velocity is
/// parallel to the position the plane is undefined and only the radial component is applied.
///
/// Returns zero beyond `cutoff` AU, or at `r = 0` with a warning.
pub fn non_gravitational_acceleration(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    params: &NonGravParams,
    cutoff: f64,
) -> Vector3<f64> {
    let r = position.norm();
    if r > cutoff {
        return Vector3::zeros();
    }
    if r < DEGENERATE_NORM {
        warn!("non-gravitational acceleration requested at the origin, returning zero");
        return Vector3::zeros();
    }

    let g = params.g(r);
    let radial = position / r;

    let normal = position.cross(velocity);
    let n_norm = normal.norm();
    if n_norm < DEGENERATE_NORM {
        return g * params.a1 * radial;
    }
    let normal = normal / n_norm;
    let transverse = normal.cross(&radial);

    g * (params.a1 * radial + params.a2 * transverse + params.a3 * normal)
}

/// Sum of the enabled acceleration terms.
///
/// Solar gravity is always on. Planetary perturbations are on when a provider is attached and
/// the perturber list is not empty; the non-gravitational term when parameters are attached.
///
/// ```rust
/// use cometrail::config::PropagationConfig;
/// use cometrail::ephemeris::MeanElementsEphemeris;
/// use cometrail::forces::ForceModel;
///
/// let config = PropagationConfig::default();
/// let ephem = MeanElementsEphemeris::new();
/// let model = ForceModel::new(&config).with_perturbations(&ephem);
/// assert_eq!(
///     model.term_names(),
///     vec!["solar_gravity", "planetary_perturbation"]
/// );
/// ```
#[derive(Clone)]
pub struct ForceModel<'a> {
    mu: f64,
    provider: Option<&'a dyn EphemerisProvider>,
    perturbers: Vec<Body>,
    non_grav: Option<NonGravParams>,
    non_grav_cutoff: f64,
}

impl<'a> ForceModel<'a> {
    /// Solar gravity only, with `μ`, perturber list and cutoff taken from `config`.
    pub fn new(config: &PropagationConfig) -> Self {
        ForceModel {
            mu: config.mu_sun,
            provider: None,
            perturbers: config.perturbers.clone(),
            non_grav: None,
            non_grav_cutoff: config.non_grav_cutoff_au,
        }
    }

    pub fn with_perturbations(mut self, provider: &'a dyn EphemerisProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Attach a non-gravitational model. `None` leaves the term disabled.
    pub fn with_non_grav(mut self, params: Option<NonGravParams>) -> Self {
        self.non_grav = params;
        self
    }

    pub fn has_perturbations(&self) -> bool {
        self.provider.is_some() && !self.perturbers.is_empty()
    }

    pub fn has_non_grav(&self) -> bool {
        self.non_grav.is_some()
    }

    pub fn perturbers(&self) -> &[Body] {
        &self.perturbers
    }

    /// Names of the enabled terms, in evaluation order.
    pub fn term_names(&self) -> Vec<&'static str> {
        let mut names = vec!["solar_gravity"];
        if self.has_perturbations() {
            names.push("planetary_perturbation");
        }
        if self.has_non_grav() {
            names.push("non_gravitational");
        }
        names
    }

    /// Total acceleration (AU/day²) at a state. Called four times per RK4 step, allocates nothing.
    pub fn total_acceleration(
        &self,
        epoch: &Epoch,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Vector3<f64> {
        let mut total = gravitational_acceleration(position, self.mu);

        if let Some(provider) = self.provider.filter(|_| !self.perturbers.is_empty()) {
            total += planetary_perturbation(position, epoch, provider, &self.perturbers);
        }

        if let Some(params) = &self.non_grav {
            total +=
                non_gravitational_acceleration(position, velocity, params, self.non_grav_cutoff);
        }

        total
    }

    /// Each enabled term separately, for debugging.
    pub fn acceleration_breakdown(
        &self,
        epoch: &Epoch,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Vec<(&'static str, Vector3<f64>)> {
        let mut terms = vec![("solar_gravity", gravitational_acceleration(position, self.mu))];

        if let Some(provider) = self.provider.filter(|_| !self.perturbers.is_empty()) {
            terms.push((
                "planetary_perturbation",
                planetary_perturbation(position, epoch, provider, &self.perturbers),
            ));
        }

        if let Some(params) = &self.non_grav {
            terms.push((
                "non_gravitational",
                non_gravitational_acceleration(position, velocity, params, self.non_grav_cutoff),
            ));
        }

        terms
    }
}
