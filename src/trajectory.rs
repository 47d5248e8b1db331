//! # Trajectory generation
//!
//! [`TrajectoryGenerator`] turns a state vector or an element set into ordered
//! [`TrajectoryPoint`] sequences ready for display:
//!
//! * **State-vector mode**: [`trail`](TrajectoryGenerator::trail) (backward) and
//!   [`projection`](TrajectoryGenerator::projection) (forward) integrate the full force model with
//!   RK4, then keep one point every `output_spacing_days`.
//! * **Elements mode**: [`orbit_overlay`](TrajectoryGenerator::orbit_overlay) samples the
//!   closed-form conic symmetrically around perihelion, over a span chosen from the eccentricity;
//!   [`kepler_track`](TrajectoryGenerator::kepler_track) samples it from an arbitrary date.
//!
//! Every point carries a random-walk position uncertainty `sqrt(rate²·|Δt|)`, with a smaller
//! rate for the past than for the future. Sequences are cut at the visualization cutoff, and the
//! integration itself at the hard stop, so escaping orbits always yield bounded output.
//!
//! ## Example
//!
//! ```rust
//! use cometrail::{catalog, config::PropagationConfig, ephemeris::MeanElementsEphemeris};
//! use cometrail::trajectory::TrajectoryGenerator;
//!
//! let config = PropagationConfig::default();
//! let ephem = MeanElementsEphemeris::new();
//! let generator = TrajectoryGenerator::new(&config, &ephem).unwrap();
//!
//! let atlas = catalog::atlas_3i();
//! let now = atlas.perihelion_time.unwrap();
//! let state = atlas.state_at(&now, &config).unwrap();
//!
//! let trail = generator.trail(&state, 30.0, None).unwrap();
//! assert_eq!(trail.len(), 30);
//! assert!(trail.windows(2).all(|w| w[1].date < w[0].date));
//! ```
use hifitime::Epoch;
use nalgebra::Vector3;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{
    cometrail_errors::CometrailError,
    config::PropagationConfig,
    constants::{AstronomicalUnit, Kilometer, AU},
    ephemeris::{Body, EphemerisProvider},
    forces::ForceModel,
    integrator::{self, Integrator, RungeKutta4},
    kepler::position_at,
    orbit_type::{NonGravParams, OrbitFamily, OrbitalElements, StateVector},
    ref_system::{cartesian_to_radec, ecliptic_to_equatorial, heliocentric_to_geocentric, RaDec},
    time::{add_days, days_between, to_iso8601},
};

/// Longest half-span of an elliptic overlay (days, about five years).
pub const MAX_ELLIPTIC_HALF_SPAN_DAYS: f64 = 1826.0;

/// Half-span of the overlay of a near-parabolic orbit (days).
pub const NEAR_PARABOLIC_HALF_SPAN_DAYS: f64 = 1000.0;

/// Half-span of the overlay of a strongly hyperbolic orbit (days).
pub const HYPERBOLIC_HALF_SPAN_DAYS: f64 = 500.0;

fn serialize_epoch<S: Serializer>(epoch: &Epoch, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso8601(epoch))
}

/// One output sample of a trajectory, heliocentric ecliptic J2000.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    /// Serialized as an ISO-8601 UTC string.
    #[serde(serialize_with = "serialize_epoch")]
    pub date: Epoch,
    pub x: AstronomicalUnit,
    pub y: AstronomicalUnit,
    pub z: AstronomicalUnit,
    pub distance_from_sun: AstronomicalUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<AstronomicalUnit>,
}

impl TrajectoryPoint {
    pub fn new(date: Epoch, position: &Vector3<f64>, uncertainty: Option<AstronomicalUnit>) -> Self {
        TrajectoryPoint {
            date,
            x: position.x,
            y: position.y,
            z: position.z,
            distance_from_sun: position.norm(),
            uncertainty,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<&StateVector> for TrajectoryPoint {
    fn from(state: &StateVector) -> Self {
        TrajectoryPoint::new(state.epoch, &state.position, state.uncertainty)
    }
}

/// Description of how a trajectory was computed, for display and debugging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropagationMetadata {
    pub integrator: &'static str,
    pub order: u8,
    pub step_days: f64,
    pub planetary_perturbations: bool,
    pub non_gravitational: bool,
    pub perturbers: Vec<Body>,
    /// Random-walk uncertainty accumulated over one forward step (km). Indicative only.
    pub nominal_accuracy_km: Kilometer,
}

/// Random-walk position uncertainty after `dt_days` (AU).
///
/// The trail rate applies to the past (`dt_days < 0`), the projection rate otherwise.
pub fn random_walk_uncertainty(dt_days: f64, config: &PropagationConfig) -> AstronomicalUnit {
    let rate = if dt_days < 0.0 {
        config.trail_uncertainty_rate_km
    } else {
        config.projection_uncertainty_rate_km
    };
    (rate * rate * dt_days.abs()).sqrt() / AU
}

/// Half-width (days) of the window sampled around perihelion for an orbit overlay.
///
/// Half a period, at most [`MAX_ELLIPTIC_HALF_SPAN_DAYS`], for ellipses with `e < 0.9`;
/// [`NEAR_PARABOLIC_HALF_SPAN_DAYS`] for `0.9 ≤ e < 1.5`; [`HYPERBOLIC_HALF_SPAN_DAYS`] beyond.
pub fn overlay_half_span_days(elements: &OrbitalElements, mu: f64) -> f64 {
    let family = elements.family();
    match family {
        OrbitFamily::Elliptic { .. } if elements.eccentricity < 0.9 => family
            .period(mu)
            .map_or(MAX_ELLIPTIC_HALF_SPAN_DAYS, |p| {
                (p / 2.0).min(MAX_ELLIPTIC_HALF_SPAN_DAYS)
            }),
        _ if elements.eccentricity < 1.5 => NEAR_PARABOLIC_HALF_SPAN_DAYS,
        _ => HYPERBOLIC_HALF_SPAN_DAYS,
    }
}

/// Keep every `stride`-th state, and always the last one.
fn downsample(states: Vec<StateVector>, stride: usize) -> Vec<StateVector> {
    let last = states.len().saturating_sub(1);
    states
        .into_iter()
        .enumerate()
        .filter(|(i, _)| (i + 1) % stride == 0 || *i == last)
        .map(|(_, s)| s)
        .collect()
}

/// Cut an ordered sequence before its first point beyond `cutoff_au`.
fn truncate_at_cutoff(mut points: Vec<TrajectoryPoint>, cutoff_au: f64) -> Vec<TrajectoryPoint> {
    if let Some(idx) = points
        .iter()
        .position(|p| p.distance_from_sun > cutoff_au)
    {
        debug!(
            kept = idx,
            dropped = points.len() - idx,
            cutoff_au,
            "trajectory truncated at visualization cutoff"
        );
        points.truncate(idx);
    }
    points
}

/// Entry point of the engine: owns nothing, borrows a configuration and an ephemeris provider.
///
/// Cheap to build and `Sync`, so one generator can be shared by several threads.
#[derive(Clone)]
pub struct TrajectoryGenerator<'a> {
    config: &'a PropagationConfig,
    provider: &'a dyn EphemerisProvider,
    integrator: RungeKutta4,
    perturbations: bool,
}

impl<'a> TrajectoryGenerator<'a> {
    /// Build a generator after validating `config`.
    ///
    /// Planetary perturbations are enabled when `config.perturbers` is not empty.
    pub fn new(
        config: &'a PropagationConfig,
        provider: &'a dyn EphemerisProvider,
    ) -> Result<Self, CometrailError> {
        config.validate()?;
        Ok(TrajectoryGenerator {
            config,
            provider,
            integrator: RungeKutta4,
            perturbations: !config.perturbers.is_empty(),
        })
    }

    /// Same generator with solar gravity (and optional outgassing) only. The provider is still
    /// used for sky positions.
    pub fn without_perturbations(mut self) -> Self {
        self.perturbations = false;
        self
    }

    pub fn config(&self) -> &PropagationConfig {
        self.config
    }

    /// Force model for one run.
    pub fn force_model(&self, non_grav: Option<NonGravParams>) -> ForceModel<'a> {
        let model = ForceModel::new(self.config).with_non_grav(non_grav);
        if self.perturbations {
            model.with_perturbations(self.provider)
        } else {
            model
        }
    }

    /// Dense RK4 propagation at the configured step, hard stop included.
    ///
    /// Fails with [`CometrailError::InvalidNonGravParams`] before integrating when the
    /// non-gravitational model is malformed.
    pub fn propagate(
        &self,
        initial: &StateVector,
        duration: f64,
        non_grav: Option<NonGravParams>,
    ) -> Result<Vec<StateVector>, CometrailError> {
        if let Some(params) = &non_grav {
            params.validate()?;
        }
        let model = self.force_model(non_grav);
        let acceleration = |t: &Epoch, r: &Vector3<f64>, v: &Vector3<f64>| {
            model.total_acceleration(t, r, v)
        };
        integrator::propagate(
            &self.integrator,
            initial,
            duration,
            self.config.step_days,
            &acceleration,
            self.config.hard_stop_au,
        )
    }

    /// State-vector mode: propagate over the signed `duration`, down-sample to the output
    /// spacing, attach uncertainties and cut at the visualization cutoff.
    pub fn from_state(
        &self,
        current: &StateVector,
        duration: f64,
        non_grav: Option<NonGravParams>,
    ) -> Result<Vec<TrajectoryPoint>, CometrailError> {
        let dense = self.propagate(current, duration, non_grav)?;

        let stride = (self.config.output_spacing_days / self.config.step_days)
            .round()
            .max(1.0) as usize;

        let points = downsample(dense, stride)
            .into_iter()
            .map(|mut state| {
                let dt = days_between(&current.epoch, &state.epoch);
                state.uncertainty = Some(random_walk_uncertainty(dt, self.config));
                TrajectoryPoint::from(&state)
            })
            .collect();

        Ok(truncate_at_cutoff(points, self.config.visualization_cutoff_au))
    }

    /// Past positions over the last `days` days, most recent first.
    pub fn trail(
        &self,
        current: &StateVector,
        days: f64,
        non_grav: Option<NonGravParams>,
    ) -> Result<Vec<TrajectoryPoint>, CometrailError> {
        self.from_state(current, -days.abs(), non_grav)
    }

    /// Future positions over the next `days` days.
    pub fn projection(
        &self,
        current: &StateVector,
        days: f64,
        non_grav: Option<NonGravParams>,
    ) -> Result<Vec<TrajectoryPoint>, CometrailError> {
        self.from_state(current, days.abs(), non_grav)
    }

    /// Elements mode: the conic sampled every `output_spacing_days`, symmetric around
    /// perihelion, over [`overlay_half_span_days`] on each side.
    ///
    /// Uncertainties are measured from perihelion. Each leg stops at its first sample beyond the
    /// visualization cutoff. Empty when the perihelion time is unknown.
    ///
    /// Errors
    /// ----------
    /// * [`CometrailError::InvalidStepSize`] when the spacing would need more than
    ///   [`integrator::MAX_STEPS`] samples.
    pub fn orbit_overlay(
        &self,
        elements: &OrbitalElements,
    ) -> Result<Vec<TrajectoryPoint>, CometrailError> {
        let Some(perihelion_time) = elements.perihelion_time else {
            debug!("orbit overlay requested without perihelion time");
            return Ok(Vec::new());
        };

        let half_span = overlay_half_span_days(elements, self.config.mu_sun);
        integrator::step_count(2.0 * half_span, self.config.output_spacing_days)?;
        let half_count = (half_span / self.config.output_spacing_days).ceil().max(1.0) as i64;
        let spacing = half_span / half_count as f64;

        let leg = |direction: i64| {
            (0..=half_count)
                .skip(usize::from(direction < 0))
                .map_while(move |k| {
                    let dt = (direction * k) as f64 * spacing;
                    let date = add_days(&perihelion_time, dt);
                    position_at(elements, &date, self.config)
                        .filter(|kepler| kepler.distance <= self.config.visualization_cutoff_au)
                        .map(|kepler| {
                            TrajectoryPoint::new(
                                date,
                                &kepler.position,
                                Some(random_walk_uncertainty(dt, self.config)),
                            )
                        })
                })
                .collect::<Vec<_>>()
        };

        let mut overlay = leg(-1);
        overlay.reverse();
        overlay.extend(leg(1));
        Ok(overlay)
    }

    /// Conic sampled from `start` over the signed `duration`, every `spacing` days.
    ///
    /// Same ordering, truncation and uncertainty rules as [`from_state`](Self::from_state); the
    /// start itself is not included and sampling stops at the first point beyond the
    /// visualization cutoff. Empty when the perihelion time is unknown.
    pub fn kepler_track(
        &self,
        elements: &OrbitalElements,
        start: &Epoch,
        duration: f64,
        spacing: f64,
    ) -> Result<Vec<TrajectoryPoint>, CometrailError> {
        let n_points = integrator::step_count(duration, spacing)?;
        if elements.perihelion_time.is_none() {
            debug!("Kepler track requested without perihelion time");
            return Ok(Vec::new());
        }
        let h = spacing.abs().copysign(duration);
        let cutoff = self.config.visualization_cutoff_au;

        let mut points = Vec::with_capacity(n_points.min(integrator::PREALLOCATED_STATES));
        for k in 1..=n_points {
            let dt = if k == n_points { duration } else { k as f64 * h };
            let date = add_days(start, dt);
            let Some(kepler) = position_at(elements, &date, self.config) else {
                break;
            };
            if kepler.distance > cutoff {
                debug!(
                    kept = points.len(),
                    cutoff_au = cutoff,
                    "Kepler track reached visualization cutoff"
                );
                break;
            }
            points.push(TrajectoryPoint::new(
                date,
                &kepler.position,
                Some(random_walk_uncertainty(dt, self.config)),
            ));
        }

        Ok(points)
    }

    /// Geocentric equatorial RA/Dec of a heliocentric ecliptic position.
    ///
    /// Errors
    /// ----------
    /// * [`CometrailError::EphemerisUnavailable`] when Earth's position cannot be obtained.
    pub fn sky_position(
        &self,
        heliocentric: &Vector3<f64>,
        epoch: &Epoch,
    ) -> Result<RaDec, CometrailError> {
        let earth = self.provider.heliocentric_position(Body::Earth, epoch)?;
        let geocentric = heliocentric_to_geocentric(heliocentric, &earth);
        Ok(cartesian_to_radec(&ecliptic_to_equatorial(&geocentric)))
    }

    /// RA/Dec of every point of a trajectory.
    pub fn sky_track(
        &self,
        points: &[TrajectoryPoint],
    ) -> Result<Vec<(Epoch, RaDec)>, CometrailError> {
        points
            .iter()
            .map(|p| {
                self.sky_position(&p.position(), &p.date)
                    .map(|radec| (p.date, radec))
            })
            .collect()
    }

    /// Metadata of a state-vector run with the given non-gravitational model.
    pub fn metadata(&self, non_grav: Option<&NonGravParams>) -> PropagationMetadata {
        let model = self.force_model(non_grav.copied());
        PropagationMetadata {
            integrator: self.integrator.name(),
            order: self.integrator.order(),
            step_days: self.config.step_days,
            planetary_perturbations: model.has_perturbations(),
            non_gravitational: model.has_non_grav(),
            perturbers: if model.has_perturbations() {
                model.perturbers().to_vec()
            } else {
                Vec::new()
            },
            nominal_accuracy_km: self.config.projection_uncertainty_rate_km
                * self.config.step_days.sqrt(),
        }
    }
}
