//! Fixed-step numerical integration of heliocentric state vectors.
//!
//! The [`Integrator`] trait abstracts a single step so that another scheme (an adaptive
//! embedded pair, for instance) can be dropped in behind [`propagate`]. The only implementation
//! shipped is the classical four-stage [`RungeKutta4`].
//!
//! Backward propagation is a negative step; there is no separate backward algorithm.
use hifitime::Epoch;
use nalgebra::Vector3;
use tracing::{debug, trace};

use crate::{
    cometrail_errors::CometrailError, orbit_type::StateVector, time::add_days,
};

/// Acceleration (AU/day²) as a function of epoch, position and velocity.
pub type AccelerationFn<'a> =
    dyn Fn(&Epoch, &Vector3<f64>, &Vector3<f64>) -> Vector3<f64> + 'a;

/// Relative slack when converting `|duration| / |step|` to a step count.
const STEP_COUNT_TOLERANCE: f64 = 1e-9;

/// Upper bound on the number of steps of one propagation.
pub const MAX_STEPS: usize = 10_000_000;

/// Initial reservation of an output buffer; longer runs grow it as they go.
pub(crate) const PREALLOCATED_STATES: usize = 4096;

/// Single-step integration scheme.
pub trait Integrator: Send + Sync {
    /// Advance `state` by `dt` days (negative for a backward step).
    fn step(&self, state: &StateVector, dt: f64, acceleration: &AccelerationFn<'_>) -> StateVector;

    fn name(&self) -> &'static str;

    /// Global order of accuracy.
    fn order(&self) -> u8;

    /// Acceleration evaluations per step.
    fn stages(&self) -> usize;
}

/// Classical fourth-order Runge-Kutta.
///
/// Stages at `t`, twice at `t + dt/2` and at `t + dt`, combined with the weights
/// `(k1 + 2k2 + 2k3 + k4)/6` for both the position and the velocity increments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RungeKutta4;

impl Integrator for RungeKutta4 {
    fn step(&self, state: &StateVector, dt: f64, acceleration: &AccelerationFn<'_>) -> StateVector {
        let half = dt / 2.0;
        let t0 = state.epoch;
        let t_half = add_days(&t0, half);
        let t1 = add_days(&t0, dt);
        let (r, v) = (state.position, state.velocity);

        let a1 = acceleration(&t0, &r, &v);

        let v2 = v + a1 * half;
        let a2 = acceleration(&t_half, &(r + v * half), &v2);

        let v3 = v + a2 * half;
        let a3 = acceleration(&t_half, &(r + v2 * half), &v3);

        let v4 = v + a3 * dt;
        let a4 = acceleration(&t1, &(r + v3 * dt), &v4);

        let position = r + (v + 2.0 * v2 + 2.0 * v3 + v4) * (dt / 6.0);
        let velocity = v + (a1 + 2.0 * a2 + 2.0 * a3 + a4) * (dt / 6.0);

        StateVector::new(t1, position, velocity)
    }

    fn name(&self) -> &'static str {
        "RK4"
    }

    fn order(&self) -> u8 {
        4
    }

    fn stages(&self) -> usize {
        4
    }
}

/// Number of steps needed to cover `duration` with `step`, both in days.
///
/// Validates the inputs: the step must be finite and non-zero, the duration finite.
pub fn step_count(duration: f64, step: f64) -> Result<usize, CometrailError> {
    if !step.is_finite() || step == 0.0 {
        return Err(CometrailError::InvalidStepSize(step));
    }
    if !duration.is_finite() {
        return Err(CometrailError::InvalidDuration(duration));
    }

    let ratio = duration.abs() / step.abs();
    let count = (ratio - STEP_COUNT_TOLERANCE).ceil().max(0.0);
    if count > MAX_STEPS as f64 {
        return Err(CometrailError::InvalidStepSize(step));
    }
    Ok(count as usize)
}

/// Propagate `initial` over `duration` days and return the dense trajectory.
///
/// The magnitude of `step` is used with the sign of `duration`, so a trail is obtained with a
/// negative duration whatever the sign the caller gave to the step. A shorter final step ends
/// the trajectory exactly at `t0 + duration`.
///
/// Arguments
/// -----------------
/// * `integrator`: stepping scheme
/// * `initial`: starting state, not included in the output
/// * `duration`: signed span in days
/// * `step`: step size in days, non-zero
/// * `acceleration`: force model
/// * `hard_stop_au`: integration ends after the first state farther than this from the Sun
///
/// Return
/// ----------
/// * States ordered by integration direction, point `k` stamped `t0 + k·h`. Empty for a zero
///   duration.
///
/// Errors
/// ----------
/// * [`CometrailError::InvalidStepSize`] for a zero, non-finite or vanishingly small step.
/// * [`CometrailError::InvalidDuration`] for a non-finite duration.
pub fn propagate(
    integrator: &dyn Integrator,
    initial: &StateVector,
    duration: f64,
    step: f64,
    acceleration: &AccelerationFn<'_>,
    hard_stop_au: f64,
) -> Result<Vec<StateVector>, CometrailError> {
    let n_steps = step_count(duration, step)?;
    let h = step.abs().copysign(duration);
    let t0 = initial.epoch;

    let mut states = Vec::with_capacity(n_steps.min(PREALLOCATED_STATES));
    let mut current = initial.clone();

    for k in 1..=n_steps {
        let (dt, epoch) = if k == n_steps {
            (duration - (k - 1) as f64 * h, add_days(&t0, duration))
        } else {
            (h, add_days(&t0, k as f64 * h))
        };

        let mut next = integrator.step(&current, dt, acceleration);
        next.epoch = epoch;

        let r = next.distance_from_sun();
        states.push(next.clone());

        if !r.is_finite() || r > hard_stop_au {
            debug!(
                step = k,
                of = n_steps,
                distance_au = r,
                "hard stop reached, integration ended early"
            );
            break;
        }
        current = next;
    }

    trace!(
        integrator = integrator.name(),
        points = states.len(),
        duration,
        step = h,
        "propagation done"
    );
    Ok(states)
}
