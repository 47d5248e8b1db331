use hifitime::Epoch;
use nalgebra::Vector3;

use crate::constants::AstronomicalUnit;

/// Heliocentric ecliptic J2000 state of a body.
///
/// Position in AU, velocity in AU/day. `uncertainty` (AU) is attached by the trajectory
/// generator when the state comes out of a propagation; it is `None` for measured states.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub epoch: Epoch,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub uncertainty: Option<AstronomicalUnit>,
}

impl StateVector {
    pub fn new(epoch: Epoch, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector {
            epoch,
            position,
            velocity,
            uncertainty: None,
        }
    }

    /// Heliocentric distance (AU).
    pub fn distance_from_sun(&self) -> AstronomicalUnit {
        self.position.norm()
    }

    /// Specific orbital energy `v²/2 - μ/r` (AU²/day²); positive on escape trajectories.
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.velocity.norm_squared() - mu / self.position.norm()
    }

    /// Specific angular momentum `r × v` (AU²/day).
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }
}

#[cfg(test)]
mod state_vector_test {
    use super::*;
    use crate::constants::GAUSS_GRAV_SQUARED;

    #[test]
    fn test_invariants_of_circular_state() {
        let epoch = Epoch::from_gregorian_utc(2025, 10, 29, 0, 0, 0, 0);
        let k = GAUSS_GRAV_SQUARED.sqrt();
        let state = StateVector::new(epoch, Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, k, 0.0));

        assert_eq!(state.distance_from_sun(), 1.0);
        assert!((state.specific_energy(GAUSS_GRAV_SQUARED) + 0.5 * GAUSS_GRAV_SQUARED).abs() < 1e-18);
        assert_eq!(state.angular_momentum(), Vector3::new(0.0, 0.0, k));
        assert!(state.uncertainty.is_none());
    }
}
