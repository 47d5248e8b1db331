use serde::{Deserialize, Serialize};

use crate::cometrail_errors::CometrailError;

/// Marsden–Sekanina non-gravitational force parameters.
///
/// The acceleration is `g(r) · (A1 r̂ + A2 t̂ + A3 n̂)` with
/// `g(r) = (r/r0)^-m · (1 + (r/r0)^n)^-k`.
///
/// "No model" is expressed by `Option<NonGravParams>::None` at the call sites, never by zero
/// coefficients: a `NonGravParams` with `A1 = A2 = A3 = 0` is a model that was fitted and found
/// to produce no measurable force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NonGravParams {
    /// Radial coefficient (AU/day²).
    pub a1: f64,
    /// Transverse coefficient (AU/day²).
    pub a2: f64,
    /// Normal coefficient (AU/day²).
    pub a3: f64,
    /// Scale distance (AU).
    pub r0: f64,
    pub m: f64,
    pub n: f64,
    pub k: f64,
}

impl NonGravParams {
    /// Standard water-ice sublimation law (Marsden, Sekanina & Yeomans 1973).
    pub fn water_ice(a1: f64, a2: f64, a3: f64) -> Self {
        NonGravParams {
            a1,
            a2,
            a3,
            r0: 2.808,
            m: 2.15,
            n: 5.093,
            k: 4.6142,
        }
    }

    /// Check that every coefficient is finite and that `r0 > 0`.
    pub fn validate(&self) -> Result<(), CometrailError> {
        let finite = [
            ("a1", self.a1),
            ("a2", self.a2),
            ("a3", self.a3),
            ("m", self.m),
            ("n", self.n),
            ("k", self.k),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return Err(CometrailError::InvalidNonGravParams(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if !self.r0.is_finite() || self.r0 <= 0.0 {
            return Err(CometrailError::InvalidNonGravParams(format!(
                "r0 must be finite and positive, got {}",
                self.r0
            )));
        }
        Ok(())
    }

    /// Distance scaling function `g(r)`.
    ///
    /// Requires `r0 > 0` (see [`validate`](Self::validate)); a negative `r0` gives NaN.
    pub fn g(&self, r: f64) -> f64 {
        let ratio = r / self.r0;
        ratio.powf(-self.m) * (1.0 + ratio.powf(self.n)).powf(-self.k)
    }
}

#[cfg(test)]
mod non_grav_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_g_at_r0() {
        let params = NonGravParams::water_ice(1e-8, 0.0, 0.0);
        assert_relative_eq!(params.g(params.r0), 2f64.powf(-params.k), epsilon = 1e-15);
    }

    #[test]
    fn test_g_unnormalized_at_one_au() {
        // without the α = 0.1113 normalisation factor, g(1 AU) = 1/α
        let params = NonGravParams::water_ice(0.0, 0.0, 0.0);
        assert_relative_eq!(params.g(1.0), 8.98779, epsilon = 1e-4);
        assert!(params.g(5.0) < 1e-6);
    }

    #[test]
    fn test_validate() {
        assert!(NonGravParams::water_ice(1e-8, 1e-9, 0.0).validate().is_ok());

        for r0 in [0.0, -2.808, f64::NAN] {
            let params = NonGravParams {
                r0,
                ..NonGravParams::water_ice(1e-8, 0.0, 0.0)
            };
            assert!(matches!(
                params.validate(),
                Err(CometrailError::InvalidNonGravParams(_))
            ));
        }

        let params = NonGravParams::water_ice(f64::INFINITY, 0.0, 0.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_g_decreasing() {
        let params = NonGravParams::water_ice(0.0, 0.0, 0.0);
        let samples: Vec<f64> = (1..20).map(|k| params.g(0.25 * k as f64)).collect();
        assert!(samples.windows(2).all(|w| w[1] < w[0]));
    }
}
