//! # Propagation configuration
//!
//! [`PropagationConfig`] gathers every tunable of the propagation engine in one immutable
//! record: the solar gravitational parameter, integration and output step sizes, the distance
//! cutoffs, the random-walk uncertainty rates, the Kepler solver convergence controls and the
//! list of perturbing planets.
//!
//! A configuration is passed by reference to each operation. Two objects can therefore be
//! propagated concurrently with different settings without any shared state.
//!
//! ## Loading from TOML
//!
//! Every field has a default, so a file only needs to list what it overrides:
//!
//! ```rust
//! use cometrail::config::PropagationConfig;
//!
//! let cfg = PropagationConfig::from_toml_str(
//!     r#"
//!     step_days = 0.1
//!     perturbers = ["Jupiter", "Saturn", "Earth", "Mars"]
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(cfg.step_days, 0.1);
//! assert_eq!(cfg.visualization_cutoff_au, 50.0);
//! ```
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    cometrail_errors::CometrailError,
    constants::{AstronomicalUnit, Kilometer, GAUSS_GRAV_SQUARED},
    ephemeris::Body,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Gravitational parameter of the Sun (AU³/day²).
    pub mu_sun: f64,

    /// Default RK4 step (days). 0.1–0.5 day suits cometary dynamics.
    pub step_days: f64,

    /// Spacing of the down-sampled trail/projection points (days).
    pub output_spacing_days: f64,

    /// Output is truncated once the heliocentric distance exceeds this value.
    pub visualization_cutoff_au: AstronomicalUnit,

    /// Integration stops once the heliocentric distance exceeds this value.
    pub hard_stop_au: AstronomicalUnit,

    /// Outgassing is ignored beyond this heliocentric distance.
    pub non_grav_cutoff_au: AstronomicalUnit,

    /// Random-walk rate for backward propagation (km per √day).
    pub trail_uncertainty_rate_km: Kilometer,

    /// Random-walk rate for forward propagation (km per √day).
    pub projection_uncertainty_rate_km: Kilometer,

    /// Newton-Raphson stop criterion on the anomaly increment (rad).
    pub kepler_tolerance: f64,

    /// Newton-Raphson iteration cap; the last iterate is returned when reached.
    pub kepler_max_iterations: usize,

    /// Planets whose third-body perturbation is applied.
    pub perturbers: Vec<Body>,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        PropagationConfig {
            mu_sun: GAUSS_GRAV_SQUARED,
            step_days: 0.25,
            output_spacing_days: 1.0,
            visualization_cutoff_au: 50.0,
            hard_stop_au: 100.0,
            non_grav_cutoff_au: 10.0,
            trail_uncertainty_rate_km: 500.0,
            projection_uncertainty_rate_km: 2000.0,
            kepler_tolerance: 1e-12,
            kepler_max_iterations: 30,
            perturbers: vec![Body::Jupiter, Body::Saturn, Body::Earth],
        }
    }
}

impl PropagationConfig {
    /// Parse a configuration from a TOML document and validate it.
    ///
    /// Arguments
    /// -----------------
    /// * `contents`: the TOML text; missing keys keep their default value.
    ///
    /// Return
    /// ----------
    /// * The validated configuration, or a [`CometrailError::ConfigParse`] /
    ///   [`CometrailError::InvalidConfig`] error.
    pub fn from_toml_str(contents: &str) -> Result<Self, CometrailError> {
        let config: PropagationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CometrailError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Same configuration with another perturbing body list.
    pub fn with_perturbers(mut self, perturbers: Vec<Body>) -> Self {
        self.perturbers = perturbers;
        self
    }

    /// Same configuration with another default step size.
    pub fn with_step(mut self, step_days: f64) -> Self {
        self.step_days = step_days;
        self
    }

    /// Check the physical consistency of the configuration.
    pub fn validate(&self) -> Result<(), CometrailError> {
        let positive = [
            ("mu_sun", self.mu_sun),
            ("step_days", self.step_days),
            ("output_spacing_days", self.output_spacing_days),
            ("visualization_cutoff_au", self.visualization_cutoff_au),
            ("hard_stop_au", self.hard_stop_au),
            ("non_grav_cutoff_au", self.non_grav_cutoff_au),
            ("kepler_tolerance", self.kepler_tolerance),
        ];
        if let Some((name, value)) = positive
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
        {
            return Err(CometrailError::InvalidConfig(format!(
                "{name} must be finite and positive, got {value}"
            )));
        }

        let rates = [self.trail_uncertainty_rate_km, self.projection_uncertainty_rate_km];
        if rates.iter().any(|rate| !rate.is_finite() || *rate < 0.0) {
            return Err(CometrailError::InvalidConfig(
                "uncertainty rates must be finite and non-negative".into(),
            ));
        }

        if self.hard_stop_au < self.visualization_cutoff_au {
            return Err(CometrailError::InvalidConfig(format!(
                "hard_stop_au ({}) is below visualization_cutoff_au ({})",
                self.hard_stop_au, self.visualization_cutoff_au
            )));
        }

        if self.kepler_max_iterations == 0 {
            return Err(CometrailError::InvalidConfig(
                "kepler_max_iterations must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = PropagationConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.perturbers, vec![Body::Jupiter, Body::Saturn, Body::Earth]);

        let with_mars = cfg.with_perturbers(vec![Body::Jupiter, Body::Mars]);
        assert!(with_mars.validate().is_ok());
        assert_eq!(with_mars.perturbers.len(), 2);
    }

    #[test]
    fn test_from_toml_partial() {
        let cfg = PropagationConfig::from_toml_str(
            r#"
            hard_stop_au = 200.0
            perturbers = ["Jupiter", "Mars"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.hard_stop_au, 200.0);
        assert_eq!(cfg.perturbers, vec![Body::Jupiter, Body::Mars]);
        assert_eq!(cfg.step_days, 0.25);
    }

    #[test]
    fn test_toml_roundtrip() {
        let cfg = PropagationConfig::default().with_step(0.1);
        let text = toml::to_string(&cfg).unwrap();
        let back = PropagationConfig::from_toml_str(&text).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn test_invalid_configs() {
        let err = PropagationConfig::from_toml_str("step_days = 0.0").unwrap_err();
        assert!(matches!(err, CometrailError::InvalidConfig(_)));

        let err = PropagationConfig::from_toml_str(
            "visualization_cutoff_au = 150.0\nhard_stop_au = 100.0",
        )
        .unwrap_err();
        assert!(matches!(err, CometrailError::InvalidConfig(_)));

        let nan_rate = PropagationConfig {
            projection_uncertainty_rate_km: f64::NAN,
            ..PropagationConfig::default()
        };
        assert!(matches!(nan_rate.validate(), Err(CometrailError::InvalidConfig(_))));

        let err = PropagationConfig::from_toml_str("trail_uncertainty_rate_km = -1.0").unwrap_err();
        assert!(matches!(err, CometrailError::InvalidConfig(_)));

        let err = PropagationConfig::from_toml_str("step_days = \"fast\"").unwrap_err();
        assert!(matches!(err, CometrailError::ConfigParse(_)));
    }
}
