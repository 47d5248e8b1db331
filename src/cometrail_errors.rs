use thiserror::Error;

use crate::ephemeris::Body;

#[derive(Error, Debug)]
pub enum CometrailError {
    #[error("Invalid integration step size: {0} (must be finite and non-zero)")]
    InvalidStepSize(f64),

    #[error("Invalid propagation duration: {0} (must be finite)")]
    InvalidDuration(f64),

    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),

    #[error("Perihelion time is unknown for this element set")]
    MissingPerihelionTime,

    #[error("Ephemeris unavailable for {body}: {reason}")]
    EphemerisUnavailable { body: Body, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid non-gravitational parameters: {0}")]
    InvalidNonGravParams(String),

    #[error("Unable to parse date: {0}")]
    DateParse(String),

    #[error("Unable to parse TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for CometrailError {
    fn eq(&self, other: &Self) -> bool {
        use CometrailError::*;
        match (self, other) {
            (InvalidStepSize(a), InvalidStepSize(b)) => a == b,
            (InvalidDuration(a), InvalidDuration(b)) => a == b,
            (InvalidElements(a), InvalidElements(b)) => a == b,
            (
                EphemerisUnavailable { body: a, reason: ra },
                EphemerisUnavailable { body: b, reason: rb },
            ) => a == b && ra == rb,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (InvalidNonGravParams(a), InvalidNonGravParams(b)) => a == b,
            (DateParse(a), DateParse(b)) => a == b,

            // foreign payloads: same variant is enough
            (ConfigParse(_), ConfigParse(_)) => true,
            (IoError(_), IoError(_)) => true,

            (MissingPerihelionTime, MissingPerihelionTime) => true,

            _ => false,
        }
    }
}
