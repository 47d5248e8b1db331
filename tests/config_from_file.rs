use std::fs;

use cometrail::{config::PropagationConfig, ephemeris::Body, CometrailError};

#[test]
fn config_is_read_from_toml_file() {
    let path = std::env::temp_dir().join(format!("cometrail-config-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
step_days = 0.1
output_spacing_days = 0.5
perturbers = ["Jupiter", "Saturn", "Earth", "Mars"]
"#,
    )
    .unwrap();

    let config = PropagationConfig::from_toml_file(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(config.step_days, 0.1);
    assert_eq!(config.output_spacing_days, 0.5);
    assert_eq!(config.perturbers.last(), Some(&Body::Mars));
    assert_eq!(config.hard_stop_au, 100.0);
    assert!(config.validate().is_ok());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = PropagationConfig::from_toml_file("/nonexistent/cometrail.toml").unwrap_err();
    assert!(matches!(err, CometrailError::IoError(_)));
}
