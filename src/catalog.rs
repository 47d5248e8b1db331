//! Built-in orbital elements of the known interstellar objects.
//!
//! Heliocentric ecliptic J2000 osculating elements, in the form published by the Minor Planet
//! Center and JPL. They are constants: the engine never fits or updates them.
use hifitime::Epoch;

use crate::orbit_type::{NonGravParams, OrbitalElements};

/// A catalogued object with its elements and, when one has been fitted, its
/// non-gravitational model.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogObject {
    pub designation: &'static str,
    pub elements: OrbitalElements,
    pub non_grav: Option<NonGravParams>,
}

/// 3I/ATLAS (C/2025 N1).
///
/// The eccentricity `e = 6.13941774` is far above that of 1I and 2I. It is kept as published
/// and still needs to be checked against an authoritative orbit solution.
pub fn atlas_3i() -> OrbitalElements {
    OrbitalElements {
        epoch: Epoch::from_gregorian_utc_at_midnight(2025, 7, 18),
        eccentricity: 6.13941774,
        perihelion_distance: 1.35638454,
        inclination: 175.1131,
        periapsis_argument: 128.0101,
        ascending_node: 322.1568,
        perihelion_time: Some(Epoch::from_gregorian_utc_hms(2025, 10, 29, 11, 33, 16)),
    }
}

/// 1I/ʻOumuamua (A/2017 U1).
pub fn oumuamua_1i() -> OrbitalElements {
    OrbitalElements {
        epoch: Epoch::from_gregorian_utc_at_midnight(2017, 11, 23),
        eccentricity: 1.20113,
        perihelion_distance: 0.255912,
        inclination: 122.7417,
        periapsis_argument: 241.8105,
        ascending_node: 24.5969,
        perihelion_time: Some(Epoch::from_gregorian_utc_hms(2017, 9, 9, 11, 45, 36)),
    }
}

/// 2I/Borisov (C/2019 Q4).
pub fn borisov_2i() -> OrbitalElements {
    OrbitalElements {
        epoch: Epoch::from_gregorian_utc_at_midnight(2019, 12, 23),
        eccentricity: 3.356,
        perihelion_distance: 2.0066,
        inclination: 44.053,
        periapsis_argument: 209.12,
        ascending_node: 308.15,
        perihelion_time: Some(Epoch::from_gregorian_utc_hms(2019, 12, 8, 13, 12, 0)),
    }
}

/// Every catalogued object, 3I first.
pub fn all() -> Vec<CatalogObject> {
    vec![
        CatalogObject {
            designation: "3I/ATLAS",
            elements: atlas_3i(),
            non_grav: None,
        },
        CatalogObject {
            designation: "1I/'Oumuamua",
            elements: oumuamua_1i(),
            non_grav: None,
        },
        CatalogObject {
            designation: "2I/Borisov",
            elements: borisov_2i(),
            non_grav: None,
        },
    ]
}

/// Case-insensitive lookup on the designation, with or without the name part ("3I" matches).
pub fn find(designation: &str) -> Option<CatalogObject> {
    let wanted = designation.trim().to_ascii_lowercase();
    all().into_iter().find(|obj| {
        let full = obj.designation.to_ascii_lowercase();
        full == wanted || full.split('/').next() == Some(wanted.as_str())
    })
}

#[cfg(test)]
mod catalog_test {
    use super::*;
    use crate::orbit_type::OrbitFamily;

    #[test]
    fn test_all_interstellar_objects_are_hyperbolic() {
        for obj in all() {
            assert!(
                matches!(obj.elements.family(), OrbitFamily::Hyperbolic { .. }),
                "{} should be on an open orbit",
                obj.designation
            );
            assert!(obj.elements.perihelion_time.is_some());
        }
    }

    #[test]
    fn test_atlas_elements_are_valid() {
        let atlas = atlas_3i();
        let rebuilt = OrbitalElements::new(
            atlas.epoch,
            atlas.eccentricity,
            atlas.perihelion_distance,
            atlas.inclination,
            atlas.periapsis_argument,
            atlas.ascending_node,
            atlas.perihelion_time,
        )
        .unwrap();
        assert_eq!(rebuilt, atlas);
        assert!(atlas.inclination > 90.0, "3I/ATLAS is retrograde");
    }

    #[test]
    fn test_find() {
        assert_eq!(find("3i").unwrap().elements, atlas_3i());
        assert_eq!(find("2I/Borisov").unwrap().elements, borisov_2i());
        assert!(find("4I").is_none());
        assert!(find("3I/ATLAS").unwrap().non_grav.is_none());
    }
}
