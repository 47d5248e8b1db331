use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Radian, OBLIQUITY_J2000, RADEG};

/// Reference frames handled by the engine. Both are heliocentric-capable and tied to the
/// mean equinox of J2000.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSystem {
    /// Ecliptic mean J2000: X toward the equinox, Z toward the ecliptic pole.
    EclipticJ2000,
    /// Equatorial mean J2000: X toward the equinox, Z toward the celestial pole.
    EquatorialJ2000,
}

/// Right ascension and declination, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaDec {
    /// Right ascension in [0, 360) degrees.
    pub ra: Degree,
    /// Declination in [-90, 90] degrees.
    pub dec: Degree,
}

/// Rotation matrix between two reference systems.
///
/// Returns `R` such that `x₂ = R · x₁`, where `x₁` is expressed in `ref_sys1` and `x₂` the same
/// vector expressed in `ref_sys2`. Only the fixed J2000 obliquity rotation is involved; no
/// precession or nutation is applied.
///
/// # See also
/// * [`rotmt`] – elementary rotation used to build the matrix
pub fn rotpn(ref_sys1: &RefSystem, ref_sys2: &RefSystem) -> Matrix3<f64> {
    let obl = OBLIQUITY_J2000 * RADEG;
    match (ref_sys1, ref_sys2) {
        (RefSystem::EclipticJ2000, RefSystem::EquatorialJ2000) => rotmt(obl, 0),
        (RefSystem::EquatorialJ2000, RefSystem::EclipticJ2000) => rotmt(-obl, 0),
        _ => Matrix3::identity(),
    }
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes (X, Y, or Z).
///
/// The matrix represents an **active rotation** of a vector by `alpha` (radians, positive =
/// counter-clockwise seen from the tip of the axis). Axis index: `0` → X, `1` → Y, any other
/// value → Z.
///
/// Uses [`nalgebra::Rotation3::from_axis_angle`], so the result is orthonormal.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        _ => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Combined rotation from the orbital (perifocal) plane to heliocentric ecliptic J2000.
///
/// The perifocal frame has X toward perihelion and Z along the orbit normal. The matrix is
/// `Rz(Ω) · Rx(i) · Rz(ω)` written out as one transform; its columns are the classical
/// `P`, `Q`, `W` vectors. Valid for any inclination, including retrograde orbits (i > 90°).
///
/// Arguments
/// -----------------
/// * `inclination`: orbital inclination `i` (rad)
/// * `periapsis_argument`: argument of perihelion `ω` (rad)
/// * `ascending_node`: longitude of the ascending node `Ω` (rad)
pub fn orbital_plane_to_ecliptic(
    inclination: Radian,
    periapsis_argument: Radian,
    ascending_node: Radian,
) -> Matrix3<f64> {
    let (si, ci) = inclination.sin_cos();
    let (sw, cw) = periapsis_argument.sin_cos();
    let (sn, cn) = ascending_node.sin_cos();

    Matrix3::new(
        cn * cw - sn * sw * ci,
        -cn * sw - sn * cw * ci,
        sn * si,
        sn * cw + cn * sw * ci,
        -sn * sw + cn * cw * ci,
        -cn * si,
        sw * si,
        cw * si,
        ci,
    )
}

/// Rotate a heliocentric ecliptic J2000 vector into the equatorial J2000 frame.
pub fn ecliptic_to_equatorial(ecliptic: &Vector3<f64>) -> Vector3<f64> {
    rotpn(&RefSystem::EclipticJ2000, &RefSystem::EquatorialJ2000) * ecliptic
}

/// Rotate an equatorial J2000 vector into the ecliptic J2000 frame.
pub fn equatorial_to_ecliptic(equatorial: &Vector3<f64>) -> Vector3<f64> {
    rotpn(&RefSystem::EquatorialJ2000, &RefSystem::EclipticJ2000) * equatorial
}

/// Translate a heliocentric position to a geocentric one, given Earth's heliocentric position
/// in the same frame.
pub fn heliocentric_to_geocentric(
    heliocentric: &Vector3<f64>,
    earth_heliocentric: &Vector3<f64>,
) -> Vector3<f64> {
    heliocentric - earth_heliocentric
}

/// Convert a Cartesian position vector (equatorial frame) to right ascension and declination.
///
/// `RA = atan2(y, x)` normalized to [0, 360) and `Dec = atan2(z, sqrt(x² + y²))`.
/// A zero vector maps to `(0, 0)`.
pub fn cartesian_to_radec(cartesian_position: &Vector3<f64>) -> RaDec {
    let (x, y, z) = (
        cartesian_position.x,
        cartesian_position.y,
        cartesian_position.z,
    );
    if x == 0.0 && y == 0.0 && z == 0.0 {
        return RaDec { ra: 0.0, dec: 0.0 };
    }

    let ra = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid may round a tiny negative angle up to exactly 360
    let ra = if ra >= 360.0 { 0.0 } else { ra };
    let dec = z.atan2(x.hypot(y)).to_degrees();

    RaDec { ra, dec }
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotmt_axes() {
        let v = rotmt(std::f64::consts::FRAC_PI_2, 2) * Vector3::x();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-15);

        let v = rotmt(std::f64::consts::FRAC_PI_2, 0) * Vector3::y();
        assert_relative_eq!(v, Vector3::z(), epsilon = 1e-15);
    }

    #[test]
    fn test_combined_rotation_matches_sequence() {
        let (i, w, n) = (175.1131 * RADEG, 128.01 * RADEG, 322.16 * RADEG);
        let combined = orbital_plane_to_ecliptic(i, w, n);
        let sequence = rotmt(n, 2) * rotmt(i, 0) * rotmt(w, 2);
        assert_relative_eq!(combined, sequence, epsilon = 1e-14);

        // orthonormal
        assert_relative_eq!(
            combined * combined.transpose(),
            Matrix3::identity(),
            epsilon = 1e-14
        );
        assert_relative_eq!(combined.determinant(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_retrograde_normal() {
        // i ≈ 180°: the orbit normal points to the south ecliptic pole
        let rot = orbital_plane_to_ecliptic(179.9 * RADEG, 0.0, 0.0);
        let normal = rot * Vector3::z();
        assert!(normal.z < -0.9999);
    }

    #[test]
    fn test_obliquity_rotation() {
        // the ecliptic north pole is at RA 270°, Dec 66.56°
        let pole = ecliptic_to_equatorial(&Vector3::z());
        let radec = cartesian_to_radec(&pole);
        assert_relative_eq!(radec.ra, 270.0, epsilon = 1e-10);
        assert_relative_eq!(radec.dec, 90.0 - OBLIQUITY_J2000, epsilon = 1e-10);

        let v = Vector3::new(0.3, -1.2, 0.7);
        assert_relative_eq!(
            equatorial_to_ecliptic(&ecliptic_to_equatorial(&v)),
            v,
            epsilon = 1e-15
        );
        assert_eq!(
            rotpn(&RefSystem::EclipticJ2000, &RefSystem::EclipticJ2000),
            Matrix3::identity()
        );
    }

    #[test]
    fn test_cartesian_to_radec() {
        let radec = cartesian_to_radec(&Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(radec.ra, 270.0, epsilon = 1e-12);
        assert_eq!(radec.dec, 0.0);

        let radec = cartesian_to_radec(&Vector3::new(1.0, 0.0, -1.0));
        assert_relative_eq!(radec.ra, 0.0, epsilon = 1e-12);
        assert_relative_eq!(radec.dec, -45.0, epsilon = 1e-12);

        let radec = cartesian_to_radec(&Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(radec.dec, 90.0);

        assert_eq!(
            cartesian_to_radec(&Vector3::zeros()),
            RaDec { ra: 0.0, dec: 0.0 }
        );
    }

    #[test]
    fn test_heliocentric_to_geocentric() {
        let comet = Vector3::new(1.5, 0.5, -0.2);
        let earth = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(
            heliocentric_to_geocentric(&comet, &earth),
            Vector3::new(0.5, 0.5, -0.2)
        );
    }
}
