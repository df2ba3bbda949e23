//! Precession matrix computation
//!
//! The default model is IAU 1976 (Lieske et al. 1977): the equatorial angles
//! zeta, z and theta as cubic polynomials in Julian centuries. The Capitaine
//! et al. (2003) four-angle formulation (A&A 412, 567-586) is available as
//! [`PrecessionModel::Iau2006`].

use serde::{Deserialize, Serialize};

use crate::constants::{ASEC2RAD, DAYS_PER_JULIAN_CENTURY, J2000, J2000_OBLIQUITY_ASEC};
use crate::framelib::{rot_y, rot_z};
use crate::time::Instant;
use crate::units::{arcsecond, Angle};
use nalgebra::Matrix3;

/// Which precession theory to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecessionModel {
    #[default]
    Iau1976,
    Iau2006,
}

/// IAU 1976 equatorial precession angles
#[derive(Debug, Clone, Copy)]
pub struct PrecessionAngles {
    pub zeta: Angle,
    pub z: Angle,
    pub theta: Angle,
}

impl PrecessionAngles {
    /// Angles accumulated from J2000.0 to `t` Julian centuries of TT
    pub fn iau1976(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        Self {
            zeta: Angle::new::<arcsecond>(2306.2181 * t + 0.30188 * t2 + 0.017998 * t3),
            z: Angle::new::<arcsecond>(2306.2181 * t + 1.09468 * t2 + 0.018203 * t3),
            theta: Angle::new::<arcsecond>(2004.3109 * t - 0.42665 * t2 - 0.041833 * t3),
        }
    }
}

/// Compute the IAU 1976 precession matrix from J2000 to the mean equinox of date
///
/// Built as R3(zeta) * R2(-theta) * R3(z) and transposed, which gives
/// P = R3(-z) * R2(theta) * R3(-zeta).
///
/// # Arguments
/// * `jd_tt` - TT Julian date
pub fn compute_precession(jd_tt: f64) -> Matrix3<f64> {
    let t = (jd_tt - J2000) / DAYS_PER_JULIAN_CENTURY;
    let angles = PrecessionAngles::iau1976(t);

    let zeta = angles.zeta.get::<arcsecond>() * ASEC2RAD;
    let z = angles.z.get::<arcsecond>() * ASEC2RAD;
    let theta = angles.theta.get::<arcsecond>() * ASEC2RAD;

    (rot_z(zeta) * rot_y(-theta) * rot_z(z)).transpose()
}

/// Compute the IAU 2006 (Capitaine 2003) precession matrix for a TT Julian date
///
/// P = R3(chi_a) * R1(-omega_a) * R3(-psi_a) * R1(eps_0)
pub fn compute_precession_iau2006(jd_tt: f64) -> Matrix3<f64> {
    let t = (jd_tt - J2000) / DAYS_PER_JULIAN_CENTURY;

    // Precession angles from Capitaine et al. (2003), in arcseconds
    let psi_a = ((((-0.0000000951 * t + 0.000132851) * t - 0.00114045) * t - 1.0790069) * t
        + 5038.481507)
        * t;

    let omega_a = ((((0.0000003337 * t - 0.000000467) * t - 0.00772503) * t + 0.0512623) * t
        - 0.025754)
        * t
        + J2000_OBLIQUITY_ASEC;

    let chi_a = ((((-0.0000000560 * t + 0.000170663) * t - 0.00121197) * t - 2.3814292) * t
        + 10.556403)
        * t;

    let eps0 = J2000_OBLIQUITY_ASEC * ASEC2RAD;
    let (sa, ca) = eps0.sin_cos();
    let (sb, cb) = (-psi_a * ASEC2RAD).sin_cos();
    let (sc, cc) = (-omega_a * ASEC2RAD).sin_cos();
    let (sd, cd) = (chi_a * ASEC2RAD).sin_cos();

    #[rustfmt::skip]
    let m = Matrix3::new(
        cd * cb - sb * sd * cc,
        cd * sb * ca + sd * cc * cb * ca - sa * sd * sc,
        cd * sb * sa + sd * cc * cb * sa + ca * sd * sc,

        -sd * cb - sb * cd * cc,
        -sd * sb * ca + cd * cc * cb * ca - sa * cd * sc,
        -sd * sb * sa + cd * cc * cb * sa + ca * cd * sc,

        sb * sc,
        -sc * cb * ca - sa * cc,
        -sc * cb * sa + cc * ca,
    );

    m
}

/// Precession for an [`Instant`]
pub struct Precession;

impl Precession {
    /// IAU 1976 rotation from the J2000 mean equator to the mean equator of date
    pub fn matrix_for(instant: &Instant) -> Matrix3<f64> {
        compute_precession(instant.tt())
    }

    pub fn matrix_for_model(instant: &Instant, model: PrecessionModel) -> Matrix3<f64> {
        match model {
            PrecessionModel::Iau1976 => compute_precession(instant.tt()),
            PrecessionModel::Iau2006 => compute_precession_iau2006(instant.tt()),
        }
    }
}
