//! Nutation computations based on the IAU 2000B model
//!
//! Implements nutation in longitude (delta-psi) and obliquity (delta-epsilon)
//! from the 77-term lunisolar series, the mean and true obliquity of the
//! ecliptic, the nutation rotation matrix, and the equation of the equinoxes.

mod iau2000b_data;

use crate::constants::{ASEC2RAD, DAYS_PER_JULIAN_CENTURY, J2000};
use crate::time::Instant;
use crate::units::{radian, Angle};
use nalgebra::Matrix3;

use iau2000b_data::LUNISOLAR_TERMS;

/// Conversion factor from 0.1 microarcsecond to radians
const TENTH_USEC_2_RAD: f64 = ASEC2RAD / 1e7;

/// Fixed offsets standing in for the planetary terms omitted by IAU 2000B (arcsec)
const DPSI_PLANETARY_OFFSET: f64 = -0.000_135;
const DEPS_PLANETARY_OFFSET: f64 = -0.000_388;

/// Fundamental argument polynomial coefficients
///
/// Each row: [constant, t^1, t^2, t^3, t^4] in arcseconds
/// From IERS Conventions (2003), Chapter 5
#[rustfmt::skip]
const FA_COEFFS: [[f64; 5]; 5] = [
    // Mean Anomaly of the Moon (l)
    [485868.249036, 1717915923.2178, 31.8792, 0.051635, -0.00024470],
    // Mean Anomaly of the Sun (l')
    [1287104.79305, 129596581.0481, -0.5532, 0.000136, -0.00001149],
    // Mean Longitude of Moon - Ascending Node (F)
    [335779.526232, 1739527262.8478, -12.7512, -0.001037, 0.00000417],
    // Mean Elongation of Moon from Sun (D)
    [1072260.70369, 1602961601.2090, -6.3706, 0.006593, -0.00003169],
    // Mean Longitude of Ascending Node of Moon (Omega)
    [450160.398036, -6962890.5431, 7.4722, 0.007702, -0.00005939],
];

/// Compute the five fundamental arguments (Delaunay variables) in radians
///
/// # Arguments
/// * `t` - TT time in Julian centuries since J2000.0
pub fn fundamental_arguments(t: f64) -> [f64; 5] {
    let mut fa = [0.0f64; 5];
    for (i, coeffs) in FA_COEFFS.iter().enumerate() {
        let val = coeffs[0] + (coeffs[1] + (coeffs[2] + (coeffs[3] + coeffs[4] * t) * t) * t) * t;
        fa[i] = val * ASEC2RAD;
    }
    fa
}

/// Compute nutation angles (delta-psi, delta-epsilon) in radians
///
/// IAU 2000B: 77 lunisolar terms plus fixed planetary offsets, good to
/// about a milliarcsecond between 1995 and 2050.
///
/// # Arguments
/// * `tt_jd` - TT Julian date
pub fn iau2000b_nutation(tt_jd: f64) -> (f64, f64) {
    let t = (tt_jd - J2000) / DAYS_PER_JULIAN_CENTURY;
    let fa = fundamental_arguments(t);

    let mut d_psi = 0.0;
    let mut d_eps = 0.0;

    for row in LUNISOLAR_TERMS.iter() {
        let arg: f64 = row[..5]
            .iter()
            .zip(fa.iter())
            .map(|(&n, &a)| n as f64 * a)
            .sum();
        let (sin_arg, cos_arg) = arg.sin_cos();

        d_psi += (row[5] as f64 + row[6] as f64 * t) * sin_arg;
        d_eps += (row[7] as f64 + row[8] as f64 * t) * cos_arg;
    }

    (
        d_psi * TENTH_USEC_2_RAD + DPSI_PLANETARY_OFFSET * ASEC2RAD,
        d_eps * TENTH_USEC_2_RAD + DEPS_PLANETARY_OFFSET * ASEC2RAD,
    )
}

/// Compute the mean obliquity of the ecliptic in radians
///
/// From Capitaine et al. (2003), Astronomy and Astrophysics 412, 567-586.
///
/// # Arguments
/// * `tt_jd` - TT Julian date
pub fn mean_obliquity(tt_jd: f64) -> f64 {
    let t = (tt_jd - J2000) / DAYS_PER_JULIAN_CENTURY;

    let epsilon = ((((-0.0000000434 * t - 0.000000576) * t + 0.00200340) * t - 0.0001831) * t
        - 46.836769)
        * t
        + 84381.406;

    epsilon * ASEC2RAD
}

/// Build the nutation rotation matrix
///
/// Rotates mean-equator-of-date coordinates onto the true equator and
/// equinox of date.
///
/// # Arguments
/// * `mean_obliquity_rad` - mean obliquity of ecliptic in radians
/// * `d_psi` - nutation in longitude in radians
/// * `d_eps` - nutation in obliquity in radians
pub fn build_nutation_matrix(mean_obliquity_rad: f64, d_psi: f64, d_eps: f64) -> Matrix3<f64> {
    let eps_mean = mean_obliquity_rad;
    let eps_true = eps_mean + d_eps;

    let (sobm, cobm) = eps_mean.sin_cos();
    let (sobt, cobt) = eps_true.sin_cos();
    let (spsi, cpsi) = d_psi.sin_cos();

    #[rustfmt::skip]
    let n = Matrix3::new(
        cpsi,          -spsi * cobm,                      -spsi * sobm,
        spsi * cobt,    cpsi * cobm * cobt + sobm * sobt,  cpsi * sobm * cobt - cobm * sobt,
        spsi * sobt,    cpsi * cobm * sobt - sobm * cobt,  cpsi * sobm * sobt + cobm * cobt,
    );

    n
}

/// Equation of the equinoxes in radians
///
/// Nutation in right ascension, `d_psi * cos(eps_true)`, plus the two
/// largest complementary terms in the Moon's node.
pub fn equation_of_the_equinoxes(tt_jd: f64) -> f64 {
    let t = (tt_jd - J2000) / DAYS_PER_JULIAN_CENTURY;
    let omega = fundamental_arguments(t)[4];
    let (d_psi, d_eps) = iau2000b_nutation(tt_jd);
    let eps_true = mean_obliquity(tt_jd) + d_eps;

    d_psi * eps_true.cos()
        + (0.002_640_96 * omega.sin() + 0.000_063_52 * (2.0 * omega).sin()) * ASEC2RAD
}

/// Nutation quantities for an [`Instant`]
pub struct Nutation;

impl Nutation {
    /// Rotation from the mean equator and equinox of date to the true ones
    pub fn matrix_for(instant: &Instant) -> Matrix3<f64> {
        let (d_psi, d_eps) = iau2000b_nutation(instant.tt());
        build_nutation_matrix(mean_obliquity(instant.tt()), d_psi, d_eps)
    }

    /// Nutation in ecliptic longitude (delta-psi)
    pub fn for_ecliptic_longitude(instant: &Instant) -> Angle {
        Angle::new::<radian>(iau2000b_nutation(instant.tt()).0)
    }

    /// Nutation in the obliquity of the ecliptic (delta-epsilon)
    pub fn for_obliquity_of_the_ecliptic(instant: &Instant) -> Angle {
        Angle::new::<radian>(iau2000b_nutation(instant.tt()).1)
    }

    pub fn mean_obliquity(instant: &Instant) -> Angle {
        Angle::new::<radian>(mean_obliquity(instant.tt()))
    }

    /// Mean obliquity plus nutation in obliquity
    pub fn true_obliquity(instant: &Instant) -> Angle {
        let (_, d_eps) = iau2000b_nutation(instant.tt());
        Angle::new::<radian>(mean_obliquity(instant.tt()) + d_eps)
    }
}
