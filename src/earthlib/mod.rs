//! Earth rotation, sidereal time and low-precision solar elements
//!
//! Implements the Earth Rotation Angle (ERA) per IAU 2000 Resolution B1.8,
//! Greenwich Mean Sidereal Time (GMST) per USNO Circular 179, Section 2.6.2,
//! apparent sidereal time through the equation of the equinoxes, and the
//! Meeus (1998, ch. 25) solar theory used by the classical aberration and the
//! equation of time.

use crate::constants::{ASEC2RAD, DEG2RAD, J2000};
use crate::nutationlib::{self, Nutation};
use crate::time::Instant;
use crate::units::{angle_from_hours, degree, radian, Angle};

/// Compute the Earth Rotation Angle (ERA) for a UT1 date
///
/// Returns a fraction between 0.0 and 1.0 representing whole rotations.
///
/// # Arguments
/// * `jd_ut1` - UT1 Julian date (whole part)
/// * `fraction_ut1` - UT1 Julian date (fractional part)
pub fn earth_rotation_angle(jd_ut1: f64, fraction_ut1: f64) -> f64 {
    let th = 0.7790572732640 + 0.00273781191135448 * (jd_ut1 - J2000 + fraction_ut1);
    (th.rem_euclid(1.0) + jd_ut1.rem_euclid(1.0) + fraction_ut1).rem_euclid(1.0)
}

/// Compute Greenwich Mean Sidereal Time (GMST) in hours
///
/// Precession-in-RA terms are from Capitaine et al. (2003), eq. (42).
///
/// # Arguments
/// * `jd_ut1_whole` - UT1 Julian date (whole part) for ERA
/// * `ut1_fraction` - UT1 Julian date (fractional part) for ERA
/// * `tt_centuries` - TT in Julian centuries since J2000.0
pub fn sidereal_time(jd_ut1_whole: f64, ut1_fraction: f64, tt_centuries: f64) -> f64 {
    let theta = earth_rotation_angle(jd_ut1_whole, ut1_fraction);

    let t = tt_centuries;
    let st = 0.014506
        + ((((-0.0000000368 * t - 0.000029956) * t - 0.00000044) * t + 1.3915817) * t
            + 4612.156534)
            * t;

    // st is in arcseconds (divide by 54000 for hours), theta in rotations
    (st / 54000.0 + theta * 24.0).rem_euclid(24.0)
}

/// Greenwich Apparent Sidereal Time: GMST plus the equation of the equinoxes
pub fn gast(instant: &Instant) -> Angle {
    let gmst_hours = instant.gmst().get::<degree>() / 15.0;
    let ee_hours = nutationlib::equation_of_the_equinoxes(instant.tt()) / ASEC2RAD / 54000.0;
    angle_from_hours((gmst_hours + ee_hours).rem_euclid(24.0))
}

/// Low-precision solar elements for one instant (Meeus ch. 25)
#[derive(Debug, Clone, Copy)]
pub struct SolarElements {
    /// Geometric mean longitude of the Sun
    pub mean_longitude: Angle,
    /// Mean anomaly of the Sun
    pub mean_anomaly: Angle,
    /// True geometric longitude of the Sun
    pub true_longitude: Angle,
    /// Eccentricity of the Earth's orbit
    pub eccentricity: f64,
    /// Longitude of the perihelion of the Earth's orbit
    pub perihelion_longitude: Angle,
}

impl SolarElements {
    pub fn at(instant: &Instant) -> Self {
        let t = instant.julian_centuries();

        let l0 = (280.46646 + 36000.76983 * t + 0.0003032 * t * t).rem_euclid(360.0);
        let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t).rem_euclid(360.0);
        let m_rad = m * DEG2RAD;

        // Equation of the center
        let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m_rad.sin()
            + (0.019993 - 0.000101 * t) * (2.0 * m_rad).sin()
            + 0.000289 * (3.0 * m_rad).sin();

        let eccentricity = 0.016708634 - 0.000042037 * t - 0.0000001267 * t * t;
        let perihelion = 102.93735 + 1.71946 * t + 0.00046 * t * t;

        Self {
            mean_longitude: Angle::new::<degree>(l0),
            mean_anomaly: Angle::new::<degree>(m),
            true_longitude: Angle::new::<degree>((l0 + c).rem_euclid(360.0)),
            eccentricity,
            perihelion_longitude: Angle::new::<degree>(perihelion),
        }
    }
}

/// Equation of time: apparent minus mean solar time, as an hour angle
///
/// Positive when the true Sun is ahead of the mean Sun.
pub fn equation_of_time(instant: &Instant) -> Angle {
    let t = instant.julian_centuries();
    let sun = SolarElements::at(instant);

    // Apparent longitude and corrected obliquity (Meeus 25.8, 25.9)
    let omega = (125.04 - 1934.136 * t) * DEG2RAD;
    let lambda = sun.true_longitude.get::<radian>() - (0.00569 + 0.00478 * omega.sin()) * DEG2RAD;
    let epsilon = nutationlib::mean_obliquity(instant.tt()) + 0.00256 * DEG2RAD * omega.cos();

    let alpha = (epsilon.cos() * lambda.sin()).atan2(lambda.cos());
    let dpsi = Nutation::for_ecliptic_longitude(instant).get::<radian>();

    let e = sun.mean_longitude.get::<radian>() - 0.0057183 * DEG2RAD - alpha + dpsi * epsilon.cos();
    // Wrap into (-180, 180] degrees
    let wrapped = (e + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI;
    Angle::new::<radian>(wrapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timescale;
    use approx::assert_relative_eq;

    #[test]
    fn test_era_at_j2000() {
        let era = earth_rotation_angle(J2000, 0.0);
        assert_relative_eq!(era, 0.7790572732640, epsilon = 1e-10);
    }

    #[test]
    fn test_era_range() {
        for offset in &[-1000.0, -100.0, 0.0, 100.0, 1000.0] {
            let era = earth_rotation_angle(J2000 + offset, 0.0);
            assert!(
                (0.0..1.0).contains(&era),
                "ERA out of range for offset {offset}: {era}"
            );
        }
    }

    #[test]
    fn test_gmst_at_j2000() {
        let gmst = sidereal_time(J2000, 0.0, 0.0);
        assert_relative_eq!(gmst, 18.697, epsilon = 0.01);
    }

    #[test]
    fn test_gmst_increases_with_time() {
        let gmst1 = sidereal_time(J2000, 0.0, 0.0);
        let gmst2 = sidereal_time(J2000, 0.01, 0.01 / 36525.0);
        let diff = (gmst2 - gmst1 + 24.0) % 24.0;
        assert!(diff > 0.2 && diff < 0.3, "GMST increase = {diff}");
    }

    #[test]
    fn test_gast_close_to_gmst() {
        let ts = Timescale::default();
        let t = ts.utc(2025, 2, 7, 12, 0, 0.0).unwrap();
        let diff_s = (gast(&t).get::<degree>() - t.gmst().get::<degree>()) * 240.0;
        // Equation of the equinoxes never exceeds ~1.2 s of time
        assert!(diff_s.abs() < 1.2, "equation of the equinoxes = {diff_s} s");
    }

    #[test]
    fn test_solar_elements_meeus_example() {
        // Meeus example 25.a: 1992 October 13.0 TD
        let ts = Timescale::default();
        let t = ts.tt_jd(2_448_908.5).unwrap();
        let sun = SolarElements::at(&t);
        assert_relative_eq!(sun.mean_longitude.get::<degree>(), 201.80720, epsilon = 1e-3);
        assert_relative_eq!(sun.mean_anomaly.get::<degree>(), 278.99397, epsilon = 1e-3);
        assert_relative_eq!(sun.true_longitude.get::<degree>(), 199.90988, epsilon = 1e-3);
        assert_relative_eq!(sun.eccentricity, 0.016711668, epsilon = 1e-8);
    }

    #[test]
    fn test_equation_of_time_meeus_example() {
        // Meeus example 28.a: E = 13m42.7s = 3.427 degrees
        let ts = Timescale::default();
        let t = ts.tt_jd(2_448_908.5).unwrap();
        assert_relative_eq!(equation_of_time(&t).get::<degree>(), 3.427, epsilon = 0.01);
    }

    #[test]
    fn test_equation_of_time_range() {
        let ts = Timescale::default();
        for day in (0..366).step_by(5) {
            let t = ts.tt_jd(2_460_676.5 + f64::from(day)).unwrap();
            let minutes = equation_of_time(&t).get::<degree>() * 4.0;
            assert!(minutes.abs() < 17.0, "EoT {minutes} min on day {day}");
        }
    }
}
