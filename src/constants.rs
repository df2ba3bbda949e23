//! Physical and astronomical constants shared across the pipeline

use std::f64::consts::PI;

/// IAU 2012 exact Astronomical Unit in meters
pub const AU_M: f64 = 149_597_870_700.0;

/// Astronomical Unit in kilometers
pub const AU_KM: f64 = AU_M / 1000.0;

/// Speed of light in m/s
pub const C: f64 = 299_792_458.0;

/// Speed of light in km/s
pub const C_KM_S: f64 = C / 1000.0;

/// Seconds per day
pub const DAY_S: f64 = 86_400.0;

/// Speed of light in AU/day
pub const C_AUDAY: f64 = C * DAY_S / AU_M;

/// Heliocentric gravitational constant in m^3/s^2
pub const GS: f64 = 1.327_124_400_179_87e20;

/// Julian Date of the J2000.0 epoch (TT)
pub const J2000: f64 = 2_451_545.0;

/// Days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Julian Date of the Unix epoch 1970-01-01T00:00:00 UTC
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// TT - TAI in seconds
pub const TT_MINUS_TAI_S: f64 = 32.184;

/// Arcseconds to radians
pub const ASEC2RAD: f64 = 4.848_136_811_095_359_935_899_141e-6;

/// Arcseconds in a full turn
pub const ASEC360: f64 = 1_296_000.0;

pub const TAU: f64 = 2.0 * PI;
pub const DEG2RAD: f64 = PI / 180.0;
pub const RAD2DEG: f64 = 180.0 / PI;

/// Mean obliquity of the ecliptic at J2000.0 in arcseconds (IAU 2006)
pub const J2000_OBLIQUITY_ASEC: f64 = 84_381.406;

/// Nominal Earth rotation rate in rad/s
pub const EARTH_ANGVEL: f64 = 7.292_115_0e-5;

/// Earth equatorial radius in meters (IERS 2010)
pub const EARTH_RADIUS: f64 = 6_378_136.6;

/// Inverse flattening of the IERS 2010 reference ellipsoid
pub const IERS_2010_INVERSE_EARTH_FLATTENING: f64 = 298.25642;
