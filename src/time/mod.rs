//! Time scales and instants
//!
//! An [`Instant`] is keyed on a Terrestrial Time Julian date. UTC, TAI and UT1
//! are derived from it through the leap-second and Delta-T tables carried by
//! the [`Timescale`] that created it.

mod delta_t;
mod leap_seconds;

pub use delta_t::DeltaTTable;
pub use leap_seconds::LeapSecondTable;

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::constants::{
    DAYS_PER_JULIAN_CENTURY, DAYS_PER_JULIAN_YEAR, DAY_S, J2000, TT_MINUS_TAI_S, UNIX_EPOCH_JD,
};
use crate::errors::{Result, StarframeError};
use crate::units::{angle_from_hours, Angle};

/// Factory for [`Instant`]s, holding the Delta-T and leap-second tables
#[derive(Debug, Clone, Default)]
pub struct Timescale {
    delta_t: DeltaTTable,
    leap_seconds: LeapSecondTable,
}

impl Timescale {
    pub fn new(delta_t: DeltaTTable, leap_seconds: LeapSecondTable) -> Self {
        Self {
            delta_t,
            leap_seconds,
        }
    }

    /// Build an instant directly from a TT Julian date
    pub fn tt_jd(&self, tt: f64) -> Result<Instant> {
        if !tt.is_finite() {
            return Err(StarframeError::InvalidTime(format!(
                "TT Julian date must be finite, got {tt}"
            )));
        }
        Ok(self.instant_from_tt(tt))
    }

    /// Build an instant from a UTC Julian date
    pub fn utc_jd(&self, utc: f64) -> Result<Instant> {
        if !utc.is_finite() {
            return Err(StarframeError::InvalidTime(format!(
                "UTC Julian date must be finite, got {utc}"
            )));
        }
        Ok(self.instant_from_utc(utc))
    }

    /// Build an instant from a calendar date and time of day in UTC
    pub fn utc(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Result<Instant> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            StarframeError::InvalidTime(format!("no such date {year:04}-{month:02}-{day:02}"))
        })?;
        if hour > 23 || minute > 59 || !(0.0..61.0).contains(&second) {
            return Err(StarframeError::InvalidTime(format!(
                "invalid time of day {hour:02}:{minute:02}:{second}"
            )));
        }

        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            StarframeError::InvalidTime(format!("no midnight on {year:04}-{month:02}-{day:02}"))
        })?;
        let day_start = midnight.and_utc().timestamp() as f64 / DAY_S + UNIX_EPOCH_JD;
        let seconds_of_day = f64::from(hour) * 3600.0 + f64::from(minute) * 60.0 + second;
        Ok(self.instant_from_utc(day_start + seconds_of_day / DAY_S))
    }

    /// Build an instant from a wall-clock UTC time
    pub fn from_datetime(&self, datetime: &DateTime<Utc>) -> Instant {
        let unix = datetime.timestamp() as f64 + f64::from(datetime.timestamp_subsec_nanos()) * 1e-9;
        self.instant_from_utc(unix / DAY_S + UNIX_EPOCH_JD)
    }

    /// The current wall-clock time
    pub fn now(&self) -> Instant {
        self.from_datetime(&Utc::now())
    }

    fn instant_from_utc(&self, utc: f64) -> Instant {
        let tai_minus_utc = self.leap_seconds.tai_minus_utc(utc);
        let tt = utc + (tai_minus_utc + TT_MINUS_TAI_S) / DAY_S;
        Instant {
            tt,
            delta_t: self.delta_t.compute(tt),
            tai_minus_utc,
        }
    }

    pub(crate) fn instant_from_tt(&self, tt: f64) -> Instant {
        let tai = tt - TT_MINUS_TAI_S / DAY_S;
        Instant {
            tt,
            delta_t: self.delta_t.compute(tt),
            tai_minus_utc: self.leap_seconds.tai_minus_utc_at_tai(tai),
        }
    }
}

/// A moment in time keyed on its TT Julian date
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    tt: f64,
    delta_t: f64,
    tai_minus_utc: f64,
}

impl Instant {
    /// Terrestrial Time Julian date
    pub fn tt(&self) -> f64 {
        self.tt
    }

    /// International Atomic Time Julian date
    pub fn tai(&self) -> f64 {
        self.tt - TT_MINUS_TAI_S / DAY_S
    }

    /// Coordinated Universal Time Julian date
    pub fn utc(&self) -> f64 {
        self.tai() - self.tai_minus_utc / DAY_S
    }

    /// Universal Time UT1 Julian date
    pub fn ut1(&self) -> f64 {
        self.tt - self.delta_t / DAY_S
    }

    /// TT - UT1 in seconds
    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// TAI - UTC in seconds
    pub fn tai_minus_utc(&self) -> f64 {
        self.tai_minus_utc
    }

    /// Julian centuries of TT since J2000.0
    pub fn julian_centuries(&self) -> f64 {
        (self.tt - J2000) / DAYS_PER_JULIAN_CENTURY
    }

    /// Decimal Julian year
    pub fn year(&self) -> f64 {
        2000.0 + (self.tt - J2000) / DAYS_PER_JULIAN_YEAR
    }

    /// The instant `seconds` later (earlier when negative) on the TT scale
    ///
    /// Delta-T and the leap-second offset are carried over unchanged.
    pub fn offset_seconds(&self, seconds: f64) -> Instant {
        Instant {
            tt: self.tt + seconds / DAY_S,
            ..*self
        }
    }

    /// Bit pattern of the TT date, used to key caches
    pub fn cache_key(&self) -> u64 {
        self.tt.to_bits()
    }

    /// Convert to a wall-clock UTC time
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let unix = (self.utc() - UNIX_EPOCH_JD) * DAY_S;
        let secs = unix.floor();
        let nanos = ((unix - secs) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::<Utc>::from_timestamp(secs as i64, nanos).ok_or_else(|| {
            StarframeError::InvalidTime(format!("TT JD {} is not representable as UTC", self.tt))
        })
    }

    /// Greenwich Mean Sidereal Time
    pub fn gmst(&self) -> Angle {
        let ut1 = self.ut1();
        let whole = ut1.floor();
        angle_from_hours(crate::earthlib::sidereal_time(
            whole,
            ut1 - whole,
            self.julian_centuries(),
        ))
    }

    /// Greenwich Apparent Sidereal Time
    pub fn gast(&self) -> Angle {
        crate::earthlib::gast(self)
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.tt == other.tt
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.tt.partial_cmp(&other.tt)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TT JD {:.6}", self.tt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::degree;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    #[test]
    fn test_tt_utc_offset_in_2025() {
        let ts = Timescale::default();
        let t = ts.utc(2025, 2, 7, 12, 0, 0.0).unwrap();
        assert_relative_eq!(t.utc(), 2_460_714.0, epsilon = 1e-9);
        assert_relative_eq!((t.tt() - t.utc()) * DAY_S, 69.184, epsilon = 1e-3);
        assert_eq!(t.tai_minus_utc(), 37.0);
    }

    #[test]
    fn test_datetime_round_trip() {
        let ts = Timescale::default();
        for &tt in &[2_451_545.0, 2_455_000.25, 2_460_714.000_8, 2_462_000.9] {
            let t = ts.tt_jd(tt).unwrap();
            let back = ts.from_datetime(&t.to_datetime().unwrap());
            assert!(
                ((back.tt() - tt) * DAY_S).abs() < 1e-3,
                "round trip drifted by {} s",
                (back.tt() - tt) * DAY_S
            );
        }
    }

    #[test]
    fn test_from_datetime_matches_calendar() {
        let ts = Timescale::default();
        let dt = Utc.with_ymd_and_hms(2025, 2, 7, 12, 0, 0).unwrap();
        let a = ts.from_datetime(&dt);
        let b = ts.utc(2025, 2, 7, 12, 0, 0.0).unwrap();
        assert_relative_eq!(a.tt(), b.tt(), epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let ts = Timescale::default();
        assert!(ts.tt_jd(f64::NAN).is_err());
        assert!(ts.utc_jd(f64::INFINITY).is_err());
        assert!(ts.utc(2025, 2, 30, 0, 0, 0.0).is_err());
        assert!(ts.utc(2025, 2, 7, 24, 0, 0.0).is_err());
    }

    #[test]
    fn test_ut1_uses_delta_t() {
        let ts = Timescale::default();
        let t = ts.tt_jd(J2000).unwrap();
        assert_relative_eq!(t.delta_t(), 63.83, epsilon = 1e-6);
        assert_relative_eq!((t.tt() - t.ut1()) * DAY_S, 63.83, epsilon = 1e-3);
    }

    #[test]
    fn test_empty_tables_collapse_scales() {
        let ts = Timescale::new(DeltaTTable::empty(), LeapSecondTable::empty());
        let t = ts.tt_jd(J2000).unwrap();
        assert_eq!(t.ut1(), t.tt());
        assert_relative_eq!((t.tt() - t.utc()) * DAY_S, TT_MINUS_TAI_S, epsilon = 1e-3);
    }

    #[test]
    fn test_offset_and_ordering() {
        let ts = Timescale::default();
        let t = ts.tt_jd(J2000).unwrap();
        let earlier = t.offset_seconds(-DAY_S);
        assert_relative_eq!(earlier.tt(), J2000 - 1.0, epsilon = 1e-12);
        assert!(earlier < t);
        assert_eq!(earlier.delta_t(), t.delta_t());
        assert_ne!(earlier.cache_key(), t.cache_key());
    }

    #[test]
    fn test_gmst_at_j2000() {
        let ts = Timescale::new(DeltaTTable::empty(), LeapSecondTable::empty());
        let t = ts.tt_jd(J2000).unwrap();
        assert_relative_eq!(t.gmst().get::<degree>(), 18.697_374_558 * 15.0, epsilon = 0.01);
    }

    #[test]
    fn test_display() {
        let ts = Timescale::default();
        let t = ts.tt_jd(J2000).unwrap();
        assert_eq!(t.to_string(), "TT JD 2451545.000000");
    }
}
