//! Type-safe physical quantities built on the `uom` crate
//!
//! Every scalar quantity used by the pipeline is a `uom` SI quantity with a
//! single canonical unit (meters, meters per second, radians per second,
//! radians). Conversions to astronomical units go through the IAU 2012 exact
//! AU rather than uom's rounded `astronomical_unit`.

mod vector;

pub use vector::{PositionVector, QuantityVector, VelocityVector};

// Re-export uom SI quantity types under the names used by the pipeline
pub use uom::si::f64::Angle;
pub use uom::si::f64::AngularVelocity;
pub use uom::si::f64::Length as Distance;
pub use uom::si::f64::Time;
pub use uom::si::f64::Velocity;

// Re-export built-in SI units commonly used in astronomy
pub use uom::si::angle::degree;
pub use uom::si::angle::radian;
pub use uom::si::angle::second as arcsecond;
pub use uom::si::angular_velocity::radian_per_second;
pub use uom::si::length::kilometer;
pub use uom::si::length::meter;
pub use uom::si::time::day;
pub use uom::si::time::second;
pub use uom::si::velocity::kilometer_per_second;
pub use uom::si::velocity::meter_per_second;

use crate::constants::{AU_KM, AU_M, DAY_S};
use std::fmt::Debug;

/// A scalar quantity with one canonical internal unit
pub trait PhysicalQuantity: Copy + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// Build the quantity from a value in its canonical unit
    fn from_canonical(value: f64) -> Self;

    /// The value in its canonical unit
    fn canonical(&self) -> f64;
}

impl PhysicalQuantity for Distance {
    fn from_canonical(value: f64) -> Self {
        Distance::new::<meter>(value)
    }

    fn canonical(&self) -> f64 {
        self.get::<meter>()
    }
}

impl PhysicalQuantity for Velocity {
    fn from_canonical(value: f64) -> Self {
        Velocity::new::<meter_per_second>(value)
    }

    fn canonical(&self) -> f64 {
        self.get::<meter_per_second>()
    }
}

impl PhysicalQuantity for AngularVelocity {
    fn from_canonical(value: f64) -> Self {
        AngularVelocity::new::<radian_per_second>(value)
    }

    fn canonical(&self) -> f64 {
        self.get::<radian_per_second>()
    }
}

impl PhysicalQuantity for Angle {
    fn from_canonical(value: f64) -> Self {
        Angle::new::<radian>(value)
    }

    fn canonical(&self) -> f64 {
        self.get::<radian>()
    }
}

/// Astronomical-unit views of a distance
pub trait DistanceExt {
    fn from_au(au: f64) -> Self;
    fn from_km(km: f64) -> Self;
    fn au(&self) -> f64;
    fn km(&self) -> f64;
}

impl DistanceExt for Distance {
    fn from_au(au: f64) -> Self {
        Distance::new::<meter>(au * AU_M)
    }

    fn from_km(km: f64) -> Self {
        Distance::new::<kilometer>(km)
    }

    fn au(&self) -> f64 {
        self.get::<meter>() / AU_M
    }

    fn km(&self) -> f64 {
        self.get::<kilometer>()
    }
}

/// Per-day views of a velocity, the units ephemerides are tabulated in
pub trait VelocityExt {
    fn from_au_per_day(au_per_day: f64) -> Self;
    fn from_km_per_day(km_per_day: f64) -> Self;
    fn au_per_day(&self) -> f64;
    fn km_per_day(&self) -> f64;
}

impl VelocityExt for Velocity {
    fn from_au_per_day(au_per_day: f64) -> Self {
        Velocity::new::<meter_per_second>(au_per_day * AU_M / DAY_S)
    }

    fn from_km_per_day(km_per_day: f64) -> Self {
        Velocity::new::<kilometer_per_second>(km_per_day / DAY_S)
    }

    fn au_per_day(&self) -> f64 {
        self.get::<meter_per_second>() * DAY_S / AU_M
    }

    fn km_per_day(&self) -> f64 {
        self.get::<kilometer_per_second>() * DAY_S
    }
}

/// Hour-angle view of an angle
pub fn angle_hours(angle: Angle) -> f64 {
    angle.get::<degree>() / 15.0
}

/// Build an angle from hours of right ascension or hour angle
pub fn angle_from_hours(hours: f64) -> Angle {
    Angle::new::<degree>(hours * 15.0)
}

/// Convert AU to kilometers using IAU 2012 exact value
pub fn au_to_km(au: f64) -> f64 {
    au * AU_KM
}

/// Convert kilometers to AU using IAU 2012 exact value
pub fn km_to_au(km: f64) -> f64 {
    km / AU_KM
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_au_conversion() {
        assert_relative_eq!(au_to_km(1.0), 149_597_870.700, epsilon = 1e-6);
        assert_relative_eq!(km_to_au(149_597_870.700), 1.0, epsilon = 1e-15);
        assert_relative_eq!(Distance::from_au(1.0).km(), 149_597_870.700, epsilon = 1e-6);
    }

    #[test]
    fn test_canonical_units() {
        let d = Distance::from_km(2.5);
        assert_relative_eq!(d.canonical(), 2500.0, epsilon = 1e-12);

        let a = Angle::new::<degree>(180.0);
        assert_relative_eq!(a.canonical(), std::f64::consts::PI, epsilon = 1e-15);

        let w = AngularVelocity::from_canonical(7.292115e-5);
        assert_relative_eq!(w.get::<radian_per_second>(), 7.292115e-5, epsilon = 1e-20);
    }

    #[test]
    fn test_equality_and_ordering_by_canonical_value() {
        assert_eq!(Distance::from_km(1.0), Distance::new::<meter>(1000.0));
        assert!(Distance::from_au(1.0) > Distance::from_km(1.0e8));
        assert!(Angle::new::<arcsecond>(3600.0) <= Angle::new::<degree>(1.0 + 1e-12));
    }

    #[test]
    fn test_velocity_per_day() {
        // Earth orbital velocity ~30 km/s
        let v = Velocity::new::<kilometer_per_second>(29.78);
        assert_relative_eq!(v.au_per_day(), 0.017_202, epsilon = 1e-3);
        assert_relative_eq!(v.km_per_day(), 29.78 * 86_400.0, epsilon = 1e-6);

        let roundtrip = Velocity::from_au_per_day(v.au_per_day());
        assert_relative_eq!(roundtrip.get::<kilometer_per_second>(), 29.78, epsilon = 1e-10);
    }

    #[test]
    fn test_hours() {
        assert_relative_eq!(angle_hours(Angle::new::<degree>(90.0)), 6.0, epsilon = 1e-12);
        assert_relative_eq!(
            angle_from_hours(23.5).get::<degree>(),
            352.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_uom_length_velocity_time() {
        // uom dimensional analysis: Length / Time = Velocity
        let dist = Distance::new::<meter>(1000.0);
        let time = Time::new::<second>(10.0);
        let vel: Velocity = dist / time;
        assert_relative_eq!(vel.get::<meter_per_second>(), 100.0, epsilon = 1e-10);
    }
}
