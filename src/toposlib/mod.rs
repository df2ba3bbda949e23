//! Observers on the Earth's surface
//!
//! An [`Observer`] is a geodetic location on a [`Geoid`]. Its fixed ITRS
//! position is rotated by Greenwich apparent sidereal time into the true
//! equator and equinox of date, where it is subtracted from apparent
//! positions to give topocentric ones.
//!
//! ```text
//! geodetic (lat/lon/elev) -> ITRS xyz -> R3(-GAST) -> true equator of date
//! ```
//!
//! Polar motion is neglected.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::cachelib::CacheQualifier;
use crate::constants::{EARTH_ANGVEL, EARTH_RADIUS, IERS_2010_INVERSE_EARTH_FLATTENING};
use crate::errors::{Result, StarframeError};
use crate::framelib::rot_z;
use crate::positions::{ReferenceFrame, Topocentric};
use crate::time::Instant;
use crate::units::{
    degree, meter, radian, radian_per_second, Angle, AngularVelocity, Distance, PositionVector,
    VelocityVector,
};

/// An Earth ellipsoid used for geodetic-to-geocentric conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geoid {
    pub name: &'static str,
    /// Equatorial radius in meters
    pub radius: f64,
    pub inverse_flattening: f64,
    one_minus_flattening_squared: f64,
}

impl Geoid {
    pub const fn new(name: &'static str, radius: f64, inverse_flattening: f64) -> Self {
        let f = 1.0 / inverse_flattening;
        let omf = 1.0 - f;
        Geoid {
            name,
            radius,
            inverse_flattening,
            one_minus_flattening_squared: omf * omf,
        }
    }

    /// An observer at geodetic latitude and longitude (degrees, east
    /// positive) and elevation above the ellipsoid (meters)
    pub fn latlon(&self, latitude_degrees: f64, longitude_degrees: f64, elevation_m: f64) -> Result<Observer> {
        if !latitude_degrees.is_finite() || !longitude_degrees.is_finite() || !elevation_m.is_finite() {
            return Err(StarframeError::InvalidLocation(format!(
                "non-finite coordinates ({latitude_degrees}, {longitude_degrees}, {elevation_m})"
            )));
        }
        if latitude_degrees.abs() > 90.0 {
            return Err(StarframeError::InvalidLocation(format!(
                "latitude {latitude_degrees} is outside [-90, 90]"
            )));
        }

        let lat = latitude_degrees.to_radians();
        let lon = longitude_degrees.to_radians();
        let (sinphi, cosphi) = lat.sin_cos();

        // Radius of curvature in the prime vertical, in units of the equatorial radius
        let c = 1.0 / (cosphi * cosphi + sinphi * sinphi * self.one_minus_flattening_squared).sqrt();
        let s = self.one_minus_flattening_squared * c;

        let xy = (self.radius * c + elevation_m) * cosphi;
        let itrs = Vector3::new(
            xy * lon.cos(),
            xy * lon.sin(),
            (self.radius * s + elevation_m) * sinphi,
        );

        Ok(Observer {
            geoid: *self,
            latitude: Angle::new::<radian>(lat),
            longitude: Angle::new::<radian>(lon),
            elevation: Distance::new::<meter>(elevation_m),
            itrs: PositionVector::from_canonical(itrs),
        })
    }
}

/// WGS84 ellipsoid
pub const WGS84: Geoid = Geoid::new("WGS84", 6_378_137.0, 298.257_223_563);

/// IERS 2010 ellipsoid
pub const IERS2010: Geoid = Geoid::new("IERS2010", EARTH_RADIUS, IERS_2010_INVERSE_EARTH_FLATTENING);

/// Altitude above the horizon and azimuth east of north
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCoordinates {
    pub altitude: Angle,
    pub azimuth: Angle,
    pub distance: Distance,
}

/// A fixed point on the Earth's surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    geoid: Geoid,
    latitude: Angle,
    longitude: Angle,
    elevation: Distance,
    itrs: PositionVector,
}

impl Observer {
    pub fn geoid(&self) -> &Geoid {
        &self.geoid
    }

    pub fn latitude(&self) -> Angle {
        self.latitude
    }

    pub fn longitude(&self) -> Angle {
        self.longitude
    }

    pub fn elevation(&self) -> Distance {
        self.elevation
    }

    /// Earth-fixed (ITRS) position
    pub fn itrs_position(&self) -> PositionVector {
        self.itrs
    }

    /// Rotation from the true equator and equinox of date to the Earth-fixed frame
    pub fn earth_fixed_rotation(&self, instant: &Instant) -> Matrix3<f64> {
        rot_z(instant.gast().get::<radian>())
    }

    /// Geocentric position in the true equator and equinox of date
    pub fn geocentric_position(&self, instant: &Instant) -> PositionVector {
        self.itrs.rotate(&self.earth_fixed_rotation(instant).transpose())
    }

    /// Velocity from the Earth's rotation, in the true equator and equinox of date
    pub fn geocentric_velocity(&self, instant: &Instant) -> VelocityVector {
        let omega = AngularVelocity::new::<radian_per_second>(EARTH_ANGVEL);
        let spin = Vector3::new(0.0, 0.0, omega.get::<radian_per_second>());
        let itrs_velocity = spin.cross(&self.itrs.canonical());
        VelocityVector::from_canonical(itrs_velocity)
            .rotate(&self.earth_fixed_rotation(instant).transpose())
    }

    /// Local apparent sidereal time
    pub fn local_sidereal_time(&self, instant: &Instant) -> Angle {
        let lst = (instant.gast() + self.longitude).get::<radian>().rem_euclid(2.0 * PI);
        Angle::new::<radian>(lst)
    }

    /// Horizontal coordinates of a topocentric position seen from here
    pub fn altaz(&self, topocentric: &Topocentric) -> HorizontalCoordinates {
        let itrs = self.earth_fixed_rotation(&topocentric.instant()) * topocentric.position().canonical();
        let (alt, az) = self.itrs_to_horizon(&itrs);
        HorizontalCoordinates {
            altitude: Angle::new::<radian>(alt),
            azimuth: Angle::new::<radian>(az),
            distance: topocentric.distance(),
        }
    }

    /// (altitude, azimuth) in radians of an ITRS direction
    fn itrs_to_horizon(&self, direction: &Vector3<f64>) -> (f64, f64) {
        let (slat, clat) = self.latitude.get::<radian>().sin_cos();
        let (slon, clon) = self.longitude.get::<radian>().sin_cos();

        // Local south, east and up axes
        let south = slat * clon * direction.x + slat * slon * direction.y - clat * direction.z;
        let east = -slon * direction.x + clon * direction.y;
        let up = clat * clon * direction.x + clat * slon * direction.y + slat * direction.z;

        let alt = up.atan2((south * south + east * east).sqrt());
        let az = east.atan2(-south).rem_euclid(2.0 * PI);
        (alt, az)
    }

    /// Exact identity of this location for cache keys
    pub fn cache_qualifier(&self) -> CacheQualifier {
        let itrs = self.itrs.canonical();
        CacheQualifier::Observer {
            geoid: self.geoid.name,
            itrs_bits: [itrs.x.to_bits(), itrs.y.to_bits(), itrs.z.to_bits()],
        }
    }
}

impl fmt::Display for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_d = self.latitude.get::<degree>();
        let lon_d = self.longitude.get::<degree>();
        let ns = if lat_d >= 0.0 { "N" } else { "S" };
        let ew = if lon_d >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}° {}, {:.4}° {}, {:.1} m ({})",
            lat_d.abs(),
            ns,
            lon_d.abs(),
            ew,
            self.elevation.get::<meter>(),
            self.geoid.name
        )
    }
}
