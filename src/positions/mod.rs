//! Reference-frame pipeline
//!
//! A body's position passes through five stages, each built from the one
//! before it:
//!
//! 1. [`Geometric`]: barycentric state straight from the ephemeris
//! 2. [`Astrometric`]: light-time corrected, relative to the observer's
//!    geometric position
//! 3. [`MeanOfDate`]: astrometric rotated onto the mean equator and equinox
//!    of date (frame bias and precession)
//! 4. [`Apparent`]: astrometric rotated onto the true equator and equinox of
//!    date (adding nutation) and displaced by annual aberration
//! 5. [`Topocentric`]: apparent minus the observer's geocentric state
//!
//! Every stage is an immutable [`Snapshot`] behind the sealed
//! [`ReferenceFrame`] trait, which supplies equatorial and ecliptic
//! coordinates.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::Matrix3;

use crate::constants::{ASEC2RAD, J2000_OBLIQUITY_ASEC};
use crate::ephemlib::Ephemeris;
use crate::errors::Result;
use crate::framelib::{equatorial_to_ecliptic, ICRS_TO_J2000};
use crate::lighttime::{LightTimeDelay, LightTimeSolution};
use crate::nutationlib::Nutation;
use crate::planetlib::Body;
use crate::relativity::{Deflection, RelativisticAberration};
use crate::time::Instant;
use crate::units::{angle_hours, degree, radian, Angle, Distance, DistanceExt, PositionVector, VelocityVector};

/// The five pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Geometric,
    Astrometric,
    MeanOfDate,
    Apparent,
    Topocentric,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameKind::Geometric => "geometric",
            FrameKind::Astrometric => "astrometric",
            FrameKind::MeanOfDate => "mean of date",
            FrameKind::Apparent => "apparent",
            FrameKind::Topocentric => "topocentric",
        };
        f.write_str(name)
    }
}

/// State shared by every stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub position: PositionVector,
    pub velocity: VelocityVector,
    pub instant: Instant,
    /// NAIF id of the origin; `None` for a point on the Earth's surface
    pub center: Option<i32>,
    pub target: Body,
}

/// Right ascension and declination with distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialCoordinates {
    pub right_ascension: Angle,
    pub declination: Angle,
    pub distance: Distance,
}

impl EquatorialCoordinates {
    pub fn from_position(position: &PositionVector) -> Self {
        let (lon, lat, r) = spherical(position);
        Self {
            right_ascension: lon,
            declination: lat,
            distance: r,
        }
    }

    pub fn ra_hours(&self) -> f64 {
        angle_hours(self.right_ascension)
    }

    pub fn dec_degrees(&self) -> f64 {
        self.declination.get::<degree>()
    }
}

impl fmt::Display for EquatorialCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RA {:.6}h Dec {:+.6}° dist {:.9} AU",
            self.ra_hours(),
            self.dec_degrees(),
            self.distance.au()
        )
    }
}

/// Ecliptic longitude and latitude with distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticCoordinates {
    pub longitude: Angle,
    pub latitude: Angle,
    pub distance: Distance,
}

impl fmt::Display for EclipticCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lon {:.6}° lat {:+.6}° dist {:.9} AU",
            self.longitude.get::<degree>(),
            self.latitude.get::<degree>(),
            self.distance.au()
        )
    }
}

/// Longitude in [0, 2π) from the x and y components
///
/// The arctangent of y/x is shifted by 2π when x > 0 and y < 0, and by π when
/// x < 0. On the y axis the result is π/2 or 3π/2, and 0 at the origin.
pub fn longitude_from_components(x: f64, y: f64) -> f64 {
    if x > 0.0 {
        let raw = (y / x).atan();
        if y >= 0.0 {
            raw
        } else {
            raw + 2.0 * PI
        }
    } else if x < 0.0 {
        (y / x).atan() + PI
    } else if y > 0.0 {
        PI / 2.0
    } else if y < 0.0 {
        3.0 * PI / 2.0
    } else {
        0.0
    }
}

/// (longitude, latitude, distance) of a vector; all zero for the zero vector
fn spherical(position: &PositionVector) -> (Angle, Angle, Distance) {
    let v = position.canonical();
    let r = v.norm();
    if r == 0.0 {
        return (Angle::new::<radian>(0.0), Angle::new::<radian>(0.0), Distance::from_au(0.0));
    }
    let lon = longitude_from_components(v.x, v.y);
    let lat = (v.z / r).clamp(-1.0, 1.0).asin();
    (
        Angle::new::<radian>(lon),
        Angle::new::<radian>(lat),
        position.magnitude(),
    )
}

mod sealed {
    pub trait Sealed {}
}

/// Behavior common to the five stages
pub trait ReferenceFrame: sealed::Sealed + Clone + fmt::Debug + Send + Sync {
    const KIND: FrameKind;

    fn snapshot(&self) -> &Snapshot;

    /// Obliquity of the ecliptic for this stage's equator and equinox
    fn obliquity(&self) -> Angle;

    fn position(&self) -> PositionVector {
        self.snapshot().position
    }

    fn velocity(&self) -> VelocityVector {
        self.snapshot().velocity
    }

    fn instant(&self) -> Instant {
        self.snapshot().instant
    }

    fn target(&self) -> Body {
        self.snapshot().target
    }

    fn equatorial(&self) -> EquatorialCoordinates {
        EquatorialCoordinates::from_position(&self.snapshot().position)
    }

    fn ecliptic(&self) -> EclipticCoordinates {
        let rotation = equatorial_to_ecliptic(self.obliquity().get::<radian>());
        let (lon, lat, r) = spherical(&self.snapshot().position.rotate(&rotation));
        EclipticCoordinates {
            longitude: lon,
            latitude: lat,
            distance: r,
        }
    }

    fn distance(&self) -> Distance {
        self.snapshot().position.magnitude()
    }

    /// Angle between this position and another, zero if either is at the origin
    fn separation_from<F: ReferenceFrame>(&self, other: &F) -> Angle {
        self.snapshot().position.angle_to(&other.snapshot().position)
    }
}

fn j2000_obliquity() -> Angle {
    Angle::new::<radian>(J2000_OBLIQUITY_ASEC * ASEC2RAD)
}

/// Barycentric state of a body
#[derive(Debug, Clone, PartialEq)]
pub struct Geometric {
    snapshot: Snapshot,
}

impl Geometric {
    pub fn new(target: Body, instant: Instant, position: PositionVector, velocity: VelocityVector) -> Self {
        Self {
            snapshot: Snapshot {
                position,
                velocity,
                instant,
                center: Some(0),
                target,
            },
        }
    }
}

/// Light-time corrected position relative to an observing body
#[derive(Debug, Clone, PartialEq)]
pub struct Astrometric {
    snapshot: Snapshot,
    observer: Geometric,
    light_time: LightTimeSolution,
    deflected: bool,
}

impl Astrometric {
    /// Observe `target` from `observer`; both must be at the same instant
    pub fn from_geometric(
        target: &Geometric,
        observer: &Geometric,
        ephemeris: &dyn Ephemeris,
        solver: &LightTimeDelay,
    ) -> Result<Self> {
        let light_time = solver.solve(observer.snapshot(), target.snapshot(), ephemeris)?;
        let obs = observer.snapshot();
        Ok(Self {
            snapshot: Snapshot {
                position: light_time.position - obs.position,
                velocity: light_time.velocity - obs.velocity,
                instant: obs.instant,
                center: Some(obs.target.naif_id()),
                target: target.snapshot().target,
            },
            observer: observer.clone(),
            light_time,
            deflected: false,
        })
    }

    /// Bend the position by the Sun's gravity
    ///
    /// Applying it twice has no further effect.
    pub fn with_deflection(&self, ephemeris: &dyn Ephemeris) -> Result<Self> {
        if self.deflected {
            return Ok(self.clone());
        }
        let position = Deflection::apply(
            &self.snapshot.position,
            &self.observer.snapshot().position,
            &self.snapshot.instant,
            ephemeris,
        )?;
        Ok(Self {
            snapshot: Snapshot {
                position,
                ..self.snapshot
            },
            deflected: true,
            ..self.clone()
        })
    }

    pub fn light_time(&self) -> &LightTimeSolution {
        &self.light_time
    }

    /// The observing body's barycentric state
    pub fn observer(&self) -> &Geometric {
        &self.observer
    }

    pub fn is_deflected(&self) -> bool {
        self.deflected
    }

    #[cfg(test)]
    pub(crate) fn from_parts(snapshot: Snapshot, observer: Geometric, light_time: LightTimeSolution) -> Self {
        Self {
            snapshot,
            observer,
            light_time,
            deflected: false,
        }
    }
}

/// Astrometric position on the mean equator and equinox of date
#[derive(Debug, Clone, PartialEq)]
pub struct MeanOfDate {
    snapshot: Snapshot,
}

impl MeanOfDate {
    /// Rotate by `precession` after the ICRS frame bias
    pub fn from_astrometric(astrometric: &Astrometric, precession: &Matrix3<f64>) -> Self {
        let rotation = precession * *ICRS_TO_J2000;
        let source = astrometric.snapshot();
        Self {
            snapshot: Snapshot {
                position: source.position.rotate(&rotation),
                velocity: source.velocity.rotate(&rotation),
                ..*source
            },
        }
    }
}

/// Position on the true equator and equinox of date, corrected for aberration
#[derive(Debug, Clone, PartialEq)]
pub struct Apparent {
    snapshot: Snapshot,
    light_time: LightTimeSolution,
}

impl Apparent {
    /// Rotate by nutation × precession × frame bias and apply aberration
    /// from the observer's barycentric velocity
    pub fn from_astrometric(
        astrometric: &Astrometric,
        precession: &Matrix3<f64>,
        nutation: &Matrix3<f64>,
    ) -> Self {
        let rotation = nutation * precession * *ICRS_TO_J2000;
        let source = astrometric.snapshot();
        let observer_velocity = astrometric.observer().snapshot().velocity.rotate(&rotation);
        let rotated = source.position.rotate(&rotation);
        let position = RelativisticAberration::apply(
            &rotated,
            &observer_velocity,
            astrometric.light_time().delay_days(),
        );
        Self {
            snapshot: Snapshot {
                position,
                velocity: source.velocity.rotate(&rotation),
                ..*source
            },
            light_time: *astrometric.light_time(),
        }
    }

    pub fn light_time(&self) -> &LightTimeSolution {
        &self.light_time
    }
}

/// Apparent position relative to a point on the Earth's surface
#[derive(Debug, Clone, PartialEq)]
pub struct Topocentric {
    snapshot: Snapshot,
}

impl Topocentric {
    /// Subtract the observer's geocentric state, given in the true
    /// equator and equinox of date
    pub fn from_apparent(
        apparent: &Apparent,
        observer_position: &PositionVector,
        observer_velocity: &VelocityVector,
    ) -> Self {
        let source = apparent.snapshot();
        Self {
            snapshot: Snapshot {
                position: source.position - *observer_position,
                velocity: source.velocity - *observer_velocity,
                center: None,
                ..*source
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

macro_rules! reference_frame {
    ($($ty:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(
                        f,
                        "{} {} at {}: {}",
                        Self::KIND,
                        self.snapshot.target,
                        self.snapshot.instant,
                        self.equatorial()
                    )
                }
            }
        )*
    };
}

reference_frame!(Geometric, Astrometric, MeanOfDate, Apparent, Topocentric);

impl ReferenceFrame for Geometric {
    const KIND: FrameKind = FrameKind::Geometric;

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn obliquity(&self) -> Angle {
        j2000_obliquity()
    }
}

impl ReferenceFrame for Astrometric {
    const KIND: FrameKind = FrameKind::Astrometric;

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn obliquity(&self) -> Angle {
        j2000_obliquity()
    }
}

impl ReferenceFrame for MeanOfDate {
    const KIND: FrameKind = FrameKind::MeanOfDate;

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn obliquity(&self) -> Angle {
        Nutation::mean_obliquity(&self.snapshot.instant)
    }
}

impl ReferenceFrame for Apparent {
    const KIND: FrameKind = FrameKind::Apparent;

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn obliquity(&self) -> Angle {
        Nutation::true_obliquity(&self.snapshot.instant)
    }
}

impl ReferenceFrame for Topocentric {
    const KIND: FrameKind = FrameKind::Topocentric;

    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn obliquity(&self) -> Angle {
        Nutation::true_obliquity(&self.snapshot.instant)
    }
}
