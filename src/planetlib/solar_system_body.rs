use std::fmt;
use std::num::NonZeroUsize;

use super::{Body, PipelineContext};
use crate::cachelib::{fetch_typed, CacheKey, CacheOperation, CacheQualifier, CacheValue, LruCache};
use crate::ephemlib::chain_state;
use crate::errors::Result;
use crate::lighttime::LightTimeSolution;
use crate::magnitudelib::{apparent_magnitude, MagnitudeGeometry};
use crate::positions::{Apparent, Astrometric, Geometric, MeanOfDate, ReferenceFrame, Topocentric};
use crate::time::Instant;
use crate::toposlib::Observer;
use crate::units::{radian, Angle, PositionVector};

/// Stages memoized per body instance, plus a few observers
const MEMO_CAPACITY: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Whether a body is closing on or moving away from its primary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialMotion {
    Approaching,
    Receding,
}

impl fmt::Display for RadialMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RadialMotion::Approaching => "approaching",
            RadialMotion::Receding => "receding",
        })
    }
}

/// One body at one instant, seen from the Earth
///
/// Each stage is computed on first use and kept in a small memo owned by
/// this value; geometric states also go through the context's shared cache.
#[derive(Debug)]
pub struct SolarSystemBody<'a> {
    context: &'a PipelineContext,
    body: Body,
    instant: Instant,
    memo: LruCache<CacheKey, CacheValue>,
}

impl<'a> SolarSystemBody<'a> {
    pub fn new(context: &'a PipelineContext, body: Body, instant: Instant) -> Self {
        Self {
            context,
            body,
            instant,
            memo: LruCache::with_capacity(MEMO_CAPACITY),
        }
    }

    pub fn body(&self) -> Body {
        self.body
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    fn key(&self, operation: CacheOperation) -> CacheKey {
        CacheKey::new(operation, &self.instant, self.body.segment_chain())
    }

    pub fn geometric(&self) -> Result<Geometric> {
        fetch_typed(&self.memo, self.key(CacheOperation::Geometric), || {
            self.context.geometric(self.body, &self.instant)
        })
    }

    /// Light-time corrected position relative to the Earth's center,
    /// deflected when the configuration asks for it
    pub fn astrometric(&self) -> Result<Astrometric> {
        let deflect = self.context.config().apply_deflection;
        let key = self
            .key(CacheOperation::Astrometric)
            .with_qualifier(CacheQualifier::Deflected(deflect));
        fetch_typed(&self.memo, key, || {
            let target = self.geometric()?;
            let earth = self.context.geometric(Body::Earth, &self.instant)?;
            let ephemeris = self.context.ephemeris();
            let astrometric =
                Astrometric::from_geometric(&target, &earth, ephemeris, self.context.light_time_solver())?;
            if deflect {
                astrometric.with_deflection(ephemeris)
            } else {
                Ok(astrometric)
            }
        })
    }

    pub fn mean_of_date(&self) -> Result<MeanOfDate> {
        fetch_typed(&self.memo, self.key(CacheOperation::MeanOfDate), || {
            let precession = self.context.precession_matrix(&self.instant)?;
            Ok(MeanOfDate::from_astrometric(&self.astrometric()?, &precession))
        })
    }

    pub fn apparent(&self) -> Result<Apparent> {
        fetch_typed(&self.memo, self.key(CacheOperation::Apparent), || {
            let precession = self.context.precession_matrix(&self.instant)?;
            let nutation = self.context.nutation_matrix(&self.instant)?;
            Ok(Apparent::from_astrometric(&self.astrometric()?, &precession, &nutation))
        })
    }

    /// Apparent position relative to `observer`
    pub fn observed_by(&self, observer: &Observer) -> Result<Topocentric> {
        let key = self
            .key(CacheOperation::Topocentric)
            .with_qualifier(observer.cache_qualifier());
        fetch_typed(&self.memo, key, || {
            Ok(Topocentric::from_apparent(
                &self.apparent()?,
                &observer.geocentric_position(&self.instant),
                &observer.geocentric_velocity(&self.instant),
            ))
        })
    }

    pub fn light_time(&self) -> Result<LightTimeSolution> {
        Ok(*self.astrometric()?.light_time())
    }

    /// Sun and observer vectors at the time the light left the body
    fn magnitude_geometry(&self) -> Result<MagnitudeGeometry> {
        let astrometric = self.astrometric()?;
        let light_time = astrometric.light_time();
        let emitted = self.instant.tt() - light_time.delay_days();
        let sun = chain_state(self.context.ephemeris(), Body::Sun.segment_chain(), emitted)?;
        let sun_to_target = light_time.position - PositionVector::from_km(sun.position);
        Ok(MagnitudeGeometry::new(sun_to_target.au(), astrometric.position().au()))
    }

    /// Sun-body-Earth angle
    pub fn phase_angle(&self) -> Result<Angle> {
        Ok(self.magnitude_geometry()?.phase_angle())
    }

    /// Fraction of the visible disk that is lit, (1 + cos i) / 2
    pub fn illuminated_fraction(&self) -> Result<f64> {
        let i = self.phase_angle()?.get::<radian>();
        Ok((1.0 + i.cos()) / 2.0)
    }

    pub fn apparent_magnitude(&self) -> Result<f64> {
        apparent_magnitude(self.body, &self.magnitude_geometry()?, self.instant.year())
    }

    /// Apparent diameter of the mean-radius sphere, 180° when the observer is inside it
    pub fn angular_diameter(&self) -> Result<Angle> {
        let distance = self.astrometric()?.distance();
        let ratio = (self.body.mean_radius() / distance).value;
        let half = if ratio.is_finite() { ratio.min(1.0).asin() } else { std::f64::consts::FRAC_PI_2 };
        Ok(Angle::new::<radian>(2.0 * half))
    }

    /// Radial motion relative to the primary; `None` for the Sun or when
    /// the range rate is exactly zero
    pub fn radial_motion(&self) -> Result<Option<RadialMotion>> {
        let Some(primary) = self.body.primary() else {
            return Ok(None);
        };
        let body = self.geometric()?;
        let primary = self.context.geometric(primary, &self.instant)?;
        let relative_position = body.position() - primary.position();
        let relative_velocity = body.velocity() - primary.velocity();
        let range_rate = relative_position.canonical().dot(&relative_velocity.canonical());
        Ok(if range_rate < 0.0 {
            Some(RadialMotion::Approaching)
        } else if range_rate > 0.0 {
            Some(RadialMotion::Receding)
        } else {
            None
        })
    }
}
