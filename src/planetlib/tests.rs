use std::sync::Arc;

use approx::assert_relative_eq;

use super::*;
use crate::config::PipelineConfig;
use crate::ephemlib::fixtures;
use crate::errors::StarframeError;
use crate::positions::ReferenceFrame;
use crate::time::{Instant, Timescale};
use crate::toposlib::WGS84;
use crate::units::{arcsecond, degree};

fn instant() -> Instant {
    Timescale::default().tt_jd(fixtures::EPOCH_TT).unwrap()
}

fn context(config: PipelineConfig) -> PipelineContext {
    PipelineContext::new(Arc::new(fixtures::solar_system()), config).unwrap()
}

#[test]
fn test_neptune_end_to_end() {
    let ctx = context(PipelineConfig::default());
    let neptune = ctx.body(Body::Neptune, instant());

    let light_time = neptune.light_time().unwrap();
    assert!(light_time.converged);
    assert_eq!((light_time.delay_seconds / 60.0).round(), 255.0);

    let astrometric = neptune.astrometric().unwrap();
    assert_eq!(astrometric.snapshot().center, Some(399));
    let au = astrometric.position().au().norm();
    assert!((30.5..30.8).contains(&au), "distance {au} AU");

    let radec = astrometric.equatorial();
    assert!((23.5..24.0).contains(&radec.ra_hours()), "{radec}");
    assert!((-4.0..-1.0).contains(&radec.dec_degrees()), "{radec}");

    let apparent = neptune.apparent().unwrap();
    let ratio = apparent.distance() / astrometric.distance();
    assert!((ratio.value - 1.0).abs() < 1e-4);

    let magnitude = neptune.apparent_magnitude().unwrap();
    assert!((7.5..8.2).contains(&magnitude), "magnitude {magnitude}");

    let diameter = neptune.angular_diameter().unwrap().get::<arcsecond>();
    assert!((2.1..2.35).contains(&diameter), "diameter {diameter}\"");

    assert!(neptune.phase_angle().unwrap().get::<degree>() < 2.0);
    assert!(neptune.illuminated_fraction().unwrap() > 0.999);
}

#[test]
fn test_stages_are_memoized() {
    let ctx = context(PipelineConfig::default());
    let mars = ctx.body(Body::Mars, instant());
    let first = mars.apparent().unwrap();
    let second = mars.apparent().unwrap();
    assert_eq!(first, second);
    assert_eq!(mars.mean_of_date().unwrap().target(), Body::Mars);
}

#[test]
fn test_shared_cache_gives_same_results() {
    let plain = context(PipelineConfig::default());
    let mut config = PipelineConfig::default();
    config.cache.enabled = true;
    config.cache.max_size = 64;
    let cached = context(config);

    let t = instant();
    for body in [Body::Mars, Body::Neptune, Body::Moon] {
        let expected = plain.body(body, t).apparent().unwrap();
        let once = cached.body(body, t).apparent().unwrap();
        let again = cached.body(body, t).apparent().unwrap();
        assert_eq!(expected, once);
        assert_eq!(once, again);
    }
    assert!(cached.cache().size() > 0);
    assert_eq!(plain.cache().size(), 0);
}

#[test]
fn test_shared_cache_keeps_ephemerides_apart() {
    use crate::cachelib::{CacheKey, CacheValue, ComputationCache, LruCache};
    use crate::ephemlib::{InMemoryEphemeris, LinearSegment};
    use crate::units::kilometer;
    use nalgebra::Vector3;

    let cache: Arc<dyn ComputationCache> = Arc::new(LruCache::<CacheKey, CacheValue>::new(32).unwrap());
    let solar = PipelineContext::with_cache(
        Arc::new(fixtures::solar_system()),
        Arc::clone(&cache),
        PipelineConfig::default(),
    )
    .unwrap();
    let still_sun = InMemoryEphemeris::new().with_segment(LinearSegment::stationary(
        0,
        10,
        Vector3::new(1.0e6, 0.0, 0.0),
    ));
    let still = PipelineContext::with_cache(Arc::new(still_sun), Arc::clone(&cache), PipelineConfig::default())
        .unwrap();

    let t = instant();
    let from_solar = solar.geometric(Body::Sun, &t).unwrap();
    let from_still = still.geometric(Body::Sun, &t).unwrap();
    assert_ne!(from_solar, from_still);
    assert_relative_eq!(from_still.position().x().get::<kilometer>(), 1.0e6, epsilon = 1e-6);
    assert_eq!(cache.size(), 2);

    // Same context again is a hit
    assert_eq!(solar.geometric(Body::Sun, &t).unwrap(), from_solar);
    assert_eq!(cache.size(), 2);
}

#[test]
fn test_deflection_follows_config() {
    let mut config = PipelineConfig::default();
    config.apply_deflection = true;
    let deflected = context(config).body(Body::Mars, instant()).astrometric().unwrap();
    let plain = context(PipelineConfig::default())
        .body(Body::Mars, instant())
        .astrometric()
        .unwrap();

    assert!(deflected.is_deflected());
    assert!(!plain.is_deflected());
    let shift = deflected.separation_from(&plain).get::<arcsecond>();
    assert!(shift > 0.0 && shift < 0.05, "shift {shift}\"");
}

#[test]
fn test_topocentric_observer() {
    let ctx = context(PipelineConfig::default());
    let moon = ctx.body(Body::Moon, instant());
    let sydney = WGS84.latlon(-33.8688, 151.2093, 58.0).unwrap();

    let apparent = moon.apparent().unwrap();
    let topocentric = moon.observed_by(&sydney).unwrap();
    assert_eq!(topocentric.snapshot().center, None);

    // A different site is not served from the memo
    let hobart = WGS84.latlon(-42.8821, 147.3272, 51.0).unwrap();
    assert_ne!(moon.observed_by(&hobart).unwrap(), topocentric);
    assert_eq!(moon.observed_by(&sydney).unwrap(), topocentric);

    // Lunar parallax is up to about a degree
    let parallax = topocentric.separation_from(&apparent).get::<degree>();
    assert!(parallax > 0.0 && parallax < 1.1, "parallax {parallax}°");

    let horizon = sydney.altaz(&topocentric);
    let altitude = horizon.altitude.get::<degree>();
    assert!((-90.0..=90.0).contains(&altitude));
    assert_relative_eq!(
        horizon.distance.get::<crate::units::kilometer>(),
        topocentric.distance().get::<crate::units::kilometer>(),
        epsilon = 1e-6
    );
}

#[test]
fn test_radial_motion() {
    let ctx = context(PipelineConfig::default());
    let t = instant();
    assert_eq!(ctx.body(Body::Moon, t).radial_motion().unwrap(), Some(RadialMotion::Receding));
    assert_eq!(ctx.body(Body::Mars, t).radial_motion().unwrap(), Some(RadialMotion::Receding));
    assert_eq!(ctx.body(Body::Neptune, t).radial_motion().unwrap(), Some(RadialMotion::Approaching));
    assert_eq!(ctx.body(Body::Sun, t).radial_motion().unwrap(), None);
    assert_eq!(RadialMotion::Approaching.to_string(), "approaching");
}

#[test]
fn test_sun_and_moon() {
    let ctx = context(PipelineConfig::default());
    let t = instant();

    let sun = ctx.body(Body::Sun, t);
    let magnitude = sun.apparent_magnitude().unwrap();
    assert!((-26.9..-26.6).contains(&magnitude), "sun magnitude {magnitude}");
    let diameter = sun.angular_diameter().unwrap().get::<degree>();
    assert!((0.5..0.56).contains(&diameter), "sun diameter {diameter}°");

    let moon = ctx.body(Body::Moon, t);
    let km = moon.astrometric().unwrap().distance().get::<crate::units::kilometer>();
    assert!((350_000.0..410_000.0).contains(&km), "moon distance {km} km");
    assert!(moon.apparent_magnitude().unwrap().is_finite());
    let fraction = moon.illuminated_fraction().unwrap();
    assert!((0.0..=1.0).contains(&fraction));
}

#[test]
fn test_unsupported_cases() {
    let ctx = context(PipelineConfig::default());
    let t = instant();

    // The Earth seen from its own center
    let earth = ctx.body(Body::Earth, t);
    assert!(earth.astrometric().unwrap().position().is_zero());
    assert!(matches!(
        earth.apparent_magnitude(),
        Err(StarframeError::UnsupportedBody { .. })
    ));
    assert_relative_eq!(earth.angular_diameter().unwrap().get::<degree>(), 180.0, epsilon = 1e-9);

    // No segments for Jupiter in the fixture
    assert!(matches!(
        ctx.body(Body::Jupiter, t).apparent(),
        Err(StarframeError::SegmentNotFound { center: 0, target: 5 })
    ));
}

#[test]
fn test_out_of_range_epoch_propagates() {
    use crate::ephemlib::{ChebyshevRecord, ChebyshevSegment, InMemoryEphemeris};

    let record = ChebyshevRecord::new(fixtures::EPOCH_TT, 1.0, vec![1.0e8], vec![0.0], vec![0.0]);
    let segment = ChebyshevSegment::new(0, 10, vec![record]).unwrap();
    let ephemeris = InMemoryEphemeris::new().with_segment(segment);
    let ctx = PipelineContext::new(Arc::new(ephemeris), PipelineConfig::default()).unwrap();

    let later = Timescale::default().tt_jd(fixtures::EPOCH_TT + 10.0).unwrap();
    assert!(matches!(
        ctx.body(Body::Sun, later).geometric(),
        Err(StarframeError::OutOfRange { .. })
    ));
}

#[test]
fn test_body_lookup() {
    assert_eq!(Body::from_name("  NEPTUNE "), Some(Body::Neptune));
    assert_eq!(Body::from_name("moon"), Some(Body::Moon));
    assert_eq!(Body::from_name("vulcan"), None);
    assert_eq!(Body::from_naif_id(8), Some(Body::Neptune));
    assert_eq!(Body::from_naif_id(899), Some(Body::Neptune));
    assert_eq!(Body::from_naif_id(3), None);

    for body in Body::ALL {
        assert_eq!(Body::from_naif_id(body.naif_id()), Some(body));
        assert_eq!(body.segment_chain()[0].0, 0);
        assert_eq!(body.to_string(), body.name());
    }
    assert_eq!(Body::Moon.primary(), Some(Body::Earth));
    assert_eq!(Body::Sun.primary(), None);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = PipelineConfig::default();
    config.light_time.max_iterations = 0;
    assert!(matches!(
        PipelineContext::new(Arc::new(fixtures::solar_system()), config),
        Err(StarframeError::Config(_))
    ));
}
