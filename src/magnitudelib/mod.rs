//! Visual magnitudes of solar system bodies
//!
//! Planets follow Mallama & Hilton (2018). The Sun uses its absolute visual
//! magnitude at 1 AU and the Moon the Allen phase-law formula.
//!
//! Formulas that are undefined for the given geometry (Saturn at large phase
//! angles, Neptune before 2000 at large phase angles) give `f64::NAN`.

use nalgebra::Vector3;

use crate::constants::RAD2DEG;
use crate::errors::{Result, StarframeError};
use crate::planetlib::Body;
use crate::units::{degree, Angle};

/// Saturn's north pole direction in ICRF (J2000 equatorial)
const SATURN_POLE: [f64; 3] = [0.08547883, 0.07323576, 0.99364475];
/// Uranus's north pole direction in ICRF (J2000 equatorial)
const URANUS_POLE: [f64; 3] = [-0.21199958, -0.94155916, -0.26176809];

/// Apparent visual magnitude of the Sun at 1 AU
const SUN_MAGNITUDE_1AU: f64 = -26.74;

/// Sun-target-observer configuration, ICRF vectors in AU
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeGeometry {
    pub sun_to_target: Vector3<f64>,
    pub observer_to_target: Vector3<f64>,
}

impl MagnitudeGeometry {
    pub fn new(sun_to_target: Vector3<f64>, observer_to_target: Vector3<f64>) -> Self {
        Self {
            sun_to_target,
            observer_to_target,
        }
    }

    /// Heliocentric distance in AU
    pub fn r(&self) -> f64 {
        self.sun_to_target.norm()
    }

    /// Observer distance in AU
    pub fn delta(&self) -> f64 {
        self.observer_to_target.norm()
    }

    /// Sun-target-observer angle, zero when either leg has zero length
    pub fn phase_angle(&self) -> Angle {
        Angle::new::<degree>(angle_between(&self.sun_to_target, &self.observer_to_target) * RAD2DEG)
    }
}

/// Apparent visual magnitude of `body`
///
/// `year` is the decimal year of observation, used by Neptune's secular
/// brightening term.
pub fn apparent_magnitude(body: Body, geometry: &MagnitudeGeometry, year: f64) -> Result<f64> {
    let r = geometry.r();
    let delta = geometry.delta();
    if delta == 0.0 || (body != Body::Sun && r == 0.0) {
        return Err(unsupported(body, "observer or Sun coincides with the target"));
    }
    let ph_ang = geometry.phase_angle().get::<degree>();
    let sun_to_target = &geometry.sun_to_target;
    let observer_to_target = &geometry.observer_to_target;

    match body {
        Body::Sun => Ok(SUN_MAGNITUDE_1AU + 5.0 * delta.log10()),
        Body::Moon => Ok(moon_magnitude(r, delta, ph_ang)),
        Body::Mercury => Ok(mercury_magnitude(r, delta, ph_ang)),
        Body::Venus => Ok(venus_magnitude(r, delta, ph_ang)),
        Body::Earth => Ok(earth_magnitude(r, delta, ph_ang)),
        Body::Mars => Ok(mars_magnitude(r, delta, ph_ang)),
        Body::Jupiter => Ok(jupiter_magnitude(r, delta, ph_ang)),
        Body::Saturn => {
            let (sun_lat, obs_lat) = sub_latitudes(&SATURN_POLE, sun_to_target, observer_to_target);
            Ok(saturn_magnitude(r, delta, ph_ang, sun_lat, obs_lat))
        }
        Body::Uranus => {
            let (sun_lat, obs_lat) = sub_latitudes(&URANUS_POLE, sun_to_target, observer_to_target);
            Ok(uranus_magnitude(r, delta, ph_ang, sun_lat, obs_lat))
        }
        Body::Neptune => Ok(neptune_magnitude(r, delta, ph_ang, year)),
        Body::Pluto => Err(unsupported(body, "no magnitude law")),
    }
}

fn unsupported(body: Body, reason: &str) -> StarframeError {
    StarframeError::UnsupportedBody {
        operation: format!("apparent magnitude ({reason})"),
        body: body.name().to_string(),
    }
}

/// Planetocentric latitudes (degrees) of the sub-solar and sub-observer points
fn sub_latitudes(pole: &[f64; 3], sun_to_target: &Vector3<f64>, observer_to_target: &Vector3<f64>) -> (f64, f64) {
    let pole = Vector3::from_column_slice(pole);
    (
        angle_between(&pole, sun_to_target) * RAD2DEG - 90.0,
        angle_between(&pole, observer_to_target) * RAD2DEG - 90.0,
    )
}

/// Angle between two vectors in radians, zero if either is zero
fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let (na, nb) = (a.norm(), b.norm());
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0).acos()
}

fn moon_magnitude(r: f64, delta: f64, ph_ang: f64) -> f64 {
    0.21 + 5.0 * (r * delta).log10() + 0.026 * ph_ang.abs() + 4.0e-9 * ph_ang.powi(4)
}

/// Mercury magnitude (Mallama & Hilton 2018, Eq. 1)
fn mercury_magnitude(r: f64, delta: f64, ph_ang: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();
    let ph_ang_factor = 6.3280e-02 * ph_ang - 1.6336e-03 * ph_ang.powi(2)
        + 3.3644e-05 * ph_ang.powi(3)
        - 3.4265e-07 * ph_ang.powi(4)
        + 1.6893e-09 * ph_ang.powi(5)
        - 3.0334e-12 * ph_ang.powi(6);
    -0.613 + distance_mag_factor + ph_ang_factor
}

/// Venus magnitude (Eqs. 2-3)
fn venus_magnitude(r: f64, delta: f64, ph_ang: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();
    let (a0, a1, a2, a3, a4) = if ph_ang < 163.7 {
        (0.0, -1.044e-03, 3.687e-04, -2.814e-06, 8.938e-09)
    } else {
        (236.05828 + 4.384, -2.81914e+00, 8.39034e-03, 0.0, 0.0)
    };
    let ph_ang_factor = a0 + ph_ang * (a1 + ph_ang * (a2 + ph_ang * (a3 + ph_ang * a4)));
    -4.384 + distance_mag_factor + ph_ang_factor
}

/// Earth magnitude (Eq. 4)
fn earth_magnitude(r: f64, delta: f64, ph_ang: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();
    let ph_ang_factor = -1.060e-03 * ph_ang + 2.054e-04 * ph_ang.powi(2);
    -3.99 + distance_mag_factor + ph_ang_factor
}

/// Mars magnitude (Eqs. 5-6), without the surface albedo terms
fn mars_magnitude(r: f64, delta: f64, ph_ang: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();
    let (a, b, v0) = if ph_ang <= 50.0 {
        (2.267e-02, -1.302e-04, -1.601)
    } else {
        (-0.02573, 0.0003445, -0.367)
    };
    v0 + distance_mag_factor + a * ph_ang + b * ph_ang.powi(2)
}

/// Jupiter magnitude (Eqs. 7-8)
fn jupiter_magnitude(r: f64, delta: f64, ph_ang: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();

    if ph_ang <= 12.0 {
        let ph_ang_factor = (6.16e-04 * ph_ang - 3.7e-04) * ph_ang;
        -9.395 + distance_mag_factor + ph_ang_factor
    } else {
        let p = ph_ang / 180.0;
        let inner = ((((-1.876 * p + 2.809) * p - 0.062) * p - 0.363) * p - 1.507) * p + 1.0;
        -9.428 + distance_mag_factor - 2.5 * inner.log10()
    }
}

/// Saturn globe and rings (Eq. 10); NaN outside its validity range
fn saturn_magnitude(r: f64, delta: f64, ph_ang: f64, sun_sub_lat: f64, earth_sub_lat: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();

    let product = sun_sub_lat * earth_sub_lat;
    let sub_lat_geoc = if product >= 0.0 { product.sqrt() } else { 0.0 };

    if ph_ang <= 6.5 && sub_lat_geoc <= 27.0 {
        let s = (sub_lat_geoc / RAD2DEG).sin();
        -8.914 - 1.825 * s + 0.026 * ph_ang - 0.378 * s * (-2.25 * ph_ang).exp() + distance_mag_factor
    } else {
        f64::NAN
    }
}

/// Uranus magnitude (Eqs. 13-14)
fn uranus_magnitude(r: f64, delta: f64, ph_ang: f64, sun_sub_lat: f64, earth_sub_lat: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();
    let sub_lat = (sun_sub_lat.abs() + earth_sub_lat.abs()) / 2.0;

    let mut ap_mag = -7.110 + distance_mag_factor - 0.00084 * sub_lat;
    if ph_ang > 3.1 {
        ap_mag += (1.045e-4 * ph_ang + 6.587e-3) * ph_ang;
    }
    ap_mag
}

/// Neptune magnitude (Eqs. 15-17)
fn neptune_magnitude(r: f64, delta: f64, ph_ang: f64, year: f64) -> f64 {
    let distance_mag_factor = 5.0 * (r * delta).log10();
    let mut ap_mag = (-6.89 - 0.0054 * (year - 1980.0)).clamp(-7.00, -6.89) + distance_mag_factor;

    if ph_ang > 1.9 {
        if year >= 2000.0 {
            ap_mag += 7.944e-3 * ph_ang + 9.617e-5 * ph_ang.powi(2);
        } else {
            return f64::NAN;
        }
    }
    ap_mag
}
