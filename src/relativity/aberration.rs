//! Annual aberration of light

use super::AVOID_DIVIDE_BY_ZERO;
use crate::constants::C_AUDAY;
use crate::earthlib::SolarElements;
use crate::time::Instant;
use crate::units::{arcsecond, radian, Angle, PositionVector, VelocityVector};
use nalgebra::Vector3;

/// Constant of aberration in arcseconds
pub const ABERRATION_CONSTANT_ASEC: f64 = 20.49552;

/// Classical annual aberration on ecliptic coordinates (Meeus ch. 23)
pub struct Aberration;

impl Aberration {
    /// Displacement (delta longitude, delta latitude) of a body at the given
    /// ecliptic coordinates of date
    ///
    /// Includes the e-terms from the eccentricity of the Earth's orbit. At the
    /// ecliptic poles the longitude displacement is undefined and returned as zero.
    pub fn for_ecliptic_coordinates(
        longitude: Angle,
        latitude: Angle,
        instant: &Instant,
    ) -> (Angle, Angle) {
        let sun = SolarElements::at(instant);
        let kappa = ABERRATION_CONSTANT_ASEC;
        let e = sun.eccentricity;

        let lambda = longitude.get::<radian>();
        let beta = latitude.get::<radian>();
        let sun_lon = sun.true_longitude.get::<radian>();
        let perihelion = sun.perihelion_longitude.get::<radian>();

        let cos_beta = beta.cos();
        let d_lambda = if cos_beta.abs() < 1e-12 {
            0.0
        } else {
            (-kappa * (sun_lon - lambda).cos() + e * kappa * (perihelion - lambda).cos()) / cos_beta
        };
        let d_beta =
            -kappa * beta.sin() * ((sun_lon - lambda).sin() - e * (perihelion - lambda).sin());

        (
            Angle::new::<arcsecond>(d_lambda),
            Angle::new::<arcsecond>(d_beta),
        )
    }
}

/// Relativistic vector aberration (Klioner 2003)
pub struct RelativisticAberration;

impl RelativisticAberration {
    /// Displace an observer-relative position by the observer's velocity
    ///
    /// `light_time_days` is the light propagation time to the body. The
    /// result keeps the direction convention of `position`: a zero position
    /// or a zero velocity comes back unchanged.
    pub fn apply(
        position: &PositionVector,
        observer_velocity: &VelocityVector,
        light_time_days: f64,
    ) -> PositionVector {
        PositionVector::from_au(Self::displace(
            &position.au(),
            &observer_velocity.au_per_day(),
            light_time_days,
        ))
    }

    /// (p/γ + f·v) / (1 + β cos θ) with f = (1 + β cos θ / (1 + 1/γ)) · light time,
    /// all in AU and AU/day
    fn displace(position: &Vector3<f64>, velocity: &Vector3<f64>, light_time: f64) -> Vector3<f64> {
        let speed = velocity.norm();
        let beta = speed / C_AUDAY;
        let range = light_time * C_AUDAY;
        let cos_theta = position.dot(velocity) / (range * speed + AVOID_DIVIDE_BY_ZERO);
        let inverse_gamma = (1.0 - beta * beta).sqrt();
        let projected = beta * cos_theta;
        let along_velocity = (1.0 + projected / (1.0 + inverse_gamma)) * light_time;

        (position * inverse_gamma + velocity * along_velocity) / (1.0 + projected)
    }
}
