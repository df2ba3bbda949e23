//! Gravitational light deflection by the Sun

use super::light_time_difference;
use crate::constants::{AU_M, C, C_AUDAY, GS};
use crate::ephemlib::{chain_state, Ephemeris};
use crate::errors::Result;
use crate::planetlib::Body;
use crate::time::Instant;
use crate::units::PositionVector;
use nalgebra::Vector3;

/// Above this |cos| between Sun->observer and observer->target the ray passes
/// through the Sun's direction and no correction is applied
const COLLINEAR_LIMIT: f64 = 0.99999999999;

/// Solar light bending, applied to an astrometric position
pub struct Deflection;

impl Deflection {
    /// Bend the observer-relative `position` by the Sun's gravity
    ///
    /// The Sun is evaluated at the instant the incoming ray passes closest to
    /// it, or at the emission time when the target lies nearer than that.
    ///
    /// # Arguments
    /// * `position` - target relative to the observer
    /// * `observer` - observer relative to the solar system barycenter
    /// * `instant` - time of observation
    /// * `ephemeris` - source of the Sun's barycentric position
    pub fn apply(
        position: &PositionVector,
        observer: &PositionVector,
        instant: &Instant,
        ephemeris: &dyn Ephemeris,
    ) -> Result<PositionVector> {
        let sun_chain = Body::Sun.segment_chain();
        let pos_au = position.au();
        let observer_au = observer.au();

        // Light travel time from the target, in days
        let tlt = pos_au.norm() / C_AUDAY;

        // Projected time offset to the ray's closest approach to the Sun
        let sun_now = PositionVector::from_km(chain_state(ephemeris, sun_chain, instant.tt())?.position);
        let gpv = sun_now.au() - observer_au;
        let dlt = light_time_difference(&pos_au, &gpv);

        let mut tclose = instant.tt();
        if dlt > 0.0 {
            tclose = instant.tt() - dlt;
        }
        if tlt < dlt {
            tclose = instant.tt() - tlt;
        }

        let sun_close = PositionVector::from_km(chain_state(ephemeris, sun_chain, tclose)?.position);

        Ok(PositionVector::from_au(Self::bend(&pos_au, &observer_au, &sun_close.au())))
    }

    /// Direction change 2GM/(c²|e|) · ((p·q) e − (e·p) q) / (1 + q·e) for
    /// unit vectors p (observer to target), q (Sun to target) and e (Sun to
    /// observer), scaled by the target distance. Positions are in AU, with
    /// the observer and the Sun barycentric.
    fn bend(position: &Vector3<f64>, observer: &Vector3<f64>, sun: &Vector3<f64>) -> Vector3<f64> {
        let sun_to_target = observer + position - sun;
        let sun_to_observer = observer - sun;

        let (Some(p), Some(q), Some(e)) = (
            position.try_normalize(0.0),
            sun_to_target.try_normalize(0.0),
            sun_to_observer.try_normalize(0.0),
        ) else {
            return *position;
        };

        let cos_sun_target = e.dot(&p);
        if cos_sun_target.abs() > COLLINEAR_LIMIT {
            log::debug!("skipping deflection: target collinear with the Sun (cos = {cos_sun_target})");
            return *position;
        }

        let strength = 2.0 * GS / (C * C * sun_to_observer.norm() * AU_M);
        let shift = (p.dot(&q) * e - cos_sun_target * q) * (strength / (1.0 + q.dot(&e)));
        position + shift * position.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ASEC2RAD;
    use approx::assert_relative_eq;

    #[test]
    fn test_bending_at_quadrature_is_milliarcseconds() {
        // Target at 10 AU along x, observer at 1 AU along y, Sun at origin
        let position = Vector3::new(10.0, -1.0, 0.0);
        let observer = Vector3::new(0.0, 1.0, 0.0);
        let deflector = Vector3::new(0.0, 0.0, 0.0);

        let bent = Deflection::bend(&position, &observer, &deflector);

        let angle = position.angle(&bent) / ASEC2RAD;
        // At ~90 degrees elongation the bending is ~4 mas
        assert!(angle > 0.001 && angle < 0.01, "deflection = {angle} arcsec");
    }

    #[test]
    fn test_target_collinear_with_sun_is_left_alone() {
        let position = Vector3::new(10.0, 0.0, 0.0);
        let observer = Vector3::new(1.0, 0.0, 0.0);
        let bent = Deflection::bend(&position, &observer, &Vector3::zeros());
        assert_relative_eq!(bent, position, epsilon = 1e-15);
    }

    #[test]
    fn test_deflection_pushes_away_from_sun() {
        // Target near the Sun on the sky is displaced away from it
        let observer = Vector3::new(-1.0, 0.0, 0.0);
        let deflector = Vector3::zeros();
        let position = Vector3::new(31.0, 0.2, 0.0);
        let bent = Deflection::bend(&position, &observer, &deflector);

        let sun_dir = deflector - observer;
        assert!(bent.angle(&sun_dir) > position.angle(&sun_dir));
    }

    #[test]
    fn test_zero_position_untouched() {
        let bent = Deflection::bend(&Vector3::zeros(), &Vector3::new(1.0, 0.0, 0.0), &Vector3::zeros());
        assert_eq!(bent, Vector3::zeros());
    }
}
