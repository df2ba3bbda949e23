//! Relativistic corrections for astrometry
//!
//! - [`aberration`]: annual aberration, classical ecliptic form and the
//!   relativistic vector form (Klioner 2003)
//! - [`deflection`]: gravitational light bending by the Sun (IERS 2003)

pub mod aberration;
pub mod deflection;

pub use aberration::{Aberration, RelativisticAberration};
pub use deflection::Deflection;

use crate::constants::C_AUDAY;
use nalgebra::Vector3;

/// Added to norms before dividing so zero vectors stay zero
pub(crate) const AVOID_DIVIDE_BY_ZERO: f64 = f64::MIN_POSITIVE;

/// Days light takes to cover `observer_pos` projected on the direction of
/// `position`, both in AU
pub fn light_time_difference(position: &Vector3<f64>, observer_pos: &Vector3<f64>) -> f64 {
    let direction = position / (position.norm() + AVOID_DIVIDE_BY_ZERO);
    direction.dot(observer_pos) / C_AUDAY
}
