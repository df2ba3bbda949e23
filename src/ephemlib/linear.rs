use nalgebra::Vector3;

use super::{Segment, SegmentState};
use crate::errors::Result;

/// Segment moving with constant velocity from a reference epoch
///
/// Useful for short spans and for test ephemerides.
#[derive(Debug, Clone)]
pub struct LinearSegment {
    center: i32,
    target: i32,
    epoch_tt: f64,
    position_km: Vector3<f64>,
    velocity_km_per_day: Vector3<f64>,
}

impl LinearSegment {
    pub fn new(
        center: i32,
        target: i32,
        epoch_tt: f64,
        position_km: Vector3<f64>,
        velocity_km_per_day: Vector3<f64>,
    ) -> Self {
        Self {
            center,
            target,
            epoch_tt,
            position_km,
            velocity_km_per_day,
        }
    }

    /// Segment pinned at one position
    pub fn stationary(center: i32, target: i32, position_km: Vector3<f64>) -> Self {
        Self::new(center, target, 0.0, position_km, Vector3::zeros())
    }
}

impl Segment for LinearSegment {
    fn center(&self) -> i32 {
        self.center
    }

    fn target(&self) -> i32 {
        self.target
    }

    fn state_at(&self, tt: f64) -> Result<SegmentState> {
        let dt = tt - self.epoch_tt;
        Ok(SegmentState::new(
            self.position_km + self.velocity_km_per_day * dt,
            self.velocity_km_per_day,
        ))
    }
}
