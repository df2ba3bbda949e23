//! Light-time correction
//!
//! Finds where a target was when the light now reaching the observer left
//! it, by fixed-point iteration on the straight-line delay. The iteration
//! cap bounds the work; running out of iterations is not an error, the last
//! iterate is returned together with how far it got.

use nalgebra::Vector3;

use crate::config::LightTimeConfig;
use crate::constants::{C_KM_S, DAY_S};
use crate::ephemlib::{chain_state_differentiated, Ephemeris, SegmentState};
use crate::errors::Result;
use crate::positions::Snapshot;
use crate::units::{PositionVector, VelocityVector};

/// Target state at the retarded time, with solver diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTimeSolution {
    /// Barycentric target position at emission time
    pub position: PositionVector,
    /// Barycentric target velocity at emission time
    pub velocity: VelocityVector,
    pub delay_seconds: f64,
    /// Ephemeris evaluations performed
    pub iterations: usize,
    pub converged: bool,
    /// Change in delay over the final iteration, in seconds
    pub residual_seconds: f64,
}

impl LightTimeSolution {
    pub fn delay_days(&self) -> f64 {
        self.delay_seconds / DAY_S
    }
}

/// Iterative light-time solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTimeDelay {
    pub max_iterations: usize,
    pub tolerance_seconds: f64,
}

impl Default for LightTimeDelay {
    fn default() -> Self {
        Self::from_config(&LightTimeConfig::default())
    }
}

impl LightTimeDelay {
    pub fn from_config(config: &LightTimeConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            tolerance_seconds: config.tolerance_seconds,
        }
    }

    /// Solve for the target's state as seen from `center` at `center`'s instant
    ///
    /// The target is re-evaluated along its own segment chain.
    pub fn solve(
        &self,
        center: &Snapshot,
        target: &Snapshot,
        ephemeris: &dyn Ephemeris,
    ) -> Result<LightTimeSolution> {
        let chain = target.target.segment_chain();
        let initial = SegmentState::new(target.position.km(), target.velocity.km_per_day());
        self.solve_with(center.position.km(), center.instant.tt(), initial, |tt| {
            chain_state_differentiated(ephemeris, chain, tt)
        })
    }

    /// Solve against an arbitrary target evaluator
    ///
    /// # Arguments
    /// * `center_km` - observer position in km, held fixed at the reception time
    /// * `tt` - reception time, TT Julian date
    /// * `initial` - target state at `tt` (km, km/day)
    /// * `eval` - target state at a TT Julian date
    pub fn solve_with<F>(
        &self,
        center_km: Vector3<f64>,
        tt: f64,
        initial: SegmentState,
        mut eval: F,
    ) -> Result<LightTimeSolution>
    where
        F: FnMut(f64) -> Result<SegmentState>,
    {
        let mut state = initial;
        let mut delay = (state.position - center_km).norm() / C_KM_S;
        let mut residual = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            state = eval(tt - delay / DAY_S)?;
            iterations += 1;

            let next = (state.position - center_km).norm() / C_KM_S;
            residual = (next - delay).abs();
            delay = next;
            if residual < self.tolerance_seconds {
                converged = true;
                break;
            }
        }

        if !converged {
            log::debug!(
                "light-time iteration stopped after {iterations} evaluations, residual {residual:e} s"
            );
        }

        Ok(LightTimeSolution {
            position: PositionVector::from_km(state.position),
            velocity: VelocityVector::from_km_per_day(state.velocity),
            delay_seconds: delay,
            iterations,
            converged,
            residual_seconds: residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AU_KM;
    use crate::errors::StarframeError;
    use approx::assert_relative_eq;

    const TT0: f64 = 2_460_714.0;

    /// Target receding along x at a constant velocity
    fn moving_target(x0_km: f64, v_km_day: f64) -> impl FnMut(f64) -> Result<SegmentState> {
        move |tt| {
            let dt = tt - TT0;
            Ok(SegmentState::new(
                Vector3::new(x0_km + v_km_day * dt, 0.5 * AU_KM, 0.0),
                Vector3::new(v_km_day, 0.0, 0.0),
            ))
        }
    }

    #[test]
    fn test_converged_delay_matches_returned_distance() {
        let solver = LightTimeDelay::default();
        let mut eval = moving_target(30.0 * AU_KM, 1.0e6);
        let initial = eval(TT0).unwrap();
        let center = Vector3::new(-0.7 * AU_KM, 0.6 * AU_KM, 0.26 * AU_KM);

        let solution = solver.solve_with(center, TT0, initial, eval).unwrap();

        let distance_km = (solution.position.km() - center).norm();
        assert!(solution.converged);
        assert!(solution.iterations <= 10);
        assert!(solution.residual_seconds < 1e-12);
        assert_relative_eq!(solution.delay_seconds, distance_km / C_KM_S, epsilon = 1e-9);

        // Emission time reproduces the returned position
        let expected_x = 30.0 * AU_KM + 1.0e6 * (-solution.delay_days());
        assert_relative_eq!(solution.position.km().x, expected_x, epsilon = 1e-3);
    }

    #[test]
    fn test_stationary_target_converges_in_one_step() {
        let solver = LightTimeDelay::default();
        let state = SegmentState::new(Vector3::new(C_KM_S * 100.0, 0.0, 0.0), Vector3::zeros());
        let solution = solver
            .solve_with(Vector3::zeros(), TT0, state, |_| Ok(state))
            .unwrap();
        assert!(solution.converged);
        assert_eq!(solution.iterations, 1);
        assert_relative_eq!(solution.delay_seconds, 100.0, epsilon = 1e-9);
        assert_eq!(solution.residual_seconds, 0.0);
    }

    #[test]
    fn test_iteration_cap_returns_last_iterate() {
        let _ = env_logger::builder().is_test(true).try_init();
        let solver = LightTimeDelay {
            max_iterations: 3,
            tolerance_seconds: 0.0,
        };
        let mut eval = moving_target(5.0 * AU_KM, 2.0e6);
        let initial = eval(TT0).unwrap();
        let solution = solver.solve_with(Vector3::zeros(), TT0, initial, eval).unwrap();

        assert!(!solution.converged);
        assert_eq!(solution.iterations, 3);
        let distance_km = solution.position.km().norm();
        assert_relative_eq!(solution.delay_seconds, distance_km / C_KM_S, epsilon = 1e-9);
    }

    #[test]
    fn test_coincident_target_has_zero_delay() {
        let solver = LightTimeDelay::default();
        let state = SegmentState::zeros();
        let solution = solver
            .solve_with(Vector3::zeros(), TT0, state, |_| Ok(state))
            .unwrap();
        assert_eq!(solution.delay_seconds, 0.0);
        assert!(solution.converged);
    }

    #[test]
    fn test_ephemeris_errors_propagate() {
        let solver = LightTimeDelay::default();
        let state = SegmentState::new(Vector3::new(1.0e9, 0.0, 0.0), Vector3::zeros());
        let result = solver.solve_with(Vector3::zeros(), TT0, state, |tt| {
            Err(StarframeError::OutOfRange {
                tt,
                start: 0.0,
                end: 1.0,
            })
        });
        assert!(matches!(result, Err(StarframeError::OutOfRange { .. })));
    }
}
