//! Ephemeris collaborators: segments of tabulated state vectors
//!
//! A [`Segment`] gives the state of one NAIF body relative to another; an
//! [`Ephemeris`] resolves (center, target) pairs to segments. Barycentric
//! states are obtained by summing a chain of segments that starts at the
//! solar system barycenter. Positions are in km and velocities in km/day.

pub mod chebyshev;
mod linear;
pub mod names;

pub use chebyshev::{ChebyshevRecord, ChebyshevSegment};
pub use linear::LinearSegment;

use std::collections::HashMap;
use std::fmt::Debug;
use std::ops::Add;
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Vector3;

use crate::errors::{Result, StarframeError};

/// Position (km) and velocity (km/day) produced by a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl SegmentState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    pub fn zeros() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
}

impl Add for SegmentState {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.position + rhs.position, self.velocity + rhs.velocity)
    }
}

/// One tabulated (center, target) relation
pub trait Segment: Send + Sync + Debug {
    fn center(&self) -> i32;

    fn target(&self) -> i32;

    /// State at a TT Julian date
    fn state_at(&self, tt: f64) -> Result<SegmentState>;

    /// State at a TT Julian date with the velocity taken from the
    /// derivative of the position representation
    fn compute_and_differentiate(&self, tt: f64) -> Result<SegmentState> {
        self.state_at(tt)
    }
}

/// Source of segments
pub trait Ephemeris: Send + Sync + Debug {
    fn segment(&self, center: i32, target: i32) -> Result<&dyn Segment>;

    /// Identifier that differs between ephemerides whose states may differ
    ///
    /// Cached states are keyed on it, so two ephemerides must never share
    /// an id unless they return identical states.
    fn cache_id(&self) -> u64;
}

static NEXT_EPHEMERIS_ID: AtomicU64 = AtomicU64::new(1);

/// A fresh process-wide ephemeris id
pub fn next_cache_id() -> u64 {
    NEXT_EPHEMERIS_ID.fetch_add(1, Ordering::Relaxed)
}

/// Sum the states of a segment chain at `tt`
pub fn chain_state(ephemeris: &dyn Ephemeris, chain: &[(i32, i32)], tt: f64) -> Result<SegmentState> {
    chain.iter().try_fold(SegmentState::zeros(), |acc, &(center, target)| {
        Ok(acc + ephemeris.segment(center, target)?.state_at(tt)?)
    })
}

/// Like [`chain_state`], through `compute_and_differentiate`
pub fn chain_state_differentiated(
    ephemeris: &dyn Ephemeris,
    chain: &[(i32, i32)],
    tt: f64,
) -> Result<SegmentState> {
    chain.iter().try_fold(SegmentState::zeros(), |acc, &(center, target)| {
        Ok(acc + ephemeris.segment(center, target)?.compute_and_differentiate(tt)?)
    })
}

/// Ephemeris held entirely in memory
///
/// Every change to the segment set gives the ephemeris a new cache id.
#[derive(Debug)]
pub struct InMemoryEphemeris {
    id: u64,
    segments: HashMap<(i32, i32), Box<dyn Segment>>,
}

impl Default for InMemoryEphemeris {
    fn default() -> Self {
        Self {
            id: next_cache_id(),
            segments: HashMap::new(),
        }
    }
}

impl InMemoryEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment, replacing any existing one for the same pair
    pub fn insert<S: Segment + 'static>(&mut self, segment: S) {
        self.segments
            .insert((segment.center(), segment.target()), Box::new(segment));
        self.id = next_cache_id();
    }

    pub fn with_segment<S: Segment + 'static>(mut self, segment: S) -> Self {
        self.insert(segment);
        self
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Ephemeris for InMemoryEphemeris {
    fn segment(&self, center: i32, target: i32) -> Result<&dyn Segment> {
        self.segments
            .get(&(center, target))
            .map(|s| s.as_ref())
            .ok_or(StarframeError::SegmentNotFound { center, target })
    }

    fn cache_id(&self) -> u64 {
        self.id
    }
}
