//! Chebyshev polynomial segments
//!
//! Planetary ephemerides tabulate each coordinate as a Chebyshev expansion
//! over consecutive time records. A [`ChebyshevSegment`] holds those records
//! for one (center, target) pair and evaluates position and velocity.

use nalgebra::Vector3;

use super::{Segment, SegmentState};
use crate::errors::{Result, StarframeError};

/// Chebyshev polynomial representation and evaluation
#[derive(Debug, Clone)]
pub struct ChebyshevPolynomial {
    coefficients: Vec<f64>,
}

impl ChebyshevPolynomial {
    /// Create a polynomial from coefficients ordered lowest degree first:
    /// `f(x) = c0*T0(x) + c1*T1(x) + ... + cn*Tn(x)`
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Evaluate at `x` in [-1, 1] with Clenshaw's recurrence
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.coefficients.len();
        match n {
            0 => 0.0,
            1 => self.coefficients[0],
            _ => {
                let mut b1 = 0.0;
                let mut b2 = 0.0;
                for &c in self.coefficients[1..].iter().rev() {
                    let b0 = 2.0 * x * b1 - b2 + c;
                    b2 = b1;
                    b1 = b0;
                }
                self.coefficients[0] + x * b1 - b2
            }
        }
    }

    /// Derivative with respect to `x`, using dT_n/dx = n * U_{n-1}(x)
    pub fn derivative(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| c * i as f64 * chebyshev_u(i - 1, x))
            .sum()
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// U_n(x), the Chebyshev polynomial of the second kind
fn chebyshev_u(n: usize, x: f64) -> f64 {
    let mut u_prev = 1.0;
    if n == 0 {
        return u_prev;
    }
    let mut u = 2.0 * x;
    for _ in 2..=n {
        let next = 2.0 * x * u - u_prev;
        u_prev = u;
        u = next;
    }
    u
}

/// Map `time` into [-1, 1] for an interval of the given midpoint and half-length
pub fn normalize_time(time: f64, midpoint: f64, radius: f64) -> Result<f64> {
    if !(radius > 0.0) {
        return Err(StarframeError::InvalidSegment(format!(
            "record radius must be positive, got {radius}"
        )));
    }

    let normalized = (time - midpoint) / radius;
    if !(-1.0 - 1e-9..=1.0 + 1e-9).contains(&normalized) {
        return Err(StarframeError::OutOfRange {
            tt: time,
            start: midpoint - radius,
            end: midpoint + radius,
        });
    }

    Ok(normalized.clamp(-1.0, 1.0))
}

/// Convert a derivative in normalized time to one per day
pub fn rescale_derivative(deriv_normalized: f64, radius: f64) -> Result<f64> {
    if !(radius > 0.0) {
        return Err(StarframeError::InvalidSegment(format!(
            "record radius must be positive, got {radius}"
        )));
    }
    Ok(deriv_normalized / radius)
}

/// One time record: a Chebyshev expansion per axis, in km
#[derive(Debug, Clone)]
pub struct ChebyshevRecord {
    /// TT Julian date at the center of the record
    pub midpoint: f64,
    /// Half-length of the record in days
    pub radius: f64,
    pub x: ChebyshevPolynomial,
    pub y: ChebyshevPolynomial,
    pub z: ChebyshevPolynomial,
}

impl ChebyshevRecord {
    pub fn new(midpoint: f64, radius: f64, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Self {
        Self {
            midpoint,
            radius,
            x: ChebyshevPolynomial::new(x),
            y: ChebyshevPolynomial::new(y),
            z: ChebyshevPolynomial::new(z),
        }
    }

    pub fn start(&self) -> f64 {
        self.midpoint - self.radius
    }

    pub fn end(&self) -> f64 {
        self.midpoint + self.radius
    }

    fn evaluate(&self, tt: f64) -> Result<SegmentState> {
        let s = normalize_time(tt, self.midpoint, self.radius)?;
        let position = Vector3::new(self.x.evaluate(s), self.y.evaluate(s), self.z.evaluate(s));
        let velocity = Vector3::new(
            rescale_derivative(self.x.derivative(s), self.radius)?,
            rescale_derivative(self.y.derivative(s), self.radius)?,
            rescale_derivative(self.z.derivative(s), self.radius)?,
        );
        Ok(SegmentState::new(position, velocity))
    }
}

/// Consecutive Chebyshev records for one (center, target) pair
#[derive(Debug, Clone)]
pub struct ChebyshevSegment {
    center: i32,
    target: i32,
    records: Vec<ChebyshevRecord>,
}

impl ChebyshevSegment {
    /// Build a segment; records are sorted by start time
    pub fn new(center: i32, target: i32, mut records: Vec<ChebyshevRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(StarframeError::InvalidSegment(format!(
                "segment {center}->{target} has no records"
            )));
        }
        if let Some(bad) = records.iter().find(|r| !(r.radius > 0.0) || !r.midpoint.is_finite()) {
            return Err(StarframeError::InvalidSegment(format!(
                "segment {center}->{target} has a record at {} with radius {}",
                bad.midpoint, bad.radius
            )));
        }
        records.sort_by(|a, b| a.start().total_cmp(&b.start()));
        Ok(Self {
            center,
            target,
            records,
        })
    }

    /// First and last TT Julian dates covered
    pub fn span(&self) -> (f64, f64) {
        let start = self.records.first().map_or(f64::NAN, ChebyshevRecord::start);
        let end = self.records.last().map_or(f64::NAN, ChebyshevRecord::end);
        (start, end)
    }

    fn record_for(&self, tt: f64) -> Result<&ChebyshevRecord> {
        // Last record starting at or before tt; a boundary instant belongs to the later record
        let idx = self.records.partition_point(|r| r.start() <= tt);
        let (start, end) = self.span();
        let record = idx
            .checked_sub(1)
            .and_then(|i| self.records.get(i))
            .filter(|r| tt <= r.end() + 1e-9 * r.radius)
            .or_else(|| self.records.first().filter(|r| tt >= r.start() - 1e-9 * r.radius));
        record.ok_or(StarframeError::OutOfRange { tt, start, end })
    }
}

impl Segment for ChebyshevSegment {
    fn center(&self) -> i32 {
        self.center
    }

    fn target(&self) -> i32 {
        self.target
    }

    fn state_at(&self, tt: f64) -> Result<SegmentState> {
        self.record_for(tt)?.evaluate(tt)
    }

    fn compute_and_differentiate(&self, tt: f64) -> Result<SegmentState> {
        self.state_at(tt)
    }
}
