//! Three-component vectors of a single physical quantity

use std::marker::PhantomData;
use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::{Matrix3, Vector3};

use super::{Angle, Distance, PhysicalQuantity, Velocity};
use crate::constants::{AU_KM, AU_M, DAY_S};

/// Ordered triple of one quantity type, stored in the quantity's canonical unit
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct QuantityVector<Q: PhysicalQuantity> {
    components: Vector3<f64>,
    _quantity: PhantomData<Q>,
}

/// Position vector in meters
pub type PositionVector = QuantityVector<Distance>;

/// Velocity vector in meters per second
pub type VelocityVector = QuantityVector<Velocity>;

impl<Q: PhysicalQuantity> QuantityVector<Q> {
    pub fn new(x: Q, y: Q, z: Q) -> Self {
        Self::from_canonical(Vector3::new(x.canonical(), y.canonical(), z.canonical()))
    }

    pub fn zeros() -> Self {
        Self::from_canonical(Vector3::zeros())
    }

    /// Wrap raw components already expressed in the canonical unit
    pub fn from_canonical(components: Vector3<f64>) -> Self {
        Self {
            components,
            _quantity: PhantomData,
        }
    }

    /// Raw components in the canonical unit
    pub fn canonical(&self) -> Vector3<f64> {
        self.components
    }

    pub fn x(&self) -> Q {
        Q::from_canonical(self.components.x)
    }

    pub fn y(&self) -> Q {
        Q::from_canonical(self.components.y)
    }

    pub fn z(&self) -> Q {
        Q::from_canonical(self.components.z)
    }

    pub fn magnitude(&self) -> Q {
        Q::from_canonical(self.components.norm())
    }

    /// Dot product, in the canonical unit squared
    pub fn dot(&self, other: &Self) -> f64 {
        self.components.dot(&other.components)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self::from_canonical(self.components * factor)
    }

    pub fn is_zero(&self) -> bool {
        self.components.iter().all(|c| *c == 0.0)
    }

    /// Apply a rotation matrix to the vector
    pub fn rotate(&self, matrix: &Matrix3<f64>) -> Self {
        Self::from_canonical(matrix * self.components)
    }

    /// Angle between two vectors, zero when either has no length
    pub fn angle_to(&self, other: &Self) -> Angle {
        let denom = self.components.norm() * other.components.norm();
        if denom == 0.0 {
            return Angle::from_canonical(0.0);
        }
        let cos = (self.components.dot(&other.components) / denom).clamp(-1.0, 1.0);
        Angle::from_canonical(cos.acos())
    }
}

impl<Q: PhysicalQuantity> Add for QuantityVector<Q> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_canonical(self.components + rhs.components)
    }
}

impl<Q: PhysicalQuantity> Sub for QuantityVector<Q> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_canonical(self.components - rhs.components)
    }
}

impl<Q: PhysicalQuantity> Neg for QuantityVector<Q> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_canonical(-self.components)
    }
}

impl<Q: PhysicalQuantity> Mul<f64> for QuantityVector<Q> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl PositionVector {
    pub fn from_au(au: Vector3<f64>) -> Self {
        Self::from_canonical(au * AU_M)
    }

    pub fn from_km(km: Vector3<f64>) -> Self {
        Self::from_canonical(km * 1000.0)
    }

    pub fn au(&self) -> Vector3<f64> {
        self.components / AU_M
    }

    pub fn km(&self) -> Vector3<f64> {
        self.components / 1000.0
    }
}

impl VelocityVector {
    pub fn from_au_per_day(au_per_day: Vector3<f64>) -> Self {
        Self::from_canonical(au_per_day * (AU_M / DAY_S))
    }

    pub fn from_km_per_day(km_per_day: Vector3<f64>) -> Self {
        Self::from_canonical(km_per_day * (1000.0 / DAY_S))
    }

    pub fn au_per_day(&self) -> Vector3<f64> {
        self.components * (DAY_S / AU_M)
    }

    pub fn km_per_day(&self) -> Vector3<f64> {
        self.components * (DAY_S / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{degree, kilometer, DistanceExt};
    use approx::assert_relative_eq;

    #[test]
    fn test_componentwise_arithmetic() {
        let a = PositionVector::from_km(Vector3::new(1.0, 2.0, 3.0));
        let b = PositionVector::from_km(Vector3::new(0.5, -2.0, 1.0));

        let sum = a + b;
        assert_relative_eq!(sum.x().get::<kilometer>(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(sum.y().get::<kilometer>(), 0.0, epsilon = 1e-12);

        let diff = a - b;
        assert_relative_eq!(diff.z().get::<kilometer>(), 2.0, epsilon = 1e-12);

        let scaled = a * 2.0;
        assert_relative_eq!(scaled.km(), Vector3::new(2.0, 4.0, 6.0), epsilon = 1e-12);
        assert_eq!(-(-a), a);
    }

    #[test]
    fn test_magnitude_returns_same_quantity() {
        let v = PositionVector::new(
            Distance::from_km(3.0),
            Distance::from_km(4.0),
            Distance::from_km(0.0),
        );
        assert_relative_eq!(v.magnitude().get::<kilometer>(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(v.dot(&v), 25.0e6, epsilon = 1e-6);
    }

    #[test]
    fn test_au_views() {
        let v = PositionVector::from_au(Vector3::new(1.0, 0.0, -1.0));
        assert_relative_eq!(v.km().x, AU_KM, epsilon = 1e-6);
        assert_relative_eq!(v.au(), Vector3::new(1.0, 0.0, -1.0), epsilon = 1e-15);

        let w = VelocityVector::from_au_per_day(Vector3::new(0.01, 0.0, 0.0));
        assert_relative_eq!(w.au_per_day().x, 0.01, epsilon = 1e-15);
        assert_relative_eq!(w.km_per_day().x, 0.01 * AU_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_to() {
        let x = PositionVector::from_km(Vector3::new(1.0, 0.0, 0.0));
        let y = PositionVector::from_km(Vector3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(x.angle_to(&y).get::<degree>(), 90.0, epsilon = 1e-12);
        assert_relative_eq!(x.angle_to(&(-x)).get::<degree>(), 180.0, epsilon = 1e-12);
        assert_eq!(x.angle_to(&PositionVector::zeros()).get::<degree>(), 0.0);
    }

    #[test]
    fn test_rotate() {
        let v = PositionVector::from_km(Vector3::new(1.0, 0.0, 0.0));
        let quarter_turn = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let r = v.rotate(&quarter_turn);
        assert_relative_eq!(r.km(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-15);
        assert!(PositionVector::zeros().is_zero());
        assert!(!r.is_zero());
    }
}
