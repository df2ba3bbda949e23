//! Frame bias and elementary frame rotations

use crate::constants::ASEC2RAD;
use nalgebra::Matrix3;
use once_cell::sync::Lazy;

/// ICRS to J2000 frame bias matrix
///
/// Frame bias parameters from IERS (2003) Conventions, Chapter 5. The
/// rotation accounts for the offset between the ICRS and the dynamical
/// J2000 mean equator and equinox.
pub static ICRS_TO_J2000: Lazy<Matrix3<f64>> = Lazy::new(|| {
    let xi0 = -0.0166170 * ASEC2RAD;
    let eta0 = -0.0068192 * ASEC2RAD;
    let da0 = -0.01460 * ASEC2RAD;

    let yx = -da0;
    let zx = xi0;
    let xy = da0;
    let zy = eta0;
    let xz = -xi0;
    let yz = -eta0;

    let xx = 1.0 - 0.5 * (yx * yx + zx * zx);
    let yy = 1.0 - 0.5 * (yx * yx + zy * zy);
    let zz = 1.0 - 0.5 * (zy * zy + zx * zx);

    Matrix3::new(xx, xy, xz, yx, yy, yz, zx, zy, zz)
});

/// Frame rotation by `angle` radians about the x axis
///
/// Rotates the coordinate axes, so a fixed vector appears to turn by `-angle`.
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let m = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0,   c,   s,
        0.0,  -s,   c,
    );
    m
}

/// Frame rotation by `angle` radians about the y axis
pub fn rot_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let m = Matrix3::new(
          c, 0.0,  -s,
        0.0, 1.0, 0.0,
          s, 0.0,   c,
    );
    m
}

/// Frame rotation by `angle` radians about the z axis
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    #[rustfmt::skip]
    let m = Matrix3::new(
          c,   s, 0.0,
         -s,   c, 0.0,
        0.0, 0.0, 1.0,
    );
    m
}

/// Rotation from equatorial to ecliptic coordinates for an obliquity in radians
pub fn equatorial_to_ecliptic(obliquity: f64) -> Matrix3<f64> {
    rot_x(obliquity)
}
