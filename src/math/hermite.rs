use std::ops::{Add, Mul, Sub};

use super::{Point3, Vector3};

/// Cubic Hermite basis weights `[h00, h10, h01, h11]` at local parameter `s`.
///
/// The interpolant is `h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1`.
#[must_use]
pub fn basis(s: f64) -> [f64; 4] {
    let s2 = s * s;
    let s3 = s2 * s;
    [
        2.0 * s3 - 3.0 * s2 + 1.0,
        s3 - 2.0 * s2 + s,
        -2.0 * s3 + 3.0 * s2,
        s3 - s2,
    ]
}

/// Evaluates the Hermite segment between `(p0, m0)` and `(p1, m1)` at `s`.
#[must_use]
pub fn hermite_point(p0: &Point3, m0: &Vector3, p1: &Point3, m1: &Vector3, s: f64) -> Point3 {
    let [h00, h10, h01, h11] = basis(s);
    Point3::from(p0.coords * h00 + m0 * h10 + p1.coords * h01 + m1 * h11)
}

/// Hermite-interpolates between `v[1]` and `v[2]` with Catmull-Rom tangents
/// derived from the outer neighbours `v[0]` and `v[3]`.
///
/// Works for any value that forms a vector space over `f64` (scalars,
/// quaternion coordinates).
#[must_use]
pub fn catmull_rom<T>(v: [T; 4], s: f64) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f64, Output = T>,
{
    let m1 = (v[2] - v[0]) * 0.5;
    let m2 = (v[3] - v[1]) * 0.5;
    let [h00, h10, h01, h11] = basis(s);
    v[1] * h00 + m1 * h10 + v[2] * h01 + m2 * h11
}
