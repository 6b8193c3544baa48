use nalgebra::Quaternion;

use super::{hermite, Rotation, TOLERANCE};

/// Returns `q` or its negation, whichever lies in the same hemisphere as
/// `reference`.
///
/// Both represent the same rotation; picking the one with a non-negative dot
/// product keeps component-wise interpolation on the short arc.
#[must_use]
pub fn align_hemisphere(q: &Rotation, reference: &Rotation) -> Rotation {
    if q.coords.dot(&reference.coords) < 0.0 {
        Rotation::new_unchecked(-q.into_inner())
    } else {
        *q
    }
}

/// Aligns `v[0]`, `v[2]` and `v[3]` against the chain starting at `v[1]`.
#[must_use]
pub fn align_window(v: [Rotation; 4]) -> [Rotation; 4] {
    let q1 = v[1];
    let q0 = align_hemisphere(&v[0], &q1);
    let q2 = align_hemisphere(&v[2], &q1);
    let q3 = align_hemisphere(&v[3], &q2);
    [q0, q1, q2, q3]
}

/// Catmull-Rom interpolation of quaternion coordinates between `v[1]` and
/// `v[2]`, renormalised onto the unit sphere.
///
/// Falls back to `v[1]` when the blended coordinates collapse to zero.
#[must_use]
pub fn catmull_rom(v: [Rotation; 4], s: f64) -> Rotation {
    let coords = hermite::catmull_rom(v.map(|q| q.coords), s);
    Rotation::try_new(Quaternion::from(coords), TOLERANCE).unwrap_or(v[1])
}
