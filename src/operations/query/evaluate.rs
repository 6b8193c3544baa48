use slotmap::Key;

use crate::math::{Point3, Rotation, TOLERANCE};
use crate::path::{AttributeKnot, AttributeTrack, AttributeValue, CameraPath, PathT};

/// Evaluates the curve position at a path parameter.
pub struct PositionAt {
    t: PathT,
}

impl PositionAt {
    /// Creates a new `PositionAt` query.
    #[must_use]
    pub fn new(t: PathT) -> Self {
        Self { t }
    }

    /// Executes the query.
    ///
    /// An empty path yields the origin; a single knot yields its position.
    #[must_use]
    pub fn execute(&self, path: &CameraPath) -> Point3 {
        path.point_at(self.t)
    }
}

/// Evaluates the blended camera rotation at a path parameter.
pub struct RotationAt {
    t: PathT,
}

impl RotationAt {
    /// Creates a new `RotationAt` query.
    #[must_use]
    pub fn new(t: PathT) -> Self {
        Self { t }
    }

    /// Executes the query.
    ///
    /// Without rotation knots this is the configured default rotation.
    #[must_use]
    pub fn execute(&self, path: &CameraPath) -> Rotation {
        sample_track(path, path.rotations(), self.t, path.config().default_rotation)
    }
}

/// Evaluates the blended speed at a path parameter.
pub struct SpeedAt {
    t: PathT,
}

impl SpeedAt {
    /// Creates a new `SpeedAt` query.
    #[must_use]
    pub fn new(t: PathT) -> Self {
        Self { t }
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self, path: &CameraPath) -> f64 {
        sample_track(path, path.speeds(), self.t, path.config().default_speed)
    }
}

/// Evaluates the blended field of view, in degrees, at a path parameter.
pub struct FovAt {
    t: PathT,
}

impl FovAt {
    /// Creates a new `FovAt` query.
    #[must_use]
    pub fn new(t: PathT) -> Self {
        Self { t }
    }

    /// Executes the query.
    #[must_use]
    pub fn execute(&self, path: &CameraPath) -> f64 {
        sample_track(path, path.fovs(), self.t, path.config().default_fov)
    }
}

/// Blends an attribute track at `t`.
///
/// The two knots bracketing `t` are interpolated Catmull-Rom style with their
/// outer neighbours, using the arc-length fraction between the bracketing
/// placements as the blend factor. On a looping path a `t` outside the
/// placed range is bracketed by the last and first knots across the seam.
fn sample_track<K: Key, V: AttributeValue>(
    path: &CameraPath,
    track: &AttributeTrack<K, V>,
    t: PathT,
    default: V,
) -> V {
    let knots: Vec<&AttributeKnot<V>> = track.iter().map(|(_, knot)| knot).collect();
    let count = knots.len();
    match knots.as_slice() {
        [] => return default,
        [only] => return only.value(),
        _ => {}
    }

    let t = path.constrain(t);
    let loops = path.path_loops();
    let first = knots.partition_point(|knot| knot.t() < t);

    let (lo, hi) = if first == 0 || first == count {
        if !loops {
            let end = if first == 0 { 0 } else { count - 1 };
            return knots[end].value();
        }
        (count - 1, 0)
    } else {
        (first - 1, first)
    };

    let (before, after) = if loops {
        ((lo + count - 1) % count, (hi + 1) % count)
    } else {
        (lo.saturating_sub(1), (hi + 1).min(count - 1))
    };
    let window = [
        knots[before].value(),
        knots[lo].value(),
        knots[hi].value(),
        knots[after].value(),
    ];

    let distance = path.segments().distance_from_start(t);
    let lo_distance = path.knot_distance(knots[lo]);
    let hi_distance = path.knot_distance(knots[hi]);
    let (along, span) = if lo < hi {
        (distance - lo_distance, hi_distance - lo_distance)
    } else {
        let total = path.length();
        let span = (total - lo_distance) + hi_distance;
        if span <= TOLERANCE {
            (0.0, span)
        } else {
            ((distance - lo_distance).rem_euclid(total), span)
        }
    };
    let s = if span > TOLERANCE {
        (along / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    V::interpolate(window, s, loops)
}
