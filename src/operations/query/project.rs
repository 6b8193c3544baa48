use tracing::trace;

use crate::math::project::{project_onto_segment, SegmentProjection};
use crate::math::{Point3, Vector3};
use crate::path::{CameraPath, PathT};

/// A point projected onto the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    /// Foot of the perpendicular on the nearest step chord.
    pub point: Point3,
    /// Path parameter of the hit.
    pub t: PathT,
    /// Offset from the curve position at `t` to `point`.
    ///
    /// Non-zero because steps are straight chords of a curve.
    pub error: Vector3,
}

/// Projects a world-space point onto the nearest step of the path.
pub struct ProjectOntoPath {
    point: Point3,
}

impl ProjectOntoPath {
    /// Creates a new `ProjectOntoPath` query.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self { point }
    }

    /// Executes the projection.
    ///
    /// Only segments whose expanded bounds contain the point are searched,
    /// and hits further than the configured projection radius from the
    /// point are discarded. Returns `None` when nothing is in range; that
    /// is an ordinary outcome, not an error.
    #[must_use]
    pub fn execute(&self, path: &CameraPath) -> Option<PathProjection> {
        let radius = path.config().projection_radius;
        let mut best: Option<(usize, usize, usize, SegmentProjection)> = None;

        for (i, segment) in path.segments().iter().enumerate() {
            if !segment.bounds().contains(&self.point) {
                continue;
            }
            for (j, step) in segment.steps().iter().enumerate() {
                let Some(hit) = project_onto_segment(&self.point, &step.start, &step.end) else {
                    continue;
                };
                if hit.distance > radius {
                    continue;
                }
                let closer = match best {
                    Some((_, _, _, b)) => hit.distance < b.distance,
                    None => true,
                };
                if closer {
                    best = Some((i, j, segment.steps().len(), hit));
                }
            }
        }

        let Some((segment, step, steps, hit)) = best else {
            trace!(point = ?self.point, "projection missed the path");
            return None;
        };

        #[allow(clippy::cast_precision_loss)]
        let t = PathT::new(segment as f64 + (step as f64 + hit.fraction) / steps as f64);
        let t = path.constrain(t);
        Some(PathProjection {
            point: hit.point,
            t,
            error: hit.point - path.point_at(t),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::operations::edit::InsertPositionKnot;
    use crate::path::{CameraPathConfig, PositionKnot};

    fn path_through(points: &[(f64, f64)], tangent: Vector3) -> CameraPath {
        let mut path = CameraPath::new(CameraPathConfig::default()).unwrap();
        for (i, &(x, y)) in points.iter().enumerate() {
            InsertPositionKnot::new(i, PositionKnot::from_tangent(Point3::new(x, y, 0.0), tangent))
                .execute(&mut path)
                .unwrap();
        }
        path
    }

    #[test]
    fn point_near_straight_path_projects_onto_it() {
        let path = path_through(&[(0.0, 0.0), (10.0, 0.0)], Vector3::new(10.0, 0.0, 0.0));
        let hit = ProjectOntoPath::new(Point3::new(3.0, 0.2, 0.0))
            .execute(&path)
            .unwrap();
        assert_relative_eq!(hit.point, Point3::new(3.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(hit.t.value(), 0.3, epsilon = 1e-9);
        assert_relative_eq!(hit.error.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn point_outside_radius_misses() {
        let path = path_through(&[(0.0, 0.0), (10.0, 0.0)], Vector3::new(10.0, 0.0, 0.0));
        assert!(ProjectOntoPath::new(Point3::new(3.0, 2.0, 0.0))
            .execute(&path)
            .is_none());
        assert!(ProjectOntoPath::new(Point3::new(12.0, 0.0, 0.0))
            .execute(&path)
            .is_none());
    }

    #[test]
    fn empty_path_misses() {
        let path = CameraPath::new(CameraPathConfig::default()).unwrap();
        assert!(ProjectOntoPath::new(Point3::origin()).execute(&path).is_none());
    }

    #[test]
    fn curved_path_reports_chord_error() {
        let path = path_through(
            &[(0.0, 0.0), (6.0, 4.0), (12.0, 0.0)],
            Vector3::new(6.0, 0.0, 0.0),
        );
        let on_curve = path.point_at(PathT::new(0.55));
        let hit = ProjectOntoPath::new(on_curve).execute(&path).unwrap();
        assert!(hit.error.norm() < 0.05);
        assert!((hit.t.value() - 0.55).abs() < 0.02);
        assert_relative_eq!(hit.point + (-hit.error), path.point_at(hit.t), epsilon = 1e-12);
    }
}
