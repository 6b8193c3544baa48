use super::{Point3, TOLERANCE};

/// Projection of a point onto a bounded line segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentProjection {
    /// The projected point on the segment.
    pub point: Point3,
    /// Fraction along the segment, in `[0, 1]`.
    pub fraction: f64,
    /// Perpendicular distance from the query point to `point`.
    pub distance: f64,
}

/// Projects `point` onto the segment `start -> end`.
///
/// Returns `None` when the foot of the perpendicular falls outside the
/// segment or the segment has zero length; unlike a clamped closest-point
/// query, endpoints are not snapped to.
#[must_use]
pub fn project_onto_segment(point: &Point3, start: &Point3, end: &Point3) -> Option<SegmentProjection> {
    let dir = end - start;
    let len_sq = dir.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }

    let fraction = (point - start).dot(&dir) / len_sq;
    if !(0.0..=1.0).contains(&fraction) {
        return None;
    }

    let foot = start + dir * fraction;
    Some(SegmentProjection {
        point: foot,
        fraction,
        distance: (point - foot).norm(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn projects_perpendicular() {
        let hit = project_onto_segment(
            &Point3::new(5.0, 3.0, 0.0),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(10.0, 0.0, 0.0),
        )
        .unwrap();
        assert!((hit.point.x - 5.0).abs() < 1e-10);
        assert!(hit.point.y.abs() < 1e-10);
        assert!((hit.fraction - 0.5).abs() < 1e-10);
        assert!((hit.distance - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rejects_points_beyond_the_ends() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(10.0, 0.0, 0.0);
        assert!(project_onto_segment(&Point3::new(-1.0, 0.5, 0.0), &start, &end).is_none());
        assert!(project_onto_segment(&Point3::new(11.0, 0.5, 0.0), &start, &end).is_none());
    }

    #[test]
    fn rejects_degenerate_segment() {
        let p = Point3::new(1.0, 1.0, 1.0);
        assert!(project_onto_segment(&Point3::origin(), &p, &p).is_none());
    }
}
