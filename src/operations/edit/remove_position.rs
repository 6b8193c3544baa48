use tracing::debug;

use crate::error::{PathError, Result};
use crate::path::{CameraPath, PositionKnot, PositionKnotId};

use super::reflow::{reflow_track, Reflow};

/// Removes a position knot.
///
/// Attribute knots on the two segments that merge keep their proportional
/// arc length across the merged segment. Knots on a removed end segment
/// collapse onto the new head or tail.
pub struct RemovePositionKnot {
    id: PositionKnotId,
}

impl RemovePositionKnot {
    /// Creates a new `RemovePositionKnot` operation.
    #[must_use]
    pub fn new(id: PositionKnotId) -> Self {
        Self { id }
    }

    /// Executes the removal, returning the removed knot's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not part of the path.
    pub fn execute(&self, path: &mut CameraPath) -> Result<PositionKnot> {
        let index = path
            .positions
            .index_of(self.id)
            .ok_or(PathError::KnotNotFound("position knot"))?;
        let knots_before = path.positions.len();
        let merged_lengths = if index > 0 && index + 1 < knots_before {
            Some((
                path.segments.get(index - 1)?.length(),
                path.segments.get(index)?.length(),
            ))
        } else {
            None
        };

        let (_, knot) = path.positions.remove(self.id)?;

        if knots_before >= 2 {
            if index == 0 {
                path.segments.remove_segment(0)?;
            } else if index == knots_before - 1 {
                path.segments.remove_segment(index - 1)?;
            } else {
                path.segments.remove_segment(index)?;
                path.segments
                    .refresh_segment(index - 1, &path.positions, &path.config)?;
            }
        }

        let reflow = Reflow::Remove {
            index,
            knots_before,
            merged_lengths,
        };
        let moved = reflow_track(&mut path.rotations, &reflow, &path.segments)?
            + reflow_track(&mut path.speeds, &reflow, &path.segments)?
            + reflow_track(&mut path.fovs, &reflow, &path.segments)?;

        path.settle();
        debug!(
            index,
            knots = path.positions.len(),
            reflowed = moved,
            loops = path.loops,
            "removed position knot"
        );
        Ok(knot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::operations::edit::{AddAttributeKnot, InsertPositionKnot};
    use crate::path::{CameraPathConfig, KnotValue, PathT, SegmentTable};

    fn path_with(xs: &[f64]) -> (CameraPath, Vec<PositionKnotId>) {
        let mut path = CameraPath::new(CameraPathConfig::default()).unwrap();
        let ids = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                InsertPositionKnot::new(
                    i,
                    PositionKnot::from_tangent(
                        Point3::new(x, (x * 0.3).sin(), 0.0),
                        Vector3::new(3.0, 0.0, 1.0),
                    ),
                )
                .execute(&mut path)
                .unwrap()
            })
            .collect();
        (path, ids)
    }

    #[test]
    fn removing_unknown_knot_fails() {
        let (mut path, ids) = path_with(&[0.0, 3.0]);
        RemovePositionKnot::new(ids[0]).execute(&mut path).unwrap();
        assert!(RemovePositionKnot::new(ids[0]).execute(&mut path).is_err());
    }

    #[test]
    fn segments_match_full_rebuild() {
        let (mut path, ids) = path_with(&[0.0, 3.0, 6.0, 9.0, 12.0]);
        RemovePositionKnot::new(ids[2]).execute(&mut path).unwrap();
        RemovePositionKnot::new(ids[0]).execute(&mut path).unwrap();
        RemovePositionKnot::new(ids[4]).execute(&mut path).unwrap();
        assert_eq!(path.positions().len(), 2);
        let rebuilt = SegmentTable::build(path.positions(), path.config());
        assert_eq!(path.segments().len(), 1);
        assert_eq!(path.segments().get(0).unwrap(), rebuilt.get(0).unwrap());
    }

    #[test]
    fn knots_after_removed_knot_shift_back() {
        let (mut path, ids) = path_with(&[0.0, 3.0, 6.0, 9.0]);
        AddAttributeKnot::new(PathT::new(2.5), KnotValue::Fov(70.0))
            .execute(&mut path)
            .unwrap();
        RemovePositionKnot::new(ids[1]).execute(&mut path).unwrap();
        let (_, fov) = path.fovs().iter().next().unwrap();
        assert_relative_eq!(fov.t().value(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn removing_down_to_one_knot_collapses_placements() {
        let (mut path, ids) = path_with(&[0.0, 3.0]);
        AddAttributeKnot::new(PathT::new(0.5), KnotValue::Speed(4.0))
            .execute(&mut path)
            .unwrap();
        RemovePositionKnot::new(ids[1]).execute(&mut path).unwrap();
        assert!(path.segments().is_empty());
        let (_, speed) = path.speeds().iter().next().unwrap();
        assert_eq!(speed.t(), PathT::ZERO);
    }

    #[test]
    fn removing_tail_pins_knots_to_new_tail() {
        let (mut path, ids) = path_with(&[0.0, 3.0, 6.0]);
        AddAttributeKnot::new(PathT::new(1.5), KnotValue::Speed(4.0))
            .execute(&mut path)
            .unwrap();
        RemovePositionKnot::new(ids[2]).execute(&mut path).unwrap();
        let (_, speed) = path.speeds().iter().next().unwrap();
        assert_relative_eq!(speed.t().value(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(
            speed.world_position(),
            path.positions().tail().unwrap().position,
            epsilon = 1e-6
        );
    }
}
