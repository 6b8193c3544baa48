use tracing::debug;

use crate::error::{PathError, Result};
use crate::path::{CameraPath, PositionKnot, PositionKnotId};

use super::reflow::{reflow_track, Reflow};

/// Inserts a position knot at a curve index.
///
/// Attribute knots on the split segment keep their proportional arc length
/// across the two new segments; knots further along shift by one segment.
pub struct InsertPositionKnot {
    index: usize,
    knot: PositionKnot,
}

impl InsertPositionKnot {
    /// Creates a new `InsertPositionKnot` operation.
    ///
    /// * `index` - Curve index the new knot will occupy, in `0..=N`.
    #[must_use]
    pub fn new(index: usize, knot: PositionKnot) -> Self {
        Self { index, knot }
    }

    /// Executes the insertion, returning the new knot's handle.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is greater than the knot count or the
    /// knot holds a non-finite value.
    pub fn execute(&self, path: &mut CameraPath) -> Result<PositionKnotId> {
        if !self.knot.is_finite() {
            return Err(PathError::NonFinite("position knot").into());
        }

        let index = self.index;
        let knots_before = path.positions.len();
        if index > knots_before {
            return Err(PathError::IndexOutOfRange {
                index,
                len: knots_before,
            }
            .into());
        }
        let split_length = if index > 0 && index < knots_before {
            Some(path.segments.get(index - 1)?.length())
        } else {
            None
        };

        let id = path.positions.insert(index, self.knot)?;

        if knots_before >= 1 {
            path.segments
                .insert_segment(index.saturating_sub(1), &path.positions, &path.config)?;
            for segment in [index.checked_sub(1), Some(index)].into_iter().flatten() {
                if segment < path.segments.len() {
                    path.segments
                        .refresh_segment(segment, &path.positions, &path.config)?;
                }
            }
        }

        let reflow = Reflow::Insert {
            index,
            knots_before,
            split_length,
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
            "inserted position knot"
        );
        Ok(id)
    }
}
