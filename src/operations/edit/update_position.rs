use tracing::debug;

use crate::error::{PathError, Result};
use crate::path::{CameraPath, PositionKnot, PositionKnotId};

/// Replaces the data of an existing position knot.
///
/// Attribute placements are parameters, so they ride along with the curve;
/// only their cached distances and world positions change.
pub struct UpdatePositionKnot {
    id: PositionKnotId,
    knot: PositionKnot,
}

impl UpdatePositionKnot {
    /// Creates a new `UpdatePositionKnot` operation.
    #[must_use]
    pub fn new(id: PositionKnotId, knot: PositionKnot) -> Self {
        Self { id, knot }
    }

    /// Executes the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not part of the path or the new data
    /// holds a non-finite value.
    pub fn execute(&self, path: &mut CameraPath) -> Result<()> {
        if !self.knot.is_finite() {
            return Err(PathError::NonFinite("position knot").into());
        }

        let index = path
            .positions
            .index_of(self.id)
            .ok_or(PathError::KnotNotFound("position knot"))?;
        *path.positions.get_mut(self.id)? = self.knot;

        for segment in [index.checked_sub(1), Some(index)].into_iter().flatten() {
            if segment < path.segments.len() {
                path.segments
                    .refresh_segment(segment, &path.positions, &path.config)?;
            }
        }

        path.settle();
        debug!(index, loops = path.loops, "updated position knot");
        Ok(())
    }
}
