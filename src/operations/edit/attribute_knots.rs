use tracing::debug;

use crate::error::{PathError, Result};
use crate::path::{AttributeKind, CameraPath, KnotId, KnotValue, PathT};

use super::RemovePositionKnot;

/// Places a rotation, speed or fov knot on the path.
pub struct AddAttributeKnot {
    t: PathT,
    value: KnotValue,
}

impl AddAttributeKnot {
    /// Creates a new `AddAttributeKnot` operation.
    ///
    /// The family is taken from the value's variant.
    #[must_use]
    pub fn new(t: PathT, value: KnotValue) -> Self {
        Self { t, value }
    }

    /// Executes the operation, returning the new knot's handle.
    ///
    /// The placement is clamped (or wrapped) into the path's range.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not finite.
    pub fn execute(&self, path: &mut CameraPath) -> Result<KnotId> {
        if !self.value.is_finite() {
            return Err(PathError::NonFinite("attribute knot value").into());
        }
        let t = path.constrain(self.t);
        let id = match self.value {
            KnotValue::Rotation(q) => KnotId::Rotation(path.rotations.insert(t, q)),
            KnotValue::Speed(v) => KnotId::Speed(path.speeds.insert(t, v)),
            KnotValue::Fov(v) => KnotId::Fov(path.fovs.insert(t, v)),
        };
        path.settle();
        debug!(kind = ?self.value.kind(), %t, "added attribute knot");
        Ok(id)
    }
}

/// Removes any knot by handle.
///
/// Position knots are delegated to [`RemovePositionKnot`] so that attribute
/// knots reflow.
pub struct RemoveKnot {
    id: KnotId,
}

impl RemoveKnot {
    /// Creates a new `RemoveKnot` operation.
    #[must_use]
    pub fn new(id: KnotId) -> Self {
        Self { id }
    }

    /// Executes the removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not part of the path.
    pub fn execute(&self, path: &mut CameraPath) -> Result<()> {
        match self.id {
            KnotId::Position(id) => {
                RemovePositionKnot::new(id).execute(path)?;
                return Ok(());
            }
            KnotId::Rotation(id) => {
                path.rotations.remove(id)?;
            }
            KnotId::Speed(id) => {
                path.speeds.remove(id)?;
            }
            KnotId::Fov(id) => {
                path.fovs.remove(id)?;
            }
        }
        debug!(id = ?self.id, "removed attribute knot");
        Ok(())
    }
}

/// Moves an attribute knot to a new placement.
pub struct MoveAttributeKnot {
    id: KnotId,
    t: PathT,
}

impl MoveAttributeKnot {
    /// Creates a new `MoveAttributeKnot` operation.
    #[must_use]
    pub fn new(id: KnotId, t: PathT) -> Self {
        Self { id, t }
    }

    /// Executes the move, re-sorting the knot's family.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not part of the path or is a
    /// position knot.
    pub fn execute(&self, path: &mut CameraPath) -> Result<()> {
        let t = path.constrain(self.t);
        match self.id {
            KnotId::Position(_) => {
                return Err(
                    PathError::KnotNotFound("attribute knot (got a position knot)").into(),
                )
            }
            KnotId::Rotation(id) => path.rotations.set_t(id, t)?,
            KnotId::Speed(id) => path.speeds.set_t(id, t)?,
            KnotId::Fov(id) => path.fovs.set_t(id, t)?,
        }
        path.settle();
        Ok(())
    }
}

/// Replaces the value of an attribute knot.
pub struct SetAttributeValue {
    id: KnotId,
    value: KnotValue,
}

impl SetAttributeValue {
    /// Creates a new `SetAttributeValue` operation.
    #[must_use]
    pub fn new(id: KnotId, value: KnotValue) -> Self {
        Self { id, value }
    }

    /// Executes the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not part of the path, the value is
    /// not finite, or the value's family does not match the knot's.
    pub fn execute(&self, path: &mut CameraPath) -> Result<()> {
        if !self.value.is_finite() {
            return Err(PathError::NonFinite("attribute knot value").into());
        }
        match (self.id, self.value) {
            (KnotId::Rotation(id), KnotValue::Rotation(q)) => path.rotations.set_value(id, q)?,
            (KnotId::Speed(id), KnotValue::Speed(v)) => path.speeds.set_value(id, v)?,
            (KnotId::Fov(id), KnotValue::Fov(v)) => path.fovs.set_value(id, v)?,
            _ => {
                return Err(PathError::KnotNotFound("attribute knot of the value's family").into())
            }
        }
        Ok(())
    }
}

/// Restores placement order of one attribute family after its placements
/// were rewritten in place, then refreshes cached distances and world
/// positions.
///
/// Edits through this module keep families sorted, so on a consistent path
/// this leaves the order untouched.
pub struct ResortAttributeKnots {
    kind: AttributeKind,
}

impl ResortAttributeKnots {
    /// Creates a new `ResortAttributeKnots` operation.
    #[must_use]
    pub fn new(kind: AttributeKind) -> Self {
        Self { kind }
    }

    /// Executes the re-sort.
    pub fn execute(&self, path: &mut CameraPath) {
        match self.kind {
            AttributeKind::Rotation => path.rotations.resort(),
            AttributeKind::Speed => path.speeds.resort(),
            AttributeKind::Fov => path.fovs.resort(),
        }
        path.settle();
        debug!(kind = ?self.kind, "resorted attribute knots");
    }
}
