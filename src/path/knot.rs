use crate::math::Rotation;

use super::attribute::{FovKnotId, RotationKnotId, SpeedKnotId};
use super::position::PositionKnotId;

/// Handle to any knot of a camera path, tagged by family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnotId {
    Position(PositionKnotId),
    Rotation(RotationKnotId),
    Speed(SpeedKnotId),
    Fov(FovKnotId),
}

impl From<PositionKnotId> for KnotId {
    fn from(id: PositionKnotId) -> Self {
        Self::Position(id)
    }
}

impl From<RotationKnotId> for KnotId {
    fn from(id: RotationKnotId) -> Self {
        Self::Rotation(id)
    }
}

impl From<SpeedKnotId> for KnotId {
    fn from(id: SpeedKnotId) -> Self {
        Self::Speed(id)
    }
}

impl From<FovKnotId> for KnotId {
    fn from(id: FovKnotId) -> Self {
        Self::Fov(id)
    }
}

/// The three attribute knot families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Rotation,
    Speed,
    Fov,
}

/// A value for one attribute family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnotValue {
    /// Camera orientation.
    Rotation(Rotation),
    /// Playback speed in distance units per second.
    Speed(f64),
    /// Field of view in degrees.
    Fov(f64),
}

impl KnotValue {
    /// Returns the family this value belongs to.
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Rotation(_) => AttributeKind::Rotation,
            Self::Speed(_) => AttributeKind::Speed,
            Self::Fov(_) => AttributeKind::Fov,
        }
    }

    /// Returns whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Rotation(q) => q.coords.iter().all(|c| c.is_finite()),
            Self::Speed(v) | Self::Fov(v) => v.is_finite(),
        }
    }
}
