pub mod attribute;
pub mod config;
pub mod knot;
pub mod path_t;
pub mod position;
pub mod record;
pub mod segment;

pub use attribute::{
    AttributeKnot, AttributeTrack, AttributeValue, FovKnotId, RotationKnotId, SpeedKnotId,
};
pub use config::CameraPathConfig;
pub use knot::{AttributeKind, KnotId, KnotValue};
pub use path_t::PathT;
pub use position::{PositionKnot, PositionKnotId, PositionKnotStore};
pub use record::{PathRecord, PositionKnotRecord, RotationKnotRecord, ScalarKnotRecord};
pub use segment::{Segment, SegmentTable, Step};

use slotmap::Key;

use crate::error::Result;
use crate::math::{Point3, Rotation};

/// A camera path: the owner of every knot and derived segment.
///
/// Position knots define the Hermite curve; rotation, speed and fov knots
/// are placed along it by [`PathT`]. Edits go through the structs in
/// [`operations::edit`](crate::operations::edit), which keep segments,
/// attribute placements and cached distances consistent. Queries in
/// [`operations::query`](crate::operations::query) only read.
#[derive(Debug, Clone)]
pub struct CameraPath {
    pub(crate) config: CameraPathConfig,
    pub(crate) positions: PositionKnotStore,
    pub(crate) segments: SegmentTable,
    pub(crate) rotations: AttributeTrack<RotationKnotId, Rotation>,
    pub(crate) speeds: AttributeTrack<SpeedKnotId, f64>,
    pub(crate) fovs: AttributeTrack<FovKnotId, f64>,
    pub(crate) loops: bool,
}

impl CameraPath {
    /// Creates an empty path.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: CameraPathConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            positions: PositionKnotStore::new(),
            segments: SegmentTable::new(),
            rotations: AttributeTrack::new(),
            speeds: AttributeTrack::new(),
            fovs: AttributeTrack::new(),
            loops: false,
        })
    }

    /// Returns the path configuration.
    #[must_use]
    pub fn config(&self) -> &CameraPathConfig {
        &self.config
    }

    /// Returns the position knots.
    #[must_use]
    pub fn positions(&self) -> &PositionKnotStore {
        &self.positions
    }

    /// Returns the arc-length segment table.
    #[must_use]
    pub fn segments(&self) -> &SegmentTable {
        &self.segments
    }

    /// Returns the rotation knots.
    #[must_use]
    pub fn rotations(&self) -> &AttributeTrack<RotationKnotId, Rotation> {
        &self.rotations
    }

    /// Returns the speed knots.
    #[must_use]
    pub fn speeds(&self) -> &AttributeTrack<SpeedKnotId, f64> {
        &self.speeds
    }

    /// Returns the field-of-view knots.
    #[must_use]
    pub fn fovs(&self) -> &AttributeTrack<FovKnotId, f64> {
        &self.fovs
    }

    /// Returns whether the tail knot closes the path onto its head.
    #[must_use]
    pub fn path_loops(&self) -> bool {
        self.loops
    }

    /// Total arc length of the path.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments.total_length()
    }

    /// Clamps `t` into the path's range, wrapping instead when it loops.
    #[must_use]
    pub fn constrain(&self, t: PathT) -> PathT {
        t.constrain(self.positions.len(), self.loops)
    }

    /// Curve position at `t`; the origin for an empty path.
    pub(crate) fn point_at(&self, t: PathT) -> Point3 {
        self.positions
            .evaluate(t, self.loops)
            .unwrap_or_else(Point3::origin)
    }

    /// Arc length from the path head to an attribute knot.
    pub(crate) fn knot_distance<V: AttributeValue>(&self, knot: &AttributeKnot<V>) -> f64 {
        let (segment, _) = knot.t().locate(self.segments.len());
        self.segments.segment_start_distance(segment) + knot.distance_along_segment()
    }

    /// Re-derives everything that depends on the position knots, after the
    /// segment table has been brought up to date.
    pub(crate) fn settle(&mut self) {
        self.loops = match (self.positions.head(), self.positions.tail()) {
            (Some(head), Some(tail)) if self.positions.len() >= 3 => {
                head.coincides_with(tail, self.config.loop_tolerance)
            }
            _ => false,
        };

        let Self {
            positions,
            segments,
            rotations,
            speeds,
            fovs,
            loops,
            ..
        } = self;
        refresh_track(rotations, positions, segments, *loops);
        refresh_track(speeds, positions, segments, *loops);
        refresh_track(fovs, positions, segments, *loops);
    }
}

/// Constrains each placement to the path and recomputes its cached
/// distance and world position.
fn refresh_track<K: Key, V: AttributeValue>(
    track: &mut AttributeTrack<K, V>,
    positions: &PositionKnotStore,
    segments: &SegmentTable,
    loops: bool,
) {
    let knot_count = positions.len();
    for knot in track.knots_mut() {
        let t = knot.t().constrain(knot_count, loops);
        let world = positions.evaluate(t, loops).unwrap_or_else(Point3::origin);
        knot.set_t(t);
        knot.set_cache(segments.segment_distance_to_t(t), world);
    }
    track.resort();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_path_is_empty_and_open() {
        let path = CameraPath::new(CameraPathConfig::default()).unwrap();
        assert!(path.positions().is_empty());
        assert!(path.segments().is_empty());
        assert!(!path.path_loops());
        assert!(path.length().abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = CameraPathConfig {
            steps_per_segment: 0,
            ..CameraPathConfig::default()
        };
        assert!(CameraPath::new(config).is_err());
    }
}
