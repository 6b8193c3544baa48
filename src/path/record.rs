use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PathError, Result};
use crate::math::{Point3, Rotation};

use super::{AttributeTrack, CameraPath, CameraPathConfig, PathT, PositionKnot, SegmentTable};

/// Flat record of a position knot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionKnotRecord {
    pub position: Point3,
    pub orientation: Rotation,
    pub tangent_scale: f64,
}

/// Flat record of a rotation knot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationKnotRecord {
    pub t: f64,
    pub rotation: Rotation,
}

/// Flat record of a speed or fov knot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarKnotRecord {
    pub t: f64,
    pub value: f64,
}

/// Everything needed to rebuild a [`CameraPath`], one array per knot family.
///
/// Position knots are listed in curve order. Attribute placements are stored
/// as-is, so importing does not replay any edit history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathRecord {
    pub position_knots: Vec<PositionKnotRecord>,
    pub rotation_knots: Vec<RotationKnotRecord>,
    pub speed_knots: Vec<ScalarKnotRecord>,
    pub fov_knots: Vec<ScalarKnotRecord>,
}

impl CameraPath {
    /// Exports the path as flat knot records.
    #[must_use]
    pub fn to_record(&self) -> PathRecord {
        PathRecord {
            position_knots: self
                .positions
                .iter()
                .map(|(_, k)| PositionKnotRecord {
                    position: k.position,
                    orientation: k.orientation,
                    tangent_scale: k.tangent_scale,
                })
                .collect(),
            rotation_knots: self
                .rotations
                .iter()
                .map(|(_, k)| RotationKnotRecord {
                    t: k.t().value(),
                    rotation: k.value(),
                })
                .collect(),
            speed_knots: scalar_records(&self.speeds),
            fov_knots: scalar_records(&self.fovs),
        }
    }

    /// Rebuilds a path from flat knot records.
    ///
    /// Attribute placements outside the path's range are clamped into it.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid or any record holds a
    /// non-finite number.
    pub fn from_record(record: &PathRecord, config: CameraPathConfig) -> Result<Self> {
        let mut path = Self::new(config)?;

        for (index, k) in record.position_knots.iter().enumerate() {
            let knot = PositionKnot::new(k.position, k.orientation, k.tangent_scale);
            if !knot.is_finite() {
                return Err(PathError::NonFinite("position knot record").into());
            }
            path.positions.insert(index, knot)?;
        }
        path.segments = SegmentTable::build(&path.positions, &path.config);

        let knot_count = path.positions.len();
        for k in &record.rotation_knots {
            if !k.rotation.coords.iter().all(|c| c.is_finite()) {
                return Err(PathError::NonFinite("rotation knot record").into());
            }
            path.rotations
                .insert(checked_placement(k.t, knot_count, "rotation")?, k.rotation);
        }
        import_scalars(&mut path.speeds, &record.speed_knots, knot_count, "speed")?;
        import_scalars(&mut path.fovs, &record.fov_knots, knot_count, "fov")?;

        path.settle();
        Ok(path)
    }
}

fn scalar_records<K: slotmap::Key>(track: &AttributeTrack<K, f64>) -> Vec<ScalarKnotRecord> {
    track
        .iter()
        .map(|(_, k)| ScalarKnotRecord {
            t: k.t().value(),
            value: k.value(),
        })
        .collect()
}

fn import_scalars<K: slotmap::Key>(
    track: &mut AttributeTrack<K, f64>,
    records: &[ScalarKnotRecord],
    knot_count: usize,
    family: &'static str,
) -> Result<()> {
    for k in records {
        if !k.value.is_finite() {
            return Err(PathError::NonFinite(family).into());
        }
        track.insert(checked_placement(k.t, knot_count, family)?, k.value);
    }
    Ok(())
}

fn checked_placement(t: f64, knot_count: usize, family: &'static str) -> Result<PathT> {
    if !t.is_finite() {
        return Err(PathError::NonFinite(family).into());
    }
    #[allow(clippy::cast_precision_loss)]
    let max = knot_count.saturating_sub(1) as f64;
    if !(0.0..=max).contains(&t) {
        warn!(family, t, max, "clamping out-of-range knot placement");
    }
    Ok(PathT::new(t.clamp(0.0, max)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Vector3;
    use crate::operations::edit::{AddAttributeKnot, InsertPositionKnot};
    use crate::path::KnotValue;

    fn sample_path() -> CameraPath {
        let mut path = CameraPath::new(CameraPathConfig::default()).unwrap();
        for (i, x) in [0.0, 5.0, 10.0].into_iter().enumerate() {
            InsertPositionKnot::new(
                i,
                PositionKnot::from_tangent(Point3::new(x, 0.0, 0.0), Vector3::new(5.0, 0.0, 0.0)),
            )
            .execute(&mut path)
            .unwrap();
        }
        let q = Rotation::from_axis_angle(&Vector3::y_axis(), 0.4);
        AddAttributeKnot::new(PathT::new(0.5), KnotValue::Rotation(q))
            .execute(&mut path)
            .unwrap();
        AddAttributeKnot::new(PathT::new(1.25), KnotValue::Speed(3.0))
            .execute(&mut path)
            .unwrap();
        AddAttributeKnot::new(PathT::new(1.75), KnotValue::Fov(45.0))
            .execute(&mut path)
            .unwrap();
        path
    }

    #[test]
    fn record_round_trips_through_json() {
        let path = sample_path();
        let record = path.to_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: PathRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);

        let rebuilt = CameraPath::from_record(&parsed, CameraPathConfig::default()).unwrap();
        assert_eq!(rebuilt.positions().len(), 3);
        assert_eq!(rebuilt.segments().len(), 2);
        assert_relative_eq!(rebuilt.length(), path.length(), epsilon = 1e-9);
        assert_eq!(rebuilt.to_record(), record);
    }

    #[test]
    fn out_of_range_placements_are_clamped() {
        let mut record = sample_path().to_record();
        record.speed_knots.push(ScalarKnotRecord { t: 9.0, value: 1.0 });
        let rebuilt = CameraPath::from_record(&record, CameraPathConfig::default()).unwrap();
        let last = rebuilt.speeds().iter().last().unwrap().1;
        assert!(last.t().value() <= 2.0);
        assert!(last.t().value() > 1.99);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut record = sample_path().to_record();
        record.fov_knots.push(ScalarKnotRecord {
            t: 1.0,
            value: f64::NAN,
        });
        assert!(CameraPath::from_record(&record, CameraPathConfig::default()).is_err());
    }

    #[test]
    fn empty_record_builds_empty_path() {
        let path = CameraPath::from_record(&PathRecord::default(), CameraPathConfig::default())
            .unwrap();
        assert!(path.positions().is_empty());
    }
}
