use std::cmp::Ordering;

use slotmap::Key;
use tracing::trace;

use crate::error::PathError;
use crate::path::{AttributeTrack, AttributeValue, PathT, SegmentTable};

/// How a single position-knot edit reshapes parameter space.
///
/// Built before the edit from the pre-edit segment lengths, applied after the
/// segment table has been updated.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Reflow {
    /// A knot was inserted at `index`. `split_length` is the length of the
    /// segment it split, if it landed between two existing knots.
    Insert {
        index: usize,
        knots_before: usize,
        split_length: Option<f64>,
    },
    /// The knot at `index` was removed. `merged_lengths` are the lengths of
    /// the two segments that became one, if it was an interior knot.
    Remove {
        index: usize,
        knots_before: usize,
        merged_lengths: Option<(f64, f64)>,
    },
}

impl Reflow {
    /// Maps a pre-edit placement to its post-edit placement.
    ///
    /// `cached_distance` is the knot's pre-edit arc length from the start of
    /// its segment. Knots on the edited span keep their proportional arc
    /// length across the span, so they stay put on the curve.
    pub(crate) fn remap(
        &self,
        t: PathT,
        cached_distance: f64,
        segments: &SegmentTable,
    ) -> Result<PathT, PathError> {
        match *self {
            Self::Insert {
                index,
                knots_before,
                split_length,
            } => {
                if index == 0 {
                    return Ok(if knots_before > 0 { t + 1.0 } else { t });
                }
                if index >= knots_before {
                    return Ok(t);
                }

                let split = index - 1;
                let (segment, _) = t.locate(knots_before - 1);
                match segment.cmp(&split) {
                    Ordering::Less => Ok(t),
                    Ordering::Greater => Ok(t + 1.0),
                    Ordering::Equal => {
                        let ratio = ratio(cached_distance, split_length.unwrap_or(0.0));
                        let first = segments.get(split)?.length();
                        let second = segments.get(split + 1)?.length();
                        let distance = ratio * (first + second);
                        if distance <= first {
                            segments.path_t_from_distance(split, distance)
                        } else {
                            segments.path_t_from_distance(split + 1, (distance - first).min(second))
                        }
                    }
                }
            }
            Self::Remove {
                index,
                knots_before,
                merged_lengths,
            } => {
                if knots_before <= 2 {
                    return Ok(PathT::ZERO);
                }

                let old_segments = knots_before - 1;
                let (segment, _) = t.locate(old_segments);
                if index == 0 {
                    return Ok(if segment == 0 { PathT::ZERO } else { t - 1.0 });
                }
                if index == knots_before - 1 {
                    #[allow(clippy::cast_precision_loss)]
                    let new_tail = PathT::new((old_segments - 1) as f64);
                    return Ok(if segment == old_segments - 1 { new_tail } else { t });
                }

                let before = index - 1;
                if segment < before {
                    return Ok(t);
                }
                if segment > index {
                    return Ok(t - 1.0);
                }

                let (first, second) = merged_lengths.unwrap_or((0.0, 0.0));
                let distance = if segment == before {
                    cached_distance
                } else {
                    first + cached_distance
                };
                let merged = segments.get(before)?.length();
                segments.path_t_from_distance(before, ratio(distance, first + second) * merged)
            }
        }
    }
}

fn ratio(distance: f64, length: f64) -> f64 {
    if length > 0.0 {
        (distance / length).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Remaps every knot of `track` and restores its ordering.
///
/// Returns how many knots changed placement.
pub(crate) fn reflow_track<K: Key, V: AttributeValue>(
    track: &mut AttributeTrack<K, V>,
    reflow: &Reflow,
    segments: &SegmentTable,
) -> Result<usize, PathError> {
    let mut moved = 0;
    for knot in track.knots_mut() {
        let before = knot.t();
        let after = reflow.remap(before, knot.distance_along_segment(), segments)?;
        if after != before {
            trace!(%before, %after, "reflowed attribute knot");
            moved += 1;
        }
        knot.set_t(after);
    }
    track.resort();
    Ok(moved)
}
