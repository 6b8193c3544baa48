use crate::error::PathError;
use crate::math::{hermite, Aabb, Point3};

use super::config::CameraPathConfig;
use super::path_t::PathT;
use super::position::{PositionKnot, PositionKnotStore};

/// Slack allowed when a distance overshoots a segment's summed length.
const LENGTH_SLACK: f64 = 1e-9;

/// A straight-line chord of a segment between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Curve point at the start of the step.
    pub start: Point3,
    /// Curve point at the end of the step.
    pub end: Point3,
    /// Euclidean length of the chord.
    pub length: f64,
}

/// Arc-length samples of the Hermite curve between two adjacent position
/// knots.
///
/// The `K` steps sit at equally spaced local parameters, so step `j` covers
/// local parameters `[j / K, (j + 1) / K]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    steps: Vec<Step>,
    length: f64,
    bounds: Aabb,
}

impl Segment {
    /// Samples the curve between `start` and `end` into `step_count` steps.
    ///
    /// `radius` expands the bounding box used to cull projection queries.
    #[must_use]
    pub fn sample(start: &PositionKnot, end: &PositionKnot, step_count: usize, radius: f64) -> Self {
        let step_count = step_count.max(1);
        let m0 = start.tangent();
        let m1 = end.tangent();

        #[allow(clippy::cast_precision_loss)]
        let k = step_count as f64;
        let points: Vec<Point3> = (0..=step_count)
            .map(|j| {
                #[allow(clippy::cast_precision_loss)]
                let s = j as f64 / k;
                hermite::hermite_point(&start.position, &m0, &end.position, &m1, s)
            })
            .collect();

        let mut bounds = Aabb::from_point(points[0]);
        let mut length = 0.0;
        let steps = points
            .windows(2)
            .map(|w| {
                bounds.include(&w[1]);
                let step_length = (w[1] - w[0]).norm();
                length += step_length;
                Step {
                    start: w[0],
                    end: w[1],
                    length: step_length,
                }
            })
            .collect();

        Self {
            steps,
            length,
            bounds: bounds.expanded(radius),
        }
    }

    /// Returns the arc-length steps.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the summed step length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the radius-expanded bounding box of the samples.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Arc length from the segment start to local parameter `local`.
    #[must_use]
    pub fn distance_to_local(&self, local: f64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let scaled = local.clamp(0.0, 1.0) * self.steps.len() as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bucket = (scaled.floor() as usize).min(self.steps.len() - 1);
        #[allow(clippy::cast_precision_loss)]
        let within = scaled - bucket as f64;

        let before: f64 = self.steps[..bucket].iter().map(|s| s.length).sum();
        before + within * self.steps[bucket].length
    }

    /// Local parameter at arc length `distance` from the segment start.
    ///
    /// Returns `None` if `distance` exceeds the segment length.
    #[must_use]
    pub fn local_from_distance(&self, distance: f64) -> Option<f64> {
        #[allow(clippy::cast_precision_loss)]
        let k = self.steps.len() as f64;
        let mut remaining = distance.max(0.0);
        for (j, step) in self.steps.iter().enumerate() {
            if remaining <= step.length {
                let frac = if step.length > 0.0 {
                    remaining / step.length
                } else {
                    0.0
                };
                #[allow(clippy::cast_precision_loss)]
                return Some((j as f64 + frac) / k);
            }
            remaining -= step.length;
        }
        (remaining <= LENGTH_SLACK).then_some(1.0)
    }
}

/// One [`Segment`] per pair of adjacent position knots, in curve order.
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    segments: Vec<Segment>,
}

impl SegmentTable {
    /// Creates a new, empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table for every adjacent knot pair in `knots`.
    #[must_use]
    pub fn build(knots: &PositionKnotStore, config: &CameraPathConfig) -> Self {
        let ordered: Vec<&PositionKnot> = knots.iter().map(|(_, k)| k).collect();
        let segments = ordered
            .windows(2)
            .map(|w| {
                Segment::sample(
                    w[0],
                    w[1],
                    config.steps_per_segment,
                    config.projection_radius,
                )
            })
            .collect();
        Self { segments }
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns whether the table has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates segments in curve order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter()
    }

    /// Returns segment `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn get(&self, index: usize) -> Result<&Segment, PathError> {
        self.segments.get(index).ok_or(PathError::SegmentOutOfRange {
            index,
            count: self.segments.len(),
        })
    }

    /// Re-samples segment `index` from its two endpoint knots.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or either endpoint knot is
    /// missing from `knots`.
    pub fn refresh_segment(
        &mut self,
        index: usize,
        knots: &PositionKnotStore,
        config: &CameraPathConfig,
    ) -> Result<(), PathError> {
        let count = self.segments.len();
        let slot = self
            .segments
            .get_mut(index)
            .ok_or(PathError::SegmentOutOfRange { index, count })?;
        *slot = sample_between(index, knots, config)?;
        Ok(())
    }

    /// Splices a freshly sampled segment in at `index`.
    ///
    /// The knots at `index` and `index + 1` must already be in `knots`.
    pub(crate) fn insert_segment(
        &mut self,
        index: usize,
        knots: &PositionKnotStore,
        config: &CameraPathConfig,
    ) -> Result<(), PathError> {
        if index > self.segments.len() {
            return Err(PathError::SegmentOutOfRange {
                index,
                count: self.segments.len(),
            });
        }
        let segment = sample_between(index, knots, config)?;
        self.segments.insert(index, segment);
        Ok(())
    }

    /// Deletes segment `index`.
    pub(crate) fn remove_segment(&mut self, index: usize) -> Result<Segment, PathError> {
        if index >= self.segments.len() {
            return Err(PathError::SegmentOutOfRange {
                index,
                count: self.segments.len(),
            });
        }
        Ok(self.segments.remove(index))
    }

    /// Total arc length of the path.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Arc length from the path head to the start of segment `index`.
    #[must_use]
    pub fn segment_start_distance(&self, index: usize) -> f64 {
        self.segments
            .iter()
            .take(index)
            .map(Segment::length)
            .sum()
    }

    /// Arc length from the start of `t`'s segment to `t`.
    ///
    /// An empty table yields zero.
    #[must_use]
    pub fn segment_distance_to_t(&self, t: PathT) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        let (segment, local) = t.locate(self.segments.len());
        self.segments[segment].distance_to_local(local)
    }

    /// Arc length from the path head to `t`.
    #[must_use]
    pub fn distance_from_start(&self, t: PathT) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        let (segment, _) = t.locate(self.segments.len());
        self.segment_start_distance(segment) + self.segment_distance_to_t(t)
    }

    /// Converts an arc length measured from the start of `segment` back into
    /// a path parameter.
    ///
    /// A distance beyond the segment's length yields [`PathT::ZERO`].
    ///
    /// # Errors
    ///
    /// Returns an error if `segment` is out of range.
    pub fn path_t_from_distance(&self, segment: usize, distance: f64) -> Result<PathT, PathError> {
        let seg = self.get(segment)?;
        Ok(seg.local_from_distance(distance).map_or(PathT::ZERO, |local| {
            #[allow(clippy::cast_precision_loss)]
            PathT::new(segment as f64 + local)
        }))
    }
}

fn sample_between(
    index: usize,
    knots: &PositionKnotStore,
    config: &CameraPathConfig,
) -> Result<Segment, PathError> {
    let start = knots
        .at(index)
        .ok_or(PathError::KnotNotFound("segment start knot"))?;
    let end = knots
        .at(index + 1)
        .ok_or(PathError::KnotNotFound("segment end knot"))?;
    Ok(Segment::sample(
        start,
        end,
        config.steps_per_segment,
        config.projection_radius,
    ))
}
