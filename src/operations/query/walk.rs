use crate::math::TOLERANCE;
use crate::path::{CameraPath, PathT, Segment};

/// Result of walking a distance along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathWalk {
    /// Where the walk ended.
    pub t: PathT,
    /// Whether the walk wrapped past the end (or, walking backwards, the
    /// start) of a looping path.
    pub rolled: bool,
}

/// Walks an arc-length distance along the path from a starting parameter.
///
/// Step lengths are consumed one at a time. A looping path wraps back to
/// segment 0 and reports `rolled`; an open path stops at its end. A negative
/// amount walks towards the head.
pub struct MoveAlongPath {
    amount: f64,
    start: PathT,
}

impl MoveAlongPath {
    /// Creates a new `MoveAlongPath` query.
    ///
    /// * `amount` - Arc length to travel; negative walks backwards.
    /// * `start` - Parameter the walk starts from.
    #[must_use]
    pub fn new(amount: f64, start: PathT) -> Self {
        Self { amount, start }
    }

    /// Executes the walk.
    ///
    /// A zero (or non-finite) amount, or a path with fewer than two position
    /// knots, returns the start parameter unchanged.
    #[must_use]
    pub fn execute(&self, path: &CameraPath) -> PathWalk {
        let unchanged = PathWalk {
            t: self.start,
            rolled: false,
        };
        let segments: Vec<&Segment> = path.segments().iter().collect();
        if !self.amount.is_normal() || segments.is_empty() {
            return unchanged;
        }

        let loops = path.path_loops();
        let total = path.length();
        if loops && total <= TOLERANCE {
            return unchanged;
        }

        let start = path.constrain(self.start);
        let mut cursor = Cursor::at(&segments, start);
        let mut remaining = self.amount.abs();
        let mut rolled = false;
        if loops && remaining >= total {
            remaining = remaining.rem_euclid(total);
            rolled = true;
        }

        let finished = if self.amount > 0.0 {
            cursor.forward(&segments, remaining, loops, &mut rolled)
        } else {
            cursor.backward(&segments, remaining, loops, &mut rolled)
        };
        if !finished {
            // An open path ran off one of its ends.
            let t = if self.amount > 0.0 {
                #[allow(clippy::cast_precision_loss)]
                PathT::new(segments.len() as f64).clamp(path.positions().len())
            } else {
                PathT::ZERO
            };
            return PathWalk { t, rolled: false };
        }

        let t = cursor.path_t(&segments);
        #[allow(clippy::cast_precision_loss)]
        let end = segments.len() as f64 - PathT::CLAMP_EPSILON;
        if loops && t.value() >= end {
            return PathWalk {
                t: PathT::ZERO,
                rolled: true,
            };
        }
        PathWalk {
            t: path.constrain(t),
            rolled,
        }
    }
}

/// A position on the step grid: segment, step within it, and the fraction
/// through that step.
struct Cursor {
    segment: usize,
    step: usize,
    within: f64,
}

impl Cursor {
    fn at(segments: &[&Segment], t: PathT) -> Self {
        let (segment, local) = t.locate(segments.len());
        let steps = segments[segment].steps().len();
        #[allow(clippy::cast_precision_loss)]
        let scaled = local * steps as f64;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let step = (scaled.floor() as usize).min(steps - 1);
        #[allow(clippy::cast_precision_loss)]
        let within = (scaled - step as f64).clamp(0.0, 1.0);
        Self {
            segment,
            step,
            within,
        }
    }

    fn path_t(&self, segments: &[&Segment]) -> PathT {
        #[allow(clippy::cast_precision_loss)]
        let steps = segments[self.segment].steps().len() as f64;
        #[allow(clippy::cast_precision_loss)]
        PathT::new(self.segment as f64 + (self.step as f64 + self.within) / steps)
    }

    /// Returns `false` if an open path ends before `remaining` is used up.
    fn forward(&mut self, segments: &[&Segment], mut remaining: f64, loops: bool, rolled: &mut bool) -> bool {
        loop {
            let length = segments[self.segment].steps()[self.step].length;
            let left = length * (1.0 - self.within);
            if remaining <= left {
                if length > 0.0 {
                    self.within = (self.within + remaining / length).min(1.0);
                }
                return true;
            }
            remaining -= left;
            self.within = 0.0;
            self.step += 1;
            if self.step == segments[self.segment].steps().len() {
                self.step = 0;
                self.segment += 1;
                if self.segment == segments.len() {
                    if !loops {
                        return false;
                    }
                    self.segment = 0;
                    *rolled = true;
                }
            }
        }
    }

    /// Returns `false` if an open path starts before `remaining` is used up.
    fn backward(&mut self, segments: &[&Segment], mut remaining: f64, loops: bool, rolled: &mut bool) -> bool {
        loop {
            let length = segments[self.segment].steps()[self.step].length;
            let done = length * self.within;
            if remaining <= done {
                if length > 0.0 {
                    self.within = (self.within - remaining / length).max(0.0);
                }
                return true;
            }
            remaining -= done;
            self.within = 1.0;
            if self.step > 0 {
                self.step -= 1;
                continue;
            }
            if self.segment == 0 {
                if !loops {
                    return false;
                }
                self.segment = segments.len();
                *rolled = true;
            }
            self.segment -= 1;
            self.step = segments[self.segment].steps().len() - 1;
        }
    }
}
