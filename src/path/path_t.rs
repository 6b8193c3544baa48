use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// A position along a camera path in knot-parameter space.
///
/// The integer part selects a segment (the span between position knots
/// `floor(t)` and `floor(t) + 1`); the fractional part is the local Hermite
/// parameter within that segment. Valid values lie in `[0, N - 1]` for a path
/// of `N` position knots.
///
/// `PathT` is totally ordered. Non-finite inputs are mapped to zero on
/// construction so the ordering never has to deal with NaN.
/// Negative zero is folded into positive zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathT(f64);

impl PathT {
    /// The head of the path.
    pub const ZERO: Self = Self(0.0);

    /// Distance kept from the tail by [`PathT::clamp`] so that `floor()` always
    /// names an existing segment.
    pub const CLAMP_EPSILON: f64 = 1e-9;

    /// Creates a parameter from a raw value.
    #[must_use]
    pub fn new(t: f64) -> Self {
        if t.is_finite() {
            // Adding zero folds -0.0 into +0.0 for the total order.
            Self(t + 0.0)
        } else {
            Self::ZERO
        }
    }

    /// Returns the raw parameter value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the segment index selected by the integer part.
    #[must_use]
    pub fn floor(self) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = self.0.floor().max(0.0) as usize;
        index
    }

    /// Returns the local parameter within the segment, in `[0, 1)`.
    #[must_use]
    pub fn fract(self) -> f64 {
        self.0 - self.0.floor()
    }

    /// Clamps to `[0, max(knot_count - 1 - ε, 0)]`.
    #[must_use]
    pub fn clamp(self, knot_count: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let max = (knot_count as f64 - 1.0 - Self::CLAMP_EPSILON).max(0.0);
        Self::new(self.0.clamp(0.0, max))
    }

    /// Wraps into `[0, knot_count - 1)`, the parameter range of a looping path
    /// whose tail knot duplicates its head.
    #[must_use]
    pub fn wrap(self, knot_count: usize) -> Self {
        if knot_count < 2 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_precision_loss)]
        let span = (knot_count - 1) as f64;
        let wrapped = self.0.rem_euclid(span);
        // rem_euclid can round up to `span` for tiny negative inputs.
        Self::new(if wrapped >= span { 0.0 } else { wrapped })
    }

    /// Clamps for an open path or wraps for a looping one.
    #[must_use]
    pub fn constrain(self, knot_count: usize, looping: bool) -> Self {
        if looping {
            self.wrap(knot_count)
        } else {
            self.clamp(knot_count)
        }
    }

    /// Splits into `(segment, local)` for a table of `segment_count` segments.
    ///
    /// Unlike [`floor`](Self::floor)/[`fract`](Self::fract), the tail
    /// parameter `segment_count` maps to `(segment_count - 1, 1.0)` rather
    /// than to a segment past the end.
    #[must_use]
    pub fn locate(self, segment_count: usize) -> (usize, f64) {
        if segment_count == 0 {
            return (0, 0.0);
        }
        let segment = self.floor().min(segment_count - 1);
        #[allow(clippy::cast_precision_loss)]
        let local = (self.0 - segment as f64).clamp(0.0, 1.0);
        (segment, local)
    }
}

impl From<f64> for PathT {
    fn from(t: f64) -> Self {
        Self::new(t)
    }
}

impl PartialEq for PathT {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathT {}

impl PartialOrd for PathT {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathT {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for PathT {
    type Output = PathT;

    fn add(self, rhs: f64) -> PathT {
        PathT::new(self.0 + rhs)
    }
}

impl Sub<f64> for PathT {
    type Output = PathT;

    fn sub(self, rhs: f64) -> PathT {
        PathT::new(self.0 - rhs)
    }
}

impl Sub for PathT {
    type Output = f64;

    fn sub(self, rhs: PathT) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for PathT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.6}", self.0)
    }
}
