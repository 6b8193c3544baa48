use slotmap::SlotMap;

use crate::error::PathError;
use crate::math::{hermite, Point3, Rotation, Vector3, TOLERANCE};

use super::path_t::PathT;

slotmap::new_key_type! {
    /// Unique identifier for a position knot in a camera path.
    pub struct PositionKnotId;
}

/// A control point of the path's shape.
///
/// The outgoing Hermite tangent points along the knot's local `+Z` axis and
/// has length `tangent_scale`; the same tangent is used on both sides of the
/// knot, so the curve is C1 through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionKnot {
    /// World-space position of the knot.
    pub position: Point3,
    /// Orientation whose `+Z` axis gives the tangent direction.
    pub orientation: Rotation,
    /// Tangent magnitude used directly by the Hermite basis.
    pub tangent_scale: f64,
}

impl PositionKnot {
    /// Creates a new knot.
    #[must_use]
    pub fn new(position: Point3, orientation: Rotation, tangent_scale: f64) -> Self {
        Self {
            position,
            orientation,
            tangent_scale,
        }
    }

    /// Creates a knot whose tangent is exactly `tangent`.
    ///
    /// A zero tangent yields an identity orientation with zero scale.
    #[must_use]
    pub fn from_tangent(position: Point3, tangent: Vector3) -> Self {
        let scale = tangent.norm();
        if scale < TOLERANCE {
            return Self::new(position, Rotation::identity(), 0.0);
        }
        let orientation = Rotation::rotation_between(&Vector3::z(), &tangent).unwrap_or_else(|| {
            // Antiparallel to +Z: any half-turn about a perpendicular axis works.
            Rotation::from_axis_angle(&Vector3::y_axis(), std::f64::consts::PI)
        });
        Self::new(position, orientation, scale)
    }

    /// Returns the scaled Hermite tangent.
    #[must_use]
    pub fn tangent(&self) -> Vector3 {
        self.orientation * Vector3::z() * self.tangent_scale
    }

    /// Returns whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
            && self.orientation.coords.iter().all(|c| c.is_finite())
            && self.tangent_scale.is_finite()
    }

    /// Returns whether both knots share position, tangent magnitude and
    /// orientation within `tolerance`.
    #[must_use]
    pub fn coincides_with(&self, other: &Self, tolerance: f64) -> bool {
        (self.position - other.position).norm() <= tolerance
            && (self.tangent_scale - other.tangent_scale).abs() <= tolerance
            && self.orientation.angle_to(&other.orientation) <= tolerance
    }
}

/// Ordered storage for position knots.
///
/// Knots live in an arena keyed by [`PositionKnotId`]; `order` holds the
/// curve order, so a knot's index is its position in `order`, not its
/// insertion time.
#[derive(Debug, Default, Clone)]
pub struct PositionKnotStore {
    knots: SlotMap<PositionKnotId, PositionKnot>,
    order: Vec<PositionKnotId>,
}

impl PositionKnotStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the store holds no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the knot ids in curve order.
    #[must_use]
    pub fn ids(&self) -> &[PositionKnotId] {
        &self.order
    }

    /// Iterates knots in curve order.
    pub fn iter(&self) -> impl Iterator<Item = (PositionKnotId, &PositionKnot)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.knots.get(id).map(|knot| (id, knot)))
    }

    /// Returns the knot data for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not in the store.
    pub fn get(&self, id: PositionKnotId) -> Result<&PositionKnot, PathError> {
        self.knots
            .get(id)
            .ok_or(PathError::KnotNotFound("position knot"))
    }

    /// Returns mutable knot data for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not in the store.
    pub fn get_mut(&mut self, id: PositionKnotId) -> Result<&mut PositionKnot, PathError> {
        self.knots
            .get_mut(id)
            .ok_or(PathError::KnotNotFound("position knot"))
    }

    /// Returns the knot at curve index `index`.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&PositionKnot> {
        self.order.get(index).and_then(|&id| self.knots.get(id))
    }

    /// Returns the curve index of `id`.
    #[must_use]
    pub fn index_of(&self, id: PositionKnotId) -> Option<usize> {
        self.order.iter().position(|&k| k == id)
    }

    /// Returns the first knot.
    #[must_use]
    pub fn head(&self) -> Option<&PositionKnot> {
        self.at(0)
    }

    /// Returns the last knot.
    #[must_use]
    pub fn tail(&self) -> Option<&PositionKnot> {
        self.order.last().and_then(|&id| self.knots.get(id))
    }

    /// Evaluates the Hermite curve through the knots at `t`.
    ///
    /// `t` is clamped (or wrapped, for a looping path) first. A single knot
    /// yields its own position; an empty store yields `None`.
    #[must_use]
    pub fn evaluate(&self, t: PathT, looping: bool) -> Option<Point3> {
        match self.len() {
            0 => None,
            1 => self.head().map(|k| k.position),
            n => {
                let (segment, local) = t.constrain(n, looping).locate(n - 1);
                let a = self.at(segment)?;
                let b = self.at(segment + 1)?;
                Some(hermite::hermite_point(
                    &a.position,
                    &a.tangent(),
                    &b.position,
                    &b.tangent(),
                    local,
                ))
            }
        }
    }

    /// Inserts `knot` so that it ends up at curve index `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is greater than the number of knots.
    pub fn insert(&mut self, index: usize, knot: PositionKnot) -> Result<PositionKnotId, PathError> {
        if index > self.order.len() {
            return Err(PathError::IndexOutOfRange {
                index,
                len: self.order.len(),
            });
        }
        let id = self.knots.insert(knot);
        self.order.insert(index, id);
        Ok(id)
    }

    /// Removes `id`, returning its former curve index and data.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not in the store.
    pub fn remove(&mut self, id: PositionKnotId) -> Result<(usize, PositionKnot), PathError> {
        let index = self
            .index_of(id)
            .ok_or(PathError::KnotNotFound("position knot"))?;
        self.order.remove(index);
        let knot = self
            .knots
            .remove(id)
            .ok_or(PathError::KnotNotFound("position knot"))?;
        Ok((index, knot))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn knot(x: f64) -> PositionKnot {
        PositionKnot::from_tangent(Point3::new(x, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn from_tangent_round_trips() {
        let t = Vector3::new(1.0, 2.0, -2.0);
        let k = PositionKnot::from_tangent(Point3::origin(), t);
        assert_relative_eq!(k.tangent(), t, epsilon = 1e-12);
        assert_relative_eq!(k.tangent_scale, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn from_tangent_handles_negative_z() {
        let t = Vector3::new(0.0, 0.0, -2.0);
        let k = PositionKnot::from_tangent(Point3::origin(), t);
        assert_relative_eq!(k.tangent(), t, epsilon = 1e-12);
    }

    #[test]
    fn insert_orders_by_index_not_time() {
        let mut store = PositionKnotStore::new();
        let a = store.insert(0, knot(0.0)).unwrap();
        let c = store.insert(1, knot(2.0)).unwrap();
        let b = store.insert(1, knot(1.0)).unwrap();
        assert_eq!(store.ids(), &[a, b, c]);
        assert_eq!(store.index_of(c), Some(2));
        assert_relative_eq!(store.at(1).unwrap().position.x, 1.0);
    }

    #[test]
    fn insert_past_end_fails() {
        let mut store = PositionKnotStore::new();
        assert!(store.insert(1, knot(0.0)).is_err());
    }

    #[test]
    fn remove_returns_index_and_invalidates_handle() {
        let mut store = PositionKnotStore::new();
        let a = store.insert(0, knot(0.0)).unwrap();
        let b = store.insert(1, knot(1.0)).unwrap();
        let (index, removed) = store.remove(a).unwrap();
        assert_eq!(index, 0);
        assert_relative_eq!(removed.position.x, 0.0);
        assert!(store.get(a).is_err());
        assert_eq!(store.ids(), &[b]);
        assert!(store.remove(a).is_err());
    }

    #[test]
    fn evaluate_hits_knots() {
        let mut store = PositionKnotStore::new();
        assert!(store.evaluate(PathT::ZERO, false).is_none());
        store.insert(0, knot(0.0)).unwrap();
        assert_relative_eq!(store.evaluate(PathT::new(0.7), false).unwrap().x, 0.0);
        store.insert(1, knot(1.0)).unwrap();
        store.insert(2, knot(2.0)).unwrap();
        assert_relative_eq!(store.evaluate(PathT::new(1.0), false).unwrap().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(store.evaluate(PathT::new(2.0), false).unwrap().x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(store.evaluate(PathT::new(1.5), false).unwrap().x, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn coincidence_checks_orientation() {
        let a = knot(0.0);
        let mut b = a;
        assert!(a.coincides_with(&b, 1e-6));
        b.orientation = Rotation::from_axis_angle(&Vector3::x_axis(), 0.5);
        assert!(!a.coincides_with(&b, 1e-6));
    }
}
