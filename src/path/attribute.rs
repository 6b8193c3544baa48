use std::fmt;

use slotmap::{Key, SlotMap};

use crate::error::PathError;
use crate::math::{hermite, quat, Point3, Rotation};

use super::path_t::PathT;

slotmap::new_key_type! {
    /// Unique identifier for a rotation knot.
    pub struct RotationKnotId;
}

slotmap::new_key_type! {
    /// Unique identifier for a speed knot.
    pub struct SpeedKnotId;
}

slotmap::new_key_type! {
    /// Unique identifier for a field-of-view knot.
    pub struct FovKnotId;
}

/// A value that can be carried by attribute knots and blended along the path.
pub trait AttributeValue: Copy + fmt::Debug {
    /// Interpolates between `window[1]` and `window[2]` at blend factor `s`,
    /// with `window[0]` and `window[3]` as the outer neighbours.
    ///
    /// `across_loop_seam` is set when the window may straddle the seam of a
    /// looping path, where stored continuity does not hold.
    fn interpolate(window: [Self; 4], s: f64, across_loop_seam: bool) -> Self;

    /// Returns the representation of `self` that is continuous with
    /// `previous`. Most values have only one representation.
    #[must_use]
    fn continue_from(self, _previous: &Self) -> Self {
        self
    }
}

impl AttributeValue for f64 {
    fn interpolate(window: [Self; 4], s: f64, _across_loop_seam: bool) -> Self {
        hermite::catmull_rom(window, s)
    }
}

impl AttributeValue for Rotation {
    fn interpolate(window: [Self; 4], s: f64, across_loop_seam: bool) -> Self {
        let window = if across_loop_seam {
            quat::align_window(window)
        } else {
            window
        };
        quat::catmull_rom(window, s)
    }

    fn continue_from(self, previous: &Self) -> Self {
        quat::align_hemisphere(&self, previous)
    }
}

/// A value placed at a parameter along the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeKnot<V> {
    t: PathT,
    value: V,
    distance_along_segment: f64,
    world_position: Point3,
}

impl<V: AttributeValue> AttributeKnot<V> {
    fn new(t: PathT, value: V) -> Self {
        Self {
            t,
            value,
            distance_along_segment: 0.0,
            world_position: Point3::origin(),
        }
    }

    /// Returns the knot's placement.
    #[must_use]
    pub fn t(&self) -> PathT {
        self.t
    }

    /// Returns the knot's value.
    #[must_use]
    pub fn value(&self) -> V {
        self.value
    }

    /// Arc length from the start of the containing segment to the knot.
    ///
    /// Derived from the current curve; refreshed after every structural edit.
    #[must_use]
    pub fn distance_along_segment(&self) -> f64 {
        self.distance_along_segment
    }

    /// World-space point on the curve at the knot's placement.
    #[must_use]
    pub fn world_position(&self) -> Point3 {
        self.world_position
    }

    pub(crate) fn set_t(&mut self, t: PathT) {
        self.t = t;
    }

    pub(crate) fn set_cache(&mut self, distance_along_segment: f64, world_position: Point3) {
        self.distance_along_segment = distance_along_segment;
        self.world_position = world_position;
    }
}

/// One family of attribute knots, kept sorted by placement.
#[derive(Debug, Clone)]
pub struct AttributeTrack<K: Key, V> {
    knots: SlotMap<K, AttributeKnot<V>>,
    order: Vec<K>,
}

impl<K: Key, V> Default for AttributeTrack<K, V> {
    fn default() -> Self {
        Self {
            knots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }
}

impl<K: Key, V: AttributeValue> AttributeTrack<K, V> {
    /// Creates a new, empty track.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the track holds no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns knot ids in placement order.
    #[must_use]
    pub fn ids(&self) -> &[K] {
        &self.order
    }

    /// Iterates knots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &AttributeKnot<V>)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.knots.get(id).map(|knot| (id, knot)))
    }

    /// Returns the `index`-th knot in placement order.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&AttributeKnot<V>> {
        self.order.get(index).and_then(|&id| self.knots.get(id))
    }

    /// Returns the knot for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not in the track.
    pub fn get(&self, id: K) -> Result<&AttributeKnot<V>, PathError> {
        self.knots
            .get(id)
            .ok_or(PathError::KnotNotFound("attribute knot"))
    }

    /// Inserts a knot, keeping placement order. Knots sharing a placement
    /// keep insertion order.
    pub(crate) fn insert(&mut self, t: PathT, value: V) -> K {
        let id = self.knots.insert(AttributeKnot::new(t, value));
        let at = self
            .order
            .partition_point(|&k| self.knots.get(k).is_some_and(|knot| knot.t <= t));
        self.order.insert(at, id);
        self.enforce_continuity();
        id
    }

    /// Removes a knot.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not in the track.
    pub(crate) fn remove(&mut self, id: K) -> Result<AttributeKnot<V>, PathError> {
        let knot = self
            .knots
            .remove(id)
            .ok_or(PathError::KnotNotFound("attribute knot"))?;
        self.order.retain(|&k| k != id);
        self.enforce_continuity();
        Ok(knot)
    }

    /// Moves a knot to a new placement and restores ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not in the track.
    pub(crate) fn set_t(&mut self, id: K, t: PathT) -> Result<(), PathError> {
        self.knots
            .get_mut(id)
            .ok_or(PathError::KnotNotFound("attribute knot"))?
            .t = t;
        self.resort();
        Ok(())
    }

    /// Replaces a knot's value.
    ///
    /// # Errors
    ///
    /// Returns an error if the knot is not in the track.
    pub(crate) fn set_value(&mut self, id: K, value: V) -> Result<(), PathError> {
        self.knots
            .get_mut(id)
            .ok_or(PathError::KnotNotFound("attribute knot"))?
            .value = value;
        self.enforce_continuity();
        Ok(())
    }

    /// Restores placement order after placements changed out of band.
    pub(crate) fn resort(&mut self) {
        let knots = &self.knots;
        self.order.sort_by_key(|&k| knots.get(k).map(|knot| knot.t));
        self.enforce_continuity();
    }

    /// Rewrites each value to be continuous with its predecessor.
    ///
    /// For rotations this keeps consecutive quaternions in the same
    /// hemisphere. The wrap from the last knot back to the first on a looping
    /// path is not covered; that pair is reconditioned per query.
    pub(crate) fn enforce_continuity(&mut self) {
        let mut previous: Option<V> = None;
        for &id in &self.order {
            if let Some(knot) = self.knots.get_mut(id) {
                if let Some(prev) = previous {
                    knot.value = knot.value.continue_from(&prev);
                }
                previous = Some(knot.value);
            }
        }
    }

    pub(crate) fn knots_mut(&mut self) -> impl Iterator<Item = &mut AttributeKnot<V>> + '_ {
        self.knots.values_mut()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Vector3;

    #[test]
    fn insert_keeps_placement_order() {
        let mut track: AttributeTrack<SpeedKnotId, f64> = AttributeTrack::new();
        let b = track.insert(PathT::new(1.5), 2.0);
        let a = track.insert(PathT::new(0.5), 1.0);
        let c = track.insert(PathT::new(2.5), 3.0);
        assert_eq!(track.ids(), &[a, b, c]);
    }

    #[test]
    fn equal_placements_keep_insertion_order() {
        let mut track: AttributeTrack<FovKnotId, f64> = AttributeTrack::new();
        let a = track.insert(PathT::new(1.0), 40.0);
        let b = track.insert(PathT::new(1.0), 50.0);
        assert_eq!(track.ids(), &[a, b]);
    }

    #[test]
    fn set_t_resorts() {
        let mut track: AttributeTrack<SpeedKnotId, f64> = AttributeTrack::new();
        let a = track.insert(PathT::new(0.5), 1.0);
        let b = track.insert(PathT::new(1.5), 2.0);
        track.set_t(a, PathT::new(2.0)).unwrap();
        assert_eq!(track.ids(), &[b, a]);
    }

    #[test]
    fn remove_drops_from_order() {
        let mut track: AttributeTrack<SpeedKnotId, f64> = AttributeTrack::new();
        let a = track.insert(PathT::new(0.5), 1.0);
        let b = track.insert(PathT::new(1.5), 2.0);
        let removed = track.remove(a).unwrap();
        assert_relative_eq!(removed.value(), 1.0);
        assert_eq!(track.ids(), &[b]);
        assert!(track.get(a).is_err());
    }

    #[test]
    fn rotation_track_is_hemisphere_continuous() {
        let mut track: AttributeTrack<RotationKnotId, Rotation> = AttributeTrack::new();
        let q = Rotation::from_axis_angle(&Vector3::y_axis(), 0.5);
        track.insert(PathT::new(0.0), Rotation::identity());
        track.insert(PathT::new(1.0), Rotation::new_unchecked(-q.into_inner()));
        let values: Vec<Rotation> = track.iter().map(|(_, k)| k.value()).collect();
        assert!(values[0].coords.dot(&values[1].coords) >= 0.0);
        assert_relative_eq!(values[1].angle_to(&q), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn scalar_interpolation_ignores_seam_flag() {
        let w = [0.0, 1.0, 2.0, 3.0];
        assert_relative_eq!(f64::interpolate(w, 0.5, true), f64::interpolate(w, 0.5, false));
    }
}
