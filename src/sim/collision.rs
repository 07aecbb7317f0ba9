//! Circle overlap tests
//!
//! Every gameplay contact (pickup, bonus, delivery) is a circle-vs-circle test.

use glam::Vec2;

use crate::distance_squared;

/// Anything with a circular collision footprint
pub trait Circle {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// True iff the circles strictly overlap (tangent circles do not collide)
#[inline]
pub fn circles_overlap<A: Circle + ?Sized, B: Circle + ?Sized>(a: &A, b: &B) -> bool {
    let dist_sq = distance_squared(a.center(), b.center());
    let radius_sum = a.radius() + b.radius();
    dist_sq < radius_sum * radius_sum
}
