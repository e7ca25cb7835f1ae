//! Axis-aligned bounding box used for octree nodes and per-triangle bounds.

use glam::Vec3;

use super::Ray;

/// Single-precision axis-aligned bounding box.
///
/// An empty box has inverted extents (`min = +inf`, `max = -inf`) so that
/// [`Aabb3::encapsulate`] can grow it from nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
	/// Minimum corner (inclusive).
	pub min: Vec3,
	/// Maximum corner (inclusive).
	pub max: Vec3,
}

impl Aabb3 {
	/// Box with inverted extents, ready for encapsulation.
	pub const EMPTY: Self = Self {
		min: Vec3::INFINITY,
		max: Vec3::NEG_INFINITY,
	};

	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: Vec3, max: Vec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Smallest box containing every point.
	pub fn from_points(points: &[Vec3]) -> Self {
		let mut aabb = Self::EMPTY;
		for p in points {
			aabb.encapsulate(*p);
		}
		aabb
	}

	/// Bounds of a triangle.
	#[inline]
	pub fn from_triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
		Self {
			min: a.min(b).min(c),
			max: a.max(b).max(c),
		}
	}

	/// True until at least one point has been encapsulated.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
	}

	/// Grow to include a point.
	#[inline]
	pub fn encapsulate(&mut self, point: Vec3) {
		self.min = self.min.min(point);
		self.max = self.max.max(point);
	}

	/// Grow every face outward by `amount`.
	pub fn expanded(&self, amount: f32) -> Self {
		Self {
			min: self.min - Vec3::splat(amount),
			max: self.max + Vec3::splat(amount),
		}
	}

	/// Check if this AABB contains a point (boundary inclusive).
	#[inline]
	pub fn contains_point(&self, point: Vec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Check if `other` lies entirely inside this box (boundary inclusive).
	#[inline]
	pub fn contains_box(&self, other: &Aabb3) -> bool {
		self.min.x <= other.min.x
			&& other.max.x <= self.max.x
			&& self.min.y <= other.min.y
			&& other.max.y <= self.max.y
			&& self.min.z <= other.min.z
			&& other.max.z <= self.max.z
	}

	/// Slab test; touching the box counts as a hit.
	pub fn intersects_ray(&self, ray: &Ray) -> bool {
		let mut enter = 0.0_f32;
		let mut exit = f32::INFINITY;

		for axis in 0..3 {
			let origin = ray.origin[axis];
			let dir = ray.direction[axis];

			// Parallel to this slab: inside it or never.
			if dir == 0.0 {
				if origin < self.min[axis] || origin > self.max[axis] {
					return false;
				}
				continue;
			}

			let inv = 1.0 / dir;
			let t0 = (self.min[axis] - origin) * inv;
			let t1 = (self.max[axis] - origin) * inv;
			enter = enter.max(t0.min(t1));
			exit = exit.min(t0.max(t1));

			if exit < enter {
				return false;
			}
		}

		true
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	/// Length of the min→max diagonal.
	#[inline]
	pub fn diagonal(&self) -> f32 {
		self.size().length()
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}
}

impl Default for Aabb3 {
	fn default() -> Self {
		Self::EMPTY
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_grows_from_points() {
		let mut aabb = Aabb3::EMPTY;
		assert!(aabb.is_empty());

		aabb.encapsulate(Vec3::new(1.0, -2.0, 3.0));
		aabb.encapsulate(Vec3::new(-1.0, 2.0, 0.0));

		assert!(!aabb.is_empty());
		assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
		assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));
	}

	#[test]
	fn test_from_triangle() {
		let aabb = Aabb3::from_triangle(Vec3::ZERO, Vec3::X, Vec3::new(0.5, 1.0, -1.0));
		assert_eq!(aabb.min, Vec3::new(0.0, 0.0, -1.0));
		assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 0.0));
	}

	#[test]
	fn test_contains_point() {
		let aabb = Aabb3::new(Vec3::ZERO, Vec3::splat(10.0));

		// Inside
		assert!(aabb.contains_point(Vec3::splat(5.0)));

		// On boundary
		assert!(aabb.contains_point(Vec3::ZERO));
		assert!(aabb.contains_point(Vec3::splat(10.0)));

		// Outside
		assert!(!aabb.contains_point(Vec3::splat(-1.0)));
		assert!(!aabb.contains_point(Vec3::splat(11.0)));
	}

	#[test]
	fn test_contains_box() {
		let outer = Aabb3::new(Vec3::ZERO, Vec3::splat(10.0));
		let inner = Aabb3::new(Vec3::splat(2.0), Vec3::splat(8.0));
		let straddling = Aabb3::new(Vec3::splat(5.0), Vec3::splat(12.0));

		assert!(outer.contains_box(&inner));
		assert!(outer.contains_box(&outer), "A box contains itself");
		assert!(!inner.contains_box(&outer));
		assert!(!outer.contains_box(&straddling));
	}

	#[test]
	fn test_expanded_flat_box_gains_volume() {
		let flat = Aabb3::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 1.0));
		let grown = flat.expanded(0.1);
		assert!(grown.size().y > 0.0, "Expansion should give a flat box thickness");
		assert!(grown.contains_box(&flat));
	}

	#[test]
	fn test_ray_hits_and_misses() {
		let aabb = Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0));

		let hit = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
		assert!(aabb.intersects_ray(&hit));

		let away = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
		assert!(!aabb.intersects_ray(&away), "Box behind the ray origin is not hit");

		let beside = Ray::new(Vec3::new(3.0, 5.0, 0.0), Vec3::NEG_Y);
		assert!(!aabb.intersects_ray(&beside));

		let inside = Ray::new(Vec3::ZERO, Vec3::X);
		assert!(aabb.intersects_ray(&inside), "Origin inside the box always hits");
	}

	#[test]
	fn test_ray_along_face_plane() {
		let aabb = Aabb3::new(Vec3::ZERO, Vec3::splat(1.0));
		let grazing = Ray::new(Vec3::new(-1.0, 0.0, 0.5), Vec3::X);
		assert!(aabb.intersects_ray(&grazing), "Ray running along a face touches the box");
	}

	#[test]
	fn test_size_center_diagonal() {
		let aabb = Aabb3::new(Vec3::new(-1.0, -2.0, -2.0), Vec3::new(1.0, 2.0, 2.0));
		assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 4.0));
		assert_eq!(aabb.center(), Vec3::ZERO);
		assert_eq!(aabb.diagonal(), 6.0);
	}
}
