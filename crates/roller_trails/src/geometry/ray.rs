//! Rays and planes.

use glam::Vec3;

use crate::constants::GEOMETRY_EPSILON;

/// Half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
  pub origin: Vec3,
  /// Unit direction (normalized on construction).
  pub direction: Vec3,
}

impl Ray {
  /// Create a ray; `direction` is normalized (zero stays zero).
  pub fn new(origin: Vec3, direction: Vec3) -> Self {
    Self {
      origin,
      direction: direction.normalize_or_zero(),
    }
  }

  /// Ray from `origin` aimed at `target`. `None` when the two coincide.
  pub fn towards(origin: Vec3, target: Vec3) -> Option<Self> {
    let dir = target - origin;
    if dir.length_squared() <= GEOMETRY_EPSILON * GEOMETRY_EPSILON {
      return None;
    }
    Some(Self::new(origin, dir))
  }

  /// Point at parameter `t` along the ray.
  #[inline]
  pub fn at(&self, t: f32) -> Vec3 {
    self.origin + self.direction * t
  }
}

/// Plane in Hessian form: `normal · p + constant = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
  pub normal: Vec3,
  pub constant: f32,
}

impl Plane {
  /// Plane through `point` with the given (not necessarily unit) normal.
  ///
  /// Returns `None` for a zero normal.
  pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Option<Self> {
    let normal = normal.try_normalize()?;
    Some(Self {
      normal,
      constant: -normal.dot(point),
    })
  }

  /// Signed distance from the plane.
  #[inline]
  pub fn distance_to_point(&self, point: Vec3) -> f32 {
    self.normal.dot(point) + self.constant
  }

  /// Intersection with the closed segment `start..=end`.
  ///
  /// A segment lying in the plane reports its start point; a parallel segment
  /// off the plane, or one that ends before reaching it, reports nothing.
  pub fn intersect_segment(&self, start: Vec3, end: Vec3) -> Option<Vec3> {
    let dir = end - start;
    let denominator = self.normal.dot(dir);

    if denominator.abs() <= GEOMETRY_EPSILON {
      if self.distance_to_point(start).abs() <= GEOMETRY_EPSILON {
        return Some(start);
      }
      return None;
    }

    let t = -(start.dot(self.normal) + self.constant) / denominator;
    if !(0.0..=1.0).contains(&t) {
      return None;
    }

    Some(start + dir * t)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ray_normalizes_direction() {
    let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
    assert_eq!(ray.direction, Vec3::NEG_Z);
    assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
  }

  #[test]
  fn test_ray_towards_same_point() {
    assert!(Ray::towards(Vec3::ONE, Vec3::ONE).is_none());
    let ray = Ray::towards(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO).unwrap();
    assert_eq!(ray.direction, Vec3::NEG_Z);
  }

  #[test]
  fn test_plane_segment_crossing() {
    let plane = Plane::from_normal_and_point(Vec3::X, Vec3::new(0.5, 0.0, 0.0)).unwrap();

    let hit = plane
      .intersect_segment(Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0))
      .expect("Segment crosses x = 0.5");
    assert!(hit.abs_diff_eq(Vec3::new(0.5, 1.0, 0.0), 1e-6));

    assert!(
      plane.intersect_segment(Vec3::ZERO, Vec3::new(0.4, 0.0, 0.0)).is_none(),
      "Segment ending before the plane does not intersect"
    );
  }

  #[test]
  fn test_plane_parallel_segments() {
    let plane = Plane::from_normal_and_point(Vec3::Y, Vec3::ZERO).unwrap();

    let inside = plane.intersect_segment(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(inside, Some(Vec3::new(1.0, 0.0, 0.0)), "In-plane segment reports its start");

    let above = plane.intersect_segment(Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 0.0));
    assert!(above.is_none());
  }

  #[test]
  fn test_zero_normal_has_no_plane() {
    assert!(Plane::from_normal_and_point(Vec3::ZERO, Vec3::ONE).is_none());
  }
}
