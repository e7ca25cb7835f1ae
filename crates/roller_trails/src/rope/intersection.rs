//! Segment crossing test between a new rope segment and existing ropes.
//!
//! The new segment defines a plane containing its direction and its leading
//! normal, so the plane stands on the surface along the segment. An existing
//! segment that passes through that plane within the new segment's extent
//! counts as a crossing.

use super::Rope;
use crate::constants::GEOMETRY_EPSILON;
use crate::geometry::Plane;
use crate::pool::RopeId;
use crate::types::LinePoint;

/// Two consecutive samples of a rope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
  pub a: LinePoint,
  pub b: LinePoint,
  /// Index of the leading sample in its rope.
  pub id: u32,
  /// Owning rope.
  pub rope: RopeId,
}

impl Segment {
  #[inline]
  pub fn length_squared(&self) -> f32 {
    self.a.position.distance_squared(self.b.position)
  }

  #[inline]
  pub fn is_degenerate(&self) -> bool {
    self.length_squared() <= GEOMETRY_EPSILON * GEOMETRY_EPSILON
  }
}

/// A new segment crossing an existing one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossing {
  /// The newly added segment.
  pub a: Segment,
  /// The segment it crossed.
  pub b: Segment,
  /// Crossing point, normal interpolated along `a`.
  pub point: LinePoint,
}

/// Which trailing segments of the scanned rope are left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skip {
  /// The rope's own newest three segments (the new one and its neighbours).
  Recent,
  /// The final segment, duplicated into a joined successor.
  JoinSeam,
  /// Scan everything.
  None,
}

impl Skip {
  /// Number of leading segments scanned in a rope of `len` samples.
  #[inline]
  fn scanned(self, len: usize) -> usize {
    match self {
      Skip::Recent => len.saturating_sub(4),
      Skip::JoinSeam => len.saturating_sub(2),
      Skip::None => len.saturating_sub(1),
    }
  }
}

impl Rope {
  /// First segment of this rope crossed by `segment`, oldest first.
  ///
  /// Zero-length segments on either side never cross. A scanned segment
  /// lying in the plane reports its start point. The crossing normal is
  /// blended by the hit's linear position along `segment`, so it matches the
  /// reported point rather than easing toward the start.
  pub fn find_crossing(&self, segment: &Segment, skip: Skip) -> Option<Crossing> {
    if segment.is_degenerate() {
      return None;
    }

    let a = segment.a;
    let b = segment.b;
    let len_sq = segment.length_squared();
    let plane = Plane::from_normal_and_point((b.position - a.position).cross(a.normal), a.position)?;

    for index in 0..skip.scanned(self.points.len()) {
      let Some(other) = self.segment(index) else {
        break;
      };
      if other.is_degenerate() {
        continue;
      }

      let Some(hit) = plane.intersect_segment(other.a.position, other.b.position) else {
        continue;
      };

      let da = hit.distance_squared(a.position);
      let db = hit.distance_squared(b.position);
      if da > len_sq || db > len_sq {
        continue;
      }

      let t = (da / len_sq).sqrt();
      return Some(Crossing {
        a: *segment,
        b: other,
        point: LinePoint::new(hit, a.normal.lerp(b.normal, t)),
      });
    }

    None
  }
}

#[cfg(test)]
#[path = "intersection_test.rs"]
mod intersection_test;
