//! Surface query protocol: the slot an agent fills in and the record a solver
//! writes back.

use glam::{Vec2, Vec3};

use crate::geometry::interpolate_uv;
use crate::types::{LinePoint, SurfaceMesh, TriangleRef};

/// Pending nearest-surface request owned by an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuerySlot {
  /// Point to search from.
  pub point: Vec3,

  /// `true` when no request is pending. Solvers ignore skipped slots.
  pub skip: bool,
}

impl QuerySlot {
  /// Idle slot at `point`.
  pub const fn idle(point: Vec3) -> Self {
    Self { point, skip: true }
  }

  /// Submit a request for `point`.
  #[inline]
  pub fn request(&mut self, point: Vec3) {
    self.point = point;
    self.skip = false;
  }

  #[inline]
  pub fn is_pending(&self) -> bool {
    !self.skip
  }
}

impl Default for QuerySlot {
  fn default() -> Self {
    Self::idle(Vec3::ZERO)
  }
}

/// Resolved nearest-triangle data for one query.
///
/// Pooled by the solvers and reset to [`FaceResult::UNRESOLVED`] at the start
/// of every pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceResult {
  /// Winning triangle, `None` while unresolved.
  pub face: Option<TriangleRef>,

  /// Point on the surface.
  pub point: Vec3,

  /// Face normal of the winning triangle.
  pub normal: Vec3,

  /// Interpolated texture coordinate when the mesh carries UVs.
  pub uv: Option<Vec2>,

  /// Linear distance to the query point, or the ray parameter for raycasts.
  pub distance: f32,
}

impl FaceResult {
  pub const UNRESOLVED: Self = Self {
    face: None,
    point: Vec3::ZERO,
    normal: Vec3::ZERO,
    uv: None,
    distance: f32::INFINITY,
  };

  /// Fill a record for `point` on `face`, interpolating UVs when present.
  pub fn on_face(mesh: &SurfaceMesh, face: TriangleRef, point: Vec3, distance: f32) -> Self {
    let uv = mesh.faces()[face.face_index as usize].uvs.map(|uvs| {
      let [a, b, c] = mesh.corners(face.indices);
      interpolate_uv(point, a, b, c, &uvs)
    });

    Self {
      face: Some(face),
      point,
      normal: face.normal,
      uv,
      distance,
    }
  }

  #[inline]
  pub fn reset(&mut self) {
    *self = Self::UNRESOLVED;
  }

  #[inline]
  pub fn is_resolved(&self) -> bool {
    self.face.is_some()
  }

  /// Source face index, if resolved.
  #[inline]
  pub fn face_index(&self) -> Option<u32> {
    self.face.map(|f| f.face_index)
  }

  /// Point and normal as a rope sample.
  #[inline]
  pub fn line_point(&self) -> LinePoint {
    LinePoint::new(self.point, self.normal)
  }
}

impl Default for FaceResult {
  fn default() -> Self {
    Self::UNRESOLVED
  }
}

/// Anything that exposes a [`QuerySlot`] and accepts resolved results.
///
/// The world batches every agent whose slot is pending, resolves them with one
/// solver pass, calls [`SurfaceAgent::on_query_resolved`] and then clears the
/// slot back to `skip = true`.
pub trait SurfaceAgent {
  /// The agent's slot, `None` if it cannot take part in queries.
  fn query_slot(&self) -> Option<&QuerySlot>;

  fn query_slot_mut(&mut self) -> Option<&mut QuerySlot>;

  /// Completion callback for a resolved query.
  fn on_query_resolved(&mut self, result: &FaceResult);

  /// Per-step update before queries are gathered. `delta` is in milliseconds.
  fn update(&mut self, _delta: f32) {}
}

impl<T: SurfaceAgent + ?Sized> SurfaceAgent for Box<T> {
  fn query_slot(&self) -> Option<&QuerySlot> {
    (**self).query_slot()
  }

  fn query_slot_mut(&mut self) -> Option<&mut QuerySlot> {
    (**self).query_slot_mut()
  }

  fn on_query_resolved(&mut self, result: &FaceResult) {
    (**self).on_query_resolved(result)
  }

  fn update(&mut self, delta: f32) {
    (**self).update(delta)
  }
}
