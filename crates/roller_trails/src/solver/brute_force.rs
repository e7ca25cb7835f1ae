//! O(faces × queries) nearest-point solver.

use std::sync::Arc;

use super::{reset_results, FaceResult, QuerySlot, SolverMode, SurfaceSolver};
use crate::geometry::closest_point_on_triangle;
use crate::types::SurfaceMesh;

/// Scans every face once per pass and, for each face, every pending slot.
///
/// Faces are the outer loop so each triangle's corners are fetched once per
/// pass regardless of how many agents are querying.
#[derive(Clone, Debug)]
pub struct BruteForceSolver {
  mesh: Arc<SurfaceMesh>,
  max_distance: f32,
  results: Vec<FaceResult>,
}

impl BruteForceSolver {
  pub fn new(mesh: Arc<SurfaceMesh>) -> Self {
    Self {
      mesh,
      max_distance: f32::INFINITY,
      results: Vec::new(),
    }
  }

  /// Ignore faces farther than `max_distance` from the query point.
  pub fn with_max_distance(mut self, max_distance: f32) -> Self {
    self.max_distance = max_distance;
    self
  }

  pub fn set_max_distance(&mut self, max_distance: f32) {
    self.max_distance = max_distance;
  }

  #[inline]
  pub fn max_distance(&self) -> f32 {
    self.max_distance
  }

  #[inline]
  pub fn mesh(&self) -> &Arc<SurfaceMesh> {
    &self.mesh
  }

  /// Results of the last pass.
  #[inline]
  pub fn results(&self) -> &[FaceResult] {
    &self.results
  }
}

impl SurfaceSolver for BruteForceSolver {
  fn mode(&self) -> SolverMode {
    SolverMode::BruteForce
  }

  #[tracing::instrument(skip_all, name = "solver::brute_force")]
  fn resolve(&mut self, slots: &[QuerySlot]) -> &[FaceResult] {
    reset_results(&mut self.results, slots.len());

    // Negative cutoffs reject every face.
    let max_sq = if self.max_distance < 0.0 {
      f32::NEG_INFINITY
    } else {
      self.max_distance * self.max_distance
    };

    // Squared distances during the scan, linear afterwards.
    for face_index in 0..self.mesh.face_count() {
      let tri = self.mesh.triangle_ref(face_index);
      let [a, b, c] = self.mesh.corners(tri.indices);

      for (slot, result) in slots.iter().zip(self.results.iter_mut()) {
        if slot.skip {
          continue;
        }

        let point = closest_point_on_triangle(slot.point, a, b, c);
        let dist_sq = point.distance_squared(slot.point);

        if dist_sq < result.distance && dist_sq <= max_sq {
          result.face = Some(tri);
          result.point = point;
          result.distance = dist_sq;
        }
      }
    }

    for result in &mut self.results {
      if let Some(face) = result.face {
        *result = FaceResult::on_face(&self.mesh, face, result.point, result.distance.sqrt());
      }
    }

    &self.results
  }
}
