//! Octree-backed solver.

use glam::Vec3;

use super::{reset_results, FaceResult, QuerySlot, SolverMode, SurfaceSolver};
use crate::geometry::Ray;
use crate::octree::Octree;

/// Resolves slots through [`Octree::closest_point`], or by casting rays when
/// agents are first placed on the surface.
#[derive(Clone, Debug)]
pub struct OctreeSolver {
  octree: Octree,
  max_distance: f32,
  results: Vec<FaceResult>,
}

impl OctreeSolver {
  pub fn new(octree: Octree) -> Self {
    Self {
      octree,
      max_distance: f32::INFINITY,
      results: Vec::new(),
    }
  }

  pub fn with_max_distance(mut self, max_distance: f32) -> Self {
    self.max_distance = max_distance;
    self
  }

  pub fn set_max_distance(&mut self, max_distance: f32) {
    self.max_distance = max_distance;
  }

  #[inline]
  pub fn octree(&self) -> &Octree {
    &self.octree
  }

  /// Cast a ray from every pending slot toward `target` and keep the first
  /// hit. Slots already at `target` stay unresolved.
  #[tracing::instrument(skip_all, name = "solver::octree_rays")]
  pub fn resolve_rays(&mut self, slots: &[QuerySlot], target: Vec3) -> &[FaceResult] {
    reset_results(&mut self.results, slots.len());

    for (slot, result) in slots.iter().zip(self.results.iter_mut()) {
      if slot.skip {
        continue;
      }
      let Some(ray) = Ray::towards(slot.point, target) else {
        continue;
      };
      if let Some(hit) = self.octree.raycast(&ray, true).into_iter().next() {
        *result = hit;
      }
    }

    &self.results
  }
}

impl SurfaceSolver for OctreeSolver {
  fn mode(&self) -> SolverMode {
    SolverMode::Octree
  }

  #[tracing::instrument(skip_all, name = "solver::octree")]
  fn resolve(&mut self, slots: &[QuerySlot]) -> &[FaceResult] {
    reset_results(&mut self.results, slots.len());

    for (slot, result) in slots.iter().zip(self.results.iter_mut()) {
      if slot.skip {
        continue;
      }
      match self.octree.closest_point(slot.point) {
        Some(hit) if hit.distance <= self.max_distance => *result = hit,
        _ => {}
      }
    }

    &self.results
  }
}
