//! Nearest-surface solvers and the query protocol they serve.
//!
//! Both solvers resolve a batch of [`QuerySlot`]s into a parallel slice of
//! [`FaceResult`]s. Result storage is owned by the solver and reused between
//! passes; every pass starts by resetting it to [`FaceResult::UNRESOLVED`].

mod brute_force;
mod octree_solver;
mod query;

pub use brute_force::BruteForceSolver;
pub use octree_solver::OctreeSolver;
pub use query::{FaceResult, QuerySlot, SurfaceAgent};

/// Which solver answers queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SolverMode {
  /// Scan every face for every pending slot.
  #[default]
  BruteForce,
  /// Containment search through the octree.
  Octree,
}

impl SolverMode {
  pub fn name(self) -> &'static str {
    match self {
      SolverMode::BruteForce => "brute_force",
      SolverMode::Octree => "octree",
    }
  }
}

impl std::fmt::Display for SolverMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}

/// Batch resolver for nearest-surface queries.
pub trait SurfaceSolver {
  fn mode(&self) -> SolverMode;

  /// Resolve every pending slot. The returned slice is parallel to `slots`;
  /// skipped slots and slots with no eligible face stay unresolved.
  fn resolve(&mut self, slots: &[QuerySlot]) -> &[FaceResult];
}

/// Reset `results` to `len` unresolved records, keeping the allocation.
fn reset_results(results: &mut Vec<FaceResult>, len: usize) {
  results.clear();
  results.resize(len, FaceResult::UNRESOLVED);
}
