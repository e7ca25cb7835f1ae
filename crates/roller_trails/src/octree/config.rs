//! OctreeConfig - build parameters for the triangle octree.

use crate::constants::{OCTREE_MARGIN_RATIO, OCTREE_MIN_NODE_SIZE};

/// Build parameters for [`Octree`](super::Octree).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OctreeConfig {
  /// Root box growth as a fraction of the mesh bounds diagonal.
  pub margin_ratio: f32,

  /// A node whose diagonal is at or below this length is never subdivided.
  pub min_node_size: f32,
}

impl OctreeConfig {
  pub const DEFAULT: Self = Self {
    margin_ratio: OCTREE_MARGIN_RATIO,
    min_node_size: OCTREE_MIN_NODE_SIZE,
  };

  pub fn new() -> Self {
    Self::DEFAULT
  }

  pub fn with_margin_ratio(mut self, margin_ratio: f32) -> Self {
    self.margin_ratio = margin_ratio;
    self
  }

  pub fn with_min_node_size(mut self, min_node_size: f32) -> Self {
    self.min_node_size = min_node_size;
    self
  }

  /// Upper bound on the level of any node, `⌈log2(root_diagonal / min_node_size)⌉`.
  pub fn max_level_for(&self, root_diagonal: f32) -> u32 {
    if self.min_node_size <= 0.0 {
      return u32::MAX;
    }
    if root_diagonal <= self.min_node_size {
      return 0;
    }
    (root_diagonal / self.min_node_size).log2().ceil() as u32
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
