//! OctNode - arena-stored node of the triangle octree.
//!
//! Nodes live in a flat `Vec` owned by the [`Octree`](super::Octree) and refer
//! to each other by [`NodeId`]. The parent link is a plain index, so the tree
//! never owns itself cyclically.

use glam::Vec3;

use crate::constants::OCTANTS;
use crate::geometry::Aabb3;
use crate::types::TriangleRef;

/// Index of a node in the octree arena. The root is always `NodeId::ROOT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  pub const ROOT: Self = Self(0);

  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// One cell of the octree.
#[derive(Clone, Debug)]
pub struct OctNode {
  /// Cell bounds. Contains every stored triangle box and every child box.
  pub bounds: Aabb3,

  /// Depth below the root (root = 0).
  pub level: u32,

  /// Back-link for traversal bookkeeping.
  pub parent: Option<NodeId>,

  /// Lazily allocated child slots, indexed by octant.
  pub children: Option<[Option<NodeId>; OCTANTS]>,

  /// Triangles whose boxes terminated at this node.
  pub content: Vec<TriangleRef>,
}

impl OctNode {
  pub fn new(bounds: Aabb3, level: u32, parent: Option<NodeId>) -> Self {
    Self {
      bounds,
      level,
      parent,
      children: None,
      content: Vec::new(),
    }
  }

  /// Returns true if no child slot was ever allocated.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  /// Existing children in octant order.
  pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
    self.children.iter().flatten().flatten().copied()
  }

  #[inline]
  pub fn child(&self, octant: usize) -> Option<NodeId> {
    self.children.and_then(|slots| slots[octant])
  }
}

/// Where a triangle box sits relative to a node center.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Placement {
  /// Wholly inside one octant.
  Octant(usize),
  /// Crosses the center plane on at least one axis.
  Straddles,
}

/// Classify `bounds` against `center`.
///
/// Both comparisons are strict, so a box touching a center plane straddles.
/// Octant index is `4·x_upper + 2·y_upper + z_upper`.
pub fn classify(bounds: &Aabb3, center: Vec3) -> Placement {
  let mut octant = 0;
  for axis in 0..3 {
    let lower = bounds.max[axis] < center[axis];
    let upper = bounds.min[axis] > center[axis];
    if !(lower || upper) {
      return Placement::Straddles;
    }
    octant = octant * 2 + upper as usize;
  }
  Placement::Octant(octant)
}

/// Bounds of child `octant` of a parent box, split exactly at its center.
pub fn octant_bounds(parent: &Aabb3, octant: usize) -> Aabb3 {
  let center = parent.center();
  let mut min = parent.min;
  let mut max = parent.max;

  for axis in 0..3 {
    let upper = octant & (4 >> axis) != 0;
    if upper {
      min[axis] = center[axis];
    } else {
      max[axis] = center[axis];
    }
  }

  Aabb3 { min, max }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
