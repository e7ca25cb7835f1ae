//! Loose triangle octree over a static surface mesh.
//!
//! Triangles are inserted by their bounding box. A box that straddles a node's
//! center plane stops at that node instead of being duplicated into several
//! children. Nodes are allocated lazily and never change after [`Octree::build`].
//!
//! # Queries
//!
//! - [`Octree::closest_point`]: scans every triangle stored in the nodes whose
//!   box *contains* the query point. This is containment, not proximity: the
//!   true nearest triangle can sit in a sibling subtree that does not contain
//!   the point and is then missed.
//! - [`Octree::raycast`]: scans the nodes the ray passes through, deepest first.

mod config;
mod node;

use std::sync::Arc;

use glam::Vec3;
use smallvec::SmallVec;
use tracing::{debug, info, warn};
use web_time::Instant;

pub use config::OctreeConfig;
pub use node::{classify, octant_bounds, NodeId, OctNode, Placement};

use crate::constants::OCTANTS;
use crate::geometry::{closest_point_on_triangle, ray_triangle, Aabb3, Ray};
use crate::solver::FaceResult;
use crate::types::{SurfaceMesh, TriangleRef};

/// Scratch list of visited nodes, sized for the usual ancestor chain.
type NodeList = SmallVec<[NodeId; 32]>;

/// Summary of a built tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
  pub nodes: usize,
  pub triangles: usize,
  pub depth: u32,
  /// Largest content list of a single node.
  pub max_node_content: usize,
}

/// Spatial index over the faces of a [`SurfaceMesh`].
#[derive(Clone, Debug)]
pub struct Octree {
  nodes: Vec<OctNode>,
  depth: u32,
  config: OctreeConfig,
  mesh: Arc<SurfaceMesh>,
}

impl Octree {
  /// Index every face of `mesh`.
  ///
  /// The root box is the mesh bounds grown by `margin_ratio` of their
  /// diagonal. An empty mesh yields an empty root and depth 0.
  #[tracing::instrument(skip_all, name = "octree::build")]
  pub fn build(mesh: Arc<SurfaceMesh>, config: &OctreeConfig) -> Self {
    let start = Instant::now();

    let bounds = mesh.bounds();
    let root_bounds = if bounds.is_empty() {
      Aabb3::EMPTY
    } else {
      bounds.expanded(bounds.diagonal() * config.margin_ratio)
    };

    let mut tree = Self {
      nodes: vec![OctNode::new(root_bounds, 0, None)],
      depth: 0,
      config: *config,
      mesh,
    };

    let mesh = Arc::clone(&tree.mesh);
    for face_index in 0..mesh.face_count() {
      let tri = mesh.triangle_ref(face_index);
      let [a, b, c] = mesh.corners(tri.indices);
      let tri_bounds = Aabb3::from_triangle(a, b, c);

      match tree.insert(&tri_bounds) {
        Some(id) => {
          let node = &mut tree.nodes[id.index()];
          node.content.push(tri);
          tree.depth = tree.depth.max(node.level + 1);
        }
        None => warn!(face_index, "triangle bounds outside octree root, skipped"),
      }
    }

    info!(
      faces = mesh.face_count(),
      nodes = tree.nodes.len(),
      depth = tree.depth,
      elapsed_us = start.elapsed().as_micros() as u64,
      "octree built"
    );

    tree
  }

  /// Descend from the root to the node that should store `tri_bounds`,
  /// creating children on the way. `None` if the root does not contain it.
  fn insert(&mut self, tri_bounds: &Aabb3) -> Option<NodeId> {
    let mut current = NodeId::ROOT;

    loop {
      let node = &self.nodes[current.index()];

      if !node.bounds.contains_box(tri_bounds) {
        return None;
      }

      if node.bounds.diagonal() <= self.config.min_node_size {
        return Some(current);
      }

      let octant = match classify(tri_bounds, node.bounds.center()) {
        Placement::Straddles => return Some(current),
        Placement::Octant(octant) => octant,
      };

      current = match node.child(octant) {
        Some(child) => child,
        None => self.add_child(current, octant),
      };
    }
  }

  fn add_child(&mut self, parent: NodeId, octant: usize) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    let parent_node = &self.nodes[parent.index()];
    let child = OctNode::new(
      octant_bounds(&parent_node.bounds, octant),
      parent_node.level + 1,
      Some(parent),
    );
    self.nodes.push(child);

    let slots = self.nodes[parent.index()]
      .children
      .get_or_insert([None; OCTANTS]);
    slots[octant] = Some(id);
    id
  }

  /// Preorder list of nodes whose box passes `visit`. Pruned subtrees are
  /// not entered.
  fn collect_nodes(&self, visit: impl Fn(&Aabb3) -> bool) -> NodeList {
    let mut found = NodeList::new();
    let mut stack: SmallVec<[NodeId; 64]> = SmallVec::new();
    stack.push(NodeId::ROOT);

    while let Some(id) = stack.pop() {
      let node = &self.nodes[id.index()];
      if !visit(&node.bounds) {
        continue;
      }
      found.push(id);

      // Reverse so children pop in octant order.
      if let Some(slots) = &node.children {
        stack.extend(slots.iter().rev().flatten().copied());
      }
    }

    found
  }

  /// Nearest surface point among the triangles stored in every node whose
  /// box contains `point`.
  ///
  /// `None` if the point is outside the root box or no candidate triangle was
  /// found.
  pub fn closest_point(&self, point: Vec3) -> Option<FaceResult> {
    let nodes = self.collect_nodes(|bounds| bounds.contains_point(point));
    if nodes.is_empty() {
      return None;
    }

    let mut best: Option<(f32, Vec3, TriangleRef)> = None;
    for id in nodes {
      for tri in &self.nodes[id.index()].content {
        let [a, b, c] = self.mesh.corners(tri.indices);
        let candidate = closest_point_on_triangle(point, a, b, c);
        let distance = candidate.distance(point);

        if best.map_or(true, |(min, _, _)| distance < min) {
          best = Some((distance, candidate, *tri));
        }
      }
    }

    best.map(|(distance, hit, tri)| FaceResult::on_face(&self.mesh, tri, hit, distance))
  }

  /// Ray hits against the triangles of every node the ray passes through.
  ///
  /// Nodes are visited deepest-first (reversed preorder); this orders work,
  /// not hits by distance. With `first_only` the scan stops at the first hit.
  /// `distance` in each result is the ray parameter.
  pub fn raycast(&self, ray: &Ray, first_only: bool) -> Vec<FaceResult> {
    let mut hits = Vec::new();
    let nodes = self.collect_nodes(|bounds| bounds.intersects_ray(ray));

    for id in nodes.into_iter().rev() {
      for tri in &self.nodes[id.index()].content {
        let [a, b, c] = self.mesh.corners(tri.indices);
        if let Some(t) = ray_triangle(ray, a, b, c) {
          hits.push(FaceResult::on_face(&self.mesh, *tri, ray.at(t), t));
          if first_only {
            return hits;
          }
        }
      }
    }

    debug!(hits = hits.len(), "octree raycast");
    hits
  }

  /// Boxes of every node at `min(level, depth - 1)`, for debug drawing.
  pub fn boxes_at_level(&self, level: u32) -> Vec<Aabb3> {
    if self.depth == 0 {
      return Vec::new();
    }
    let level = level.min(self.depth - 1);
    self
      .nodes
      .iter()
      .filter(|node| node.level == level)
      .map(|node| node.bounds)
      .collect()
  }

  pub fn stats(&self) -> OctreeStats {
    OctreeStats {
      nodes: self.nodes.len(),
      triangles: self.nodes.iter().map(|n| n.content.len()).sum(),
      depth: self.depth,
      max_node_content: self.nodes.iter().map(|n| n.content.len()).max().unwrap_or(0),
    }
  }

  /// Maximum storing level + 1; 0 for an empty tree.
  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  #[inline]
  pub fn root(&self) -> &OctNode {
    &self.nodes[NodeId::ROOT.index()]
  }

  #[inline]
  pub fn node(&self, id: NodeId) -> &OctNode {
    &self.nodes[id.index()]
  }

  /// All nodes, root first.
  #[inline]
  pub fn nodes(&self) -> &[OctNode] {
    &self.nodes
  }

  /// Ids of the nodes from `id`'s parent up to the root.
  pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(self.node(id).parent, move |p| self.node(*p).parent)
  }

  #[inline]
  pub fn mesh(&self) -> &Arc<SurfaceMesh> {
    &self.mesh
  }

  #[inline]
  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }
}
