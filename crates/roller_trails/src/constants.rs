//! Engine defaults shared by the octree, rope builder and world.
//!
//! ```text
//! Rope pool:   POOL_SIZE ropes × ROPE_SECTIONS segments each
//! Rope strip:  2 vertices per sample, ROPE_WIDTH wide, lifted SURFACE_OFFSET
//!              along the sample normal
//! Octree root: mesh bounds expanded by OCTREE_MARGIN_RATIO × diagonal
//! ```

use glam::Vec3;

// =============================================================================
// Rope / pool
// =============================================================================

/// Number of ropes pre-allocated by a world.
pub const POOL_SIZE: usize = 10;

/// Segment capacity of each pooled rope.
pub const ROPE_SECTIONS: usize = 300;

/// Strip width in world units.
pub const ROPE_WIDTH: f32 = 0.1;

/// Minimum spacing between committed rope samples.
pub const ROPE_MIN_DISTANCE: f32 = 0.05;

/// Lift along the sample normal, keeps the strip off the surface.
pub const SURFACE_OFFSET: f32 = 0.01;

/// Vertices written per rope sample (left + right edge).
pub const VERTICES_PER_SAMPLE: usize = 2;

/// Indices per strip quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

// =============================================================================
// Octree
// =============================================================================

/// Root box expansion as a fraction of the mesh bounding box diagonal.
pub const OCTREE_MARGIN_RATIO: f32 = 0.025;

/// Nodes whose diagonal is at or below this size are never subdivided.
pub const OCTREE_MIN_NODE_SIZE: f32 = 0.01;

/// Number of children per octree node.
pub const OCTANTS: usize = 8;

// =============================================================================
// Agents
// =============================================================================

/// Starting query point for agents registered without one.
pub const DEFAULT_INITIAL_POINT: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Lengths below this are treated as zero by the geometry kernels.
pub const GEOMETRY_EPSILON: f32 = 1e-6;

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
