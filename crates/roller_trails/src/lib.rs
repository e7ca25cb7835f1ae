//! roller_trails - Framework/engine independent surface projection and trail
//! ribbons
//!
//! Agents roll over a static triangle mesh. Each step they ask for the
//! nearest point on the surface; the engine answers every pending request in
//! one solver pass and extends each agent's trail with the resolved sample.
//! Trails are camera-independent ribbon meshes the host renders as-is.
//!
//! # Features
//!
//! - **Loose octree**: triangle index with containment nearest-point search
//!   and raycasts
//! - **Brute-force solver**: exact nearest point over every face, batched
//! - **Ropes**: append-only ribbons that thin close samples, rebuild only the
//!   tail rows and hand off to a joined successor when full
//! - **Crossing detection**: new segments are tested against the agent's own
//!   trail and its predecessor chain
//!
//! # Example
//!
//! ```ignore
//! use roller_trails::{Color, Roller, RollerWorld, SurfaceMesh, WorldConfig};
//!
//! let mesh = SurfaceMesh::new(vertices, &triangles)?;
//!
//! let mut world = RollerWorld::new(WorldConfig::default());
//! world.index_surface(mesh);
//! let id = world.register_agent(Roller::new(), Color::from_hex(0xff0000), None)?;
//! world.spawn()?;
//!
//! // Once per frame
//! world.advance(delta_ms)?;
//! let rope = world.current_rope(id)?;
//! draw(rope.mesh().vertices(), rope.mesh().drawn_indices());
//! ```

pub mod constants;
pub mod error;
pub mod geometry;
pub mod types;

// Re-export commonly used items
pub use error::{EngineError, EngineResult};
pub use geometry::{Aabb3, Plane, Ray};
pub use types::{Color, Face, LinePoint, RopeVertex, SurfaceMesh, TriangleRef};

// Spatial index
pub mod octree;
pub use octree::{Octree, OctreeConfig, OctreeStats};

// Nearest-surface solvers and the agent query protocol
pub mod solver;
pub use solver::{
  BruteForceSolver, FaceResult, OctreeSolver, QuerySlot, SolverMode, SurfaceAgent, SurfaceSolver,
};

// Ribbon trails
pub mod rope;
pub use rope::{Crossing, PushOutcome, Rope, RopeConfig, RopeMesh, Segment, Skip};

pub mod pool;
pub use pool::{PoolEntry, RopeId, RopePool};

// Orchestration
pub mod world;
pub use world::{AgentId, RollerWorld, StepReport, WorldConfig};

// Reference agent
pub mod agent;
pub use agent::{Behavior, BehaviorKind, Behaviors, Roller};

pub mod metrics;
pub use metrics::{SolverDiagnostics, SolverMetrics};

#[cfg(test)]
mod test_utils;
