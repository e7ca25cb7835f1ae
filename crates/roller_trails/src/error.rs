//! Engine error taxonomy.
//!
//! Every variant is fatal to the call that produced it and leaves engine
//! state untouched. "Nothing found" is never an error: solvers report it as an
//! unresolved [`FaceResult`](crate::solver::FaceResult) or `None`.

use thiserror::Error;

use crate::pool::RopeId;
use crate::world::AgentId;

/// Errors surfaced by the trail engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
  /// An operation needed an indexed surface but none was supplied yet.
  #[error("surface must be indexed before agents are registered or advanced")]
  SurfaceNotIndexed,

  /// A face references a vertex that does not exist.
  #[error("face {face} references vertex {vertex}, mesh has {vertex_count} vertices")]
  InvalidMesh {
    face: usize,
    vertex: u32,
    vertex_count: usize,
  },

  /// Every pooled rope is in use; the pool never grows.
  #[error("rope pool exhausted ({capacity} ropes in use)")]
  PoolExhausted { capacity: usize },

  /// An agent was asked to resolve without exposing a query slot.
  #[error("agent {0:?} does not expose a query slot")]
  MissingQuerySlot(AgentId),

  /// A closed rope accepts no further samples.
  #[error("rope {0:?} is closed")]
  RopeClosed(RopeId),

  /// A rope can only seed a successor once it holds two samples.
  #[error("rope {0:?} has fewer than two samples to join from")]
  JoinSourceTooShort(RopeId),

  #[error("unknown agent {0:?}")]
  UnknownAgent(AgentId),

  #[error("unknown rope {0:?}")]
  UnknownRope(RopeId),
}

/// Result alias used across the crate.
pub type EngineResult<T> = Result<T, EngineError>;
