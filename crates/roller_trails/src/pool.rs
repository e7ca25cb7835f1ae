//! RopePool - fixed arena of ropes shared by every agent of a world.
//!
//! Ropes are addressed by [`RopeId`], a stable index into the arena. A rope's
//! predecessor is stored as an id too, so chains never own each other. The
//! pool never grows: once every entry is in use, [`RopePool::acquire`] fails.

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::rope::{Crossing, Rope, RopeConfig, Skip};

/// Stable index of a pooled rope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RopeId(pub(crate) u32);

impl RopeId {
  #[inline]
  pub fn raw(self) -> u32 {
    self.0
  }

  #[inline]
  fn index(self) -> usize {
    self.0 as usize
  }
}

/// One arena slot.
#[derive(Clone, Debug)]
pub struct PoolEntry {
  pub rope: Rope,
  pub used: bool,
}

#[derive(Clone, Debug)]
pub struct RopePool {
  entries: Vec<PoolEntry>,
}

impl RopePool {
  /// Pre-allocate `size` ropes sharing one configuration.
  pub fn new(size: usize, config: RopeConfig) -> Self {
    let entries = (0..size as u32)
      .map(|i| PoolEntry {
        rope: Rope::new(RopeId(i), config),
        used: false,
      })
      .collect();

    Self { entries }
  }

  /// Claim the first free rope.
  pub fn acquire(&mut self) -> EngineResult<RopeId> {
    let capacity = self.entries.len();
    let Some(entry) = self.entries.iter_mut().find(|e| !e.used) else {
      warn!(capacity, "Rope pool exhausted");
      return Err(EngineError::PoolExhausted { capacity });
    };

    entry.used = true;
    Ok(entry.rope.id())
  }

  /// Clean every rope and mark every entry free.
  pub fn release_all(&mut self) {
    for entry in &mut self.entries {
      entry.rope.clean();
      entry.used = false;
    }
  }

  /// Seed `child` from the tail of `parent`, see [`Rope::join`].
  pub fn join(&mut self, child: RopeId, parent: RopeId) -> EngineResult<()> {
    let tail = self
      .rope(parent)?
      .tail_pair()
      .ok_or(EngineError::JoinSourceTooShort(parent))?;
    self.rope_mut(child)?.seed(tail, parent);
    Ok(())
  }

  /// Test the newest segment of `id` against its predecessor chain and
  /// itself, oldest rope first. The first hit is recorded on `id`.
  pub fn detect_crossing(&mut self, id: RopeId) -> EngineResult<Option<Crossing>> {
    let rope = self.rope(id)?;
    let Some(segment) = rope.last_segment() else {
      return Ok(None);
    };

    let predecessor = rope.predecessor();
    let mut found = None;
    for ancestor in self.chain(id).into_iter().rev() {
      let skip = if Some(ancestor) == predecessor {
        Skip::JoinSeam
      } else {
        Skip::None
      };
      found = self.rope(ancestor)?.find_crossing(&segment, skip);
      if found.is_some() {
        break;
      }
    }

    let found = match found {
      Some(crossing) => Some(crossing),
      None => self.rope(id)?.find_crossing(&segment, Skip::Recent),
    };

    if let Some(crossing) = found {
      self.rope_mut(id)?.record_crossing(crossing);
    }
    Ok(found)
  }

  /// Predecessors of `id`, nearest first. Stops at a repeated id.
  pub fn chain(&self, id: RopeId) -> Vec<RopeId> {
    let mut chain = Vec::new();
    let mut current = self.get(id).and_then(Rope::predecessor);

    while let Some(ancestor) = current {
      if ancestor == id || chain.contains(&ancestor) || chain.len() >= self.entries.len() {
        break;
      }
      chain.push(ancestor);
      current = self.get(ancestor).and_then(Rope::predecessor);
    }

    chain
  }

  // ===========================================================================
  // Accessors
  // ===========================================================================

  fn get(&self, id: RopeId) -> Option<&Rope> {
    self.entries.get(id.index()).map(|e| &e.rope)
  }

  pub fn rope(&self, id: RopeId) -> EngineResult<&Rope> {
    self.get(id).ok_or(EngineError::UnknownRope(id))
  }

  pub fn rope_mut(&mut self, id: RopeId) -> EngineResult<&mut Rope> {
    self
      .entries
      .get_mut(id.index())
      .map(|e| &mut e.rope)
      .ok_or(EngineError::UnknownRope(id))
  }

  pub fn is_used(&self, id: RopeId) -> bool {
    self.entries.get(id.index()).is_some_and(|e| e.used)
  }

  #[inline]
  pub fn capacity(&self) -> usize {
    self.entries.len()
  }

  pub fn free_count(&self) -> usize {
    self.entries.iter().filter(|e| !e.used).count()
  }

  #[inline]
  pub fn entries(&self) -> &[PoolEntry] {
    &self.entries
  }

  /// Every rope in arena order, for the renderer.
  pub fn ropes(&self) -> impl Iterator<Item = &Rope> + '_ {
    self.entries.iter().map(|e| &e.rope)
  }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
