//! Ordered, swappable per-agent behaviours.
//!
//! Behaviours run in list order on every update. Adding a behaviour of a kind
//! that is already present replaces it: [`Behaviors::add`] moves the new one to
//! the end, [`Behaviors::add_first`] to the front.

use std::any::Any;

use glam::Vec2;

use super::roller::RollerState;

/// Identity of a behaviour slot; at most one behaviour per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
  /// Smooths the presented orientation toward the simulated one.
  View,
  /// Turns a steering axis into surface queries.
  Steer,
  /// User-defined behaviours.
  Custom(u32),
}

pub trait Behavior {
  fn kind(&self) -> BehaviorKind;

  /// `delta` is in milliseconds.
  fn update(&mut self, state: &mut RollerState, delta: f32);

  fn on_activate(&mut self) {}

  fn on_deactivate(&mut self) {}

  fn as_any(&self) -> &dyn Any;

  fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Entry {
  behavior: Box<dyn Behavior>,
  active: bool,
}

/// Explicitly ordered list of behaviours, one per [`BehaviorKind`].
#[derive(Default)]
pub struct Behaviors {
  entries: Vec<Entry>,
}

impl Behaviors {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append `behavior`, replacing one of the same kind. Returns the replaced one.
  pub fn add(&mut self, behavior: Box<dyn Behavior>) -> Option<Box<dyn Behavior>> {
    let replaced = self.remove(behavior.kind());
    self.entries.push(Entry { behavior, active: true });
    replaced
  }

  /// Insert `behavior` at the front, replacing one of the same kind.
  pub fn add_first(&mut self, behavior: Box<dyn Behavior>) -> Option<Box<dyn Behavior>> {
    let replaced = self.remove(behavior.kind());
    self.entries.insert(0, Entry { behavior, active: true });
    replaced
  }

  pub fn remove(&mut self, kind: BehaviorKind) -> Option<Box<dyn Behavior>> {
    let index = self.position(kind)?;
    Some(self.entries.remove(index).behavior)
  }

  pub fn get(&self, kind: BehaviorKind) -> Option<&dyn Behavior> {
    self.position(kind).map(|i| self.entries[i].behavior.as_ref())
  }

  pub fn get_mut(&mut self, kind: BehaviorKind) -> Option<&mut (dyn Behavior + 'static)> {
    let index = self.position(kind)?;
    Some(self.entries[index].behavior.as_mut())
  }

  /// Concrete behaviour of type `T` stored under `kind`.
  pub fn downcast_mut<T: Behavior + 'static>(&mut self, kind: BehaviorKind) -> Option<&mut T> {
    self.get_mut(kind)?.as_any_mut().downcast_mut::<T>()
  }

  pub fn contains(&self, kind: BehaviorKind) -> bool {
    self.position(kind).is_some()
  }

  /// Kinds in update order.
  pub fn order(&self) -> Vec<BehaviorKind> {
    self.entries.iter().map(|e| e.behavior.kind()).collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Toggle a behaviour. Returns `false` if `kind` is absent.
  pub fn set_active(&mut self, kind: BehaviorKind, active: bool) -> bool {
    let Some(index) = self.position(kind) else {
      return false;
    };

    let entry = &mut self.entries[index];
    if entry.active != active {
      entry.active = active;
      if active {
        entry.behavior.on_activate();
      } else {
        entry.behavior.on_deactivate();
      }
    }
    true
  }

  pub fn is_active(&self, kind: BehaviorKind) -> bool {
    self.position(kind).is_some_and(|i| self.entries[i].active)
  }

  /// Run every active behaviour in order.
  pub fn update(&mut self, state: &mut RollerState, delta: f32) {
    for entry in self.entries.iter_mut().filter(|e| e.active) {
      entry.behavior.update(state, delta);
    }
  }

  fn position(&self, kind: BehaviorKind) -> Option<usize> {
    self.entries.iter().position(|e| e.behavior.kind() == kind)
  }
}

impl std::fmt::Debug for Behaviors {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list()
      .entries(self.entries.iter().map(|e| (e.behavior.kind(), e.active)))
      .finish()
  }
}

// =============================================================================
// Built-in behaviours
// =============================================================================

/// Slerps the view toward the simulated orientation and snaps the view
/// position to the agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBehavior {
  /// Radians per second.
  pub angular_speed: f32,
}

impl Default for ViewBehavior {
  fn default() -> Self {
    Self {
      angular_speed: std::f32::consts::TAU,
    }
  }
}

impl Behavior for ViewBehavior {
  fn kind(&self) -> BehaviorKind {
    BehaviorKind::View
  }

  fn update(&mut self, state: &mut RollerState, delta: f32) {
    let t = (self.angular_speed * delta * 0.001).clamp(0.0, 1.0);
    state.view_position = state.position;
    state.view = state.view.slerp(state.orientation, t).normalize();
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}

/// How a steering axis is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SteerMode {
  /// `x` turns, `y` thrusts along the heading.
  #[default]
  ThrustRotate,
  /// The axis is a desired screen-space heading.
  Direction,
}

/// Feeds a steering axis into the roller's move requests every update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SteerBehavior {
  pub axis: Vec2,
  pub mode: SteerMode,
}

impl SteerBehavior {
  pub fn new(mode: SteerMode) -> Self {
    Self {
      axis: Vec2::ZERO,
      mode,
    }
  }
}

impl Behavior for SteerBehavior {
  fn kind(&self) -> BehaviorKind {
    BehaviorKind::Steer
  }

  fn update(&mut self, state: &mut RollerState, _delta: f32) {
    match self.mode {
      SteerMode::ThrustRotate => state.move_by_thrust_rotate(self.axis),
      SteerMode::Direction => state.move_by_direction(self.axis),
    };
  }

  fn on_deactivate(&mut self) {
    self.axis = Vec2::ZERO;
  }

  fn as_any(&self) -> &dyn Any {
    self
  }

  fn as_any_mut(&mut self) -> &mut dyn Any {
    self
  }
}

#[cfg(test)]
#[path = "behaviors_test.rs"]
mod behaviors_test;
