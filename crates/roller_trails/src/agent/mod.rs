//! Reference surface agent and its behaviour list.
//!
//! - [`roller`]: `Roller` agent, shortest-arc alignment and steering
//! - [`behaviors`]: ordered `Behaviors` list with view and steer behaviours

pub mod behaviors;
pub mod roller;

pub use behaviors::{Behavior, BehaviorKind, Behaviors, SteerBehavior, SteerMode, ViewBehavior};
pub use roller::{delta_angle, Roller, RollerState};
