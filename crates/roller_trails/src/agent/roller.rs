//! Roller - reference agent that rolls over the indexed surface.
//!
//! Movement never writes the position directly. A move submits a query for
//! the point ahead; once the world resolves it, [`RollerState::align`] tilts
//! the orientation onto the new face normal, applies any pending yaw and
//! moves onto the surface point.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};

use super::behaviors::{Behaviors, ViewBehavior};
use crate::solver::{FaceResult, QuerySlot, SurfaceAgent};

/// Angles and normal changes below this are ignored.
const ANGLE_EPSILON: f32 = 1e-4;

/// Signed shortest turn from `from` to `to`, in `(-π, π]`.
pub fn delta_angle(from: f32, to: f32) -> f32 {
  let d = (to - from).rem_euclid(TAU);
  if d > PI {
    d - TAU
  } else {
    d
  }
}

/// Simulation state shared with the roller's behaviours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RollerState {
  pub position: Vec3,
  pub orientation: Quat,
  pub last_normal: Vec3,

  /// Yaw already baked into `orientation`.
  pub yaw: f32,
  /// Yaw applied on the next alignment.
  pub target_yaw: f32,

  /// Distance requested per move.
  pub linear_speed: f32,
  /// Radians per second at full turn input.
  pub angular_speed: f32,
  pub last_direction: Vec2,

  /// Presented transform, smoothed by the view behaviour.
  pub view: Quat,
  pub view_position: Vec3,

  pub slot: QuerySlot,
}

impl RollerState {
  pub const DEFAULT: Self = Self {
    position: Vec3::ZERO,
    orientation: Quat::IDENTITY,
    last_normal: Vec3::Y,
    yaw: 0.0,
    target_yaw: 0.0,
    linear_speed: 0.01,
    angular_speed: TAU,
    last_direction: Vec2::new(0.0, -1.0),
    view: Quat::IDENTITY,
    view_position: Vec3::ZERO,
    slot: QuerySlot::idle(Vec3::ZERO),
  };

  /// Tilt onto `normal`, apply pending yaw and move to `point`.
  ///
  /// A normal opposite to the current one is ignored, since the shortest arc
  /// between them is undefined.
  pub fn align(&mut self, normal: Vec3, point: Vec3) {
    if let Some(normal) = normal.try_normalize() {
      let r = self.last_normal.dot(normal) + 1.0;
      if r.abs() > ANGLE_EPSILON {
        let tilt = Quat::from_rotation_arc(self.last_normal, normal);
        self.orientation = (tilt * self.orientation).normalize();
        self.last_normal = normal;
      }
    }

    let da = delta_angle(self.yaw, self.target_yaw);
    if da.abs() > ANGLE_EPSILON {
      self.orientation = (self.orientation * Quat::from_axis_angle(Vec3::Y, da)).normalize();
      self.yaw = self.target_yaw;
    }

    self.position = point;
  }

  /// Keyboard-style steering: `axis.x` turns, `axis.y` moves along the
  /// local z axis. Returns whether a query was submitted.
  pub fn move_by_thrust_rotate(&mut self, axis: Vec2) -> bool {
    if axis.length() < 0.01 {
      return false;
    }

    self.target_yaw += self.angular_speed * -axis.x * 0.01;
    let ahead = self.orientation * Vec3::new(0.0, 0.0, axis.y * self.linear_speed);
    self.slot.request(self.position + ahead);
    true
  }

  /// Heading steering: turn by the signed angle between the previous and the
  /// new heading, then step forward. Returns whether a query was submitted.
  pub fn move_by_direction(&mut self, direction: Vec2) -> bool {
    if direction.length() < 0.5 {
      return false;
    }

    let direction = direction.normalize();
    if direction.distance(self.last_direction) > ANGLE_EPSILON {
      let angle = direction.dot(self.last_direction).clamp(-1.0, 1.0).acos();
      let cross = direction.perp_dot(self.last_direction);
      let sign = if cross > 0.0 {
        1.0
      } else if cross < 0.0 {
        -1.0
      } else {
        0.0
      };

      self.target_yaw += angle * sign;
      self.last_direction = direction;
    }

    let ahead = self.orientation * Vec3::new(0.0, 0.0, -self.linear_speed);
    self.slot.request(self.position + ahead);
    true
  }

  /// Unit heading in world space.
  pub fn forward(&self) -> Vec3 {
    self.orientation * Vec3::NEG_Z
  }
}

impl Default for RollerState {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// Surface agent made of a [`RollerState`] and an ordered behaviour list.
#[derive(Debug)]
pub struct Roller {
  pub state: RollerState,
  pub behaviors: Behaviors,
}

impl Roller {
  /// Roller at the origin with the view behaviour installed.
  pub fn new() -> Self {
    let mut behaviors = Behaviors::new();
    behaviors.add(Box::new(ViewBehavior::default()));
    Self {
      state: RollerState::DEFAULT,
      behaviors,
    }
  }

  pub fn with_linear_speed(mut self, linear_speed: f32) -> Self {
    self.state.linear_speed = linear_speed;
    self
  }

  pub fn with_angular_speed(mut self, angular_speed: f32) -> Self {
    self.state.angular_speed = angular_speed;
    self
  }

  #[inline]
  pub fn position(&self) -> Vec3 {
    self.state.position
  }

  #[inline]
  pub fn orientation(&self) -> Quat {
    self.state.orientation
  }

  pub fn align(&mut self, normal: Vec3, point: Vec3) {
    self.state.align(normal, point);
  }

  pub fn move_by_thrust_rotate(&mut self, axis: Vec2) -> bool {
    self.state.move_by_thrust_rotate(axis)
  }

  pub fn move_by_direction(&mut self, direction: Vec2) -> bool {
    self.state.move_by_direction(direction)
  }
}

impl Default for Roller {
  fn default() -> Self {
    Self::new()
  }
}

impl SurfaceAgent for Roller {
  fn query_slot(&self) -> Option<&QuerySlot> {
    Some(&self.state.slot)
  }

  fn query_slot_mut(&mut self) -> Option<&mut QuerySlot> {
    Some(&mut self.state.slot)
  }

  fn on_query_resolved(&mut self, result: &FaceResult) {
    self.state.align(result.normal, result.point);
  }

  fn update(&mut self, delta: f32) {
    self.behaviors.update(&mut self.state, delta);
  }
}

#[cfg(test)]
#[path = "roller_test.rs"]
mod roller_test;
