use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Quat, Vec2, Vec3};

use super::*;
use crate::agent::{BehaviorKind, SteerBehavior, SteerMode};

// =========================================================================
// Batch 1: Angles
// =========================================================================

#[test]
fn test_delta_angle_wraps() {
  let cases = [
    (0.0, 0.25, 0.25),
    (0.0, 3.0 * FRAC_PI_2, -FRAC_PI_2),
    (0.0, PI, PI),
    (0.0, -PI, PI),
    (PI - 0.1, -PI + 0.1, 0.2),
    (0.0, 4.0 * TAU + 0.5, 0.5),
  ];

  for (from, to, expected) in cases {
    let d = delta_angle(from, to);
    assert!((d - expected).abs() < 1e-4, "delta_angle({}, {}) = {}, want {}", from, to, d, expected);
    assert!(d > -PI && d <= PI);
  }
}

// =========================================================================
// Batch 2: Alignment
// =========================================================================

#[test]
fn test_align_same_normal_only_moves() {
  let mut state = RollerState::default();
  state.align(Vec3::Y, Vec3::new(1.0, 0.0, 2.0));

  assert_eq!(state.position, Vec3::new(1.0, 0.0, 2.0));
  assert!(state.orientation.abs_diff_eq(Quat::IDENTITY, 1e-6));
}

#[test]
fn test_align_tilts_onto_new_normal() {
  let mut state = RollerState::default();
  state.align(Vec3::Z, Vec3::ZERO);

  assert!((state.orientation * Vec3::Y).abs_diff_eq(Vec3::Z, 1e-5));
  assert_eq!(state.last_normal, Vec3::Z);
}

#[test]
fn test_align_ignores_opposite_normal() {
  let mut state = RollerState::default();
  state.align(Vec3::NEG_Y, Vec3::X);

  assert!(state.orientation.abs_diff_eq(Quat::IDENTITY, 1e-6));
  assert_eq!(state.last_normal, Vec3::Y);
  assert_eq!(state.position, Vec3::X, "Position still follows");
}

// =========================================================================
// Batch 3: Steering
// =========================================================================

#[test]
fn test_thrust_requests_point_ahead() {
  let mut state = RollerState::default();
  assert!(state.move_by_thrust_rotate(Vec2::new(0.0, 1.0)));

  assert!(state.slot.is_pending());
  assert!(state.slot.point.abs_diff_eq(Vec3::new(0.0, 0.0, 0.01), 1e-6));
  assert_eq!(state.target_yaw, 0.0);
}

#[test]
fn test_thrust_dead_zone() {
  let mut state = RollerState::default();
  assert!(!state.move_by_thrust_rotate(Vec2::new(0.005, 0.0)));
  assert!(!state.slot.is_pending());
}

#[test]
fn test_turn_applies_on_next_alignment() {
  let mut state = RollerState::default();
  state.move_by_thrust_rotate(Vec2::new(1.0, 0.0));
  let expected = -TAU * 0.01;
  assert!((state.target_yaw - expected).abs() < 1e-6);
  assert_eq!(state.yaw, 0.0, "Yaw waits for the query");

  state.align(Vec3::Y, state.slot.point);
  assert_eq!(state.yaw, state.target_yaw);
  assert!(state.orientation.abs_diff_eq(Quat::from_rotation_y(expected), 1e-5));
}

#[test]
fn test_direction_turns_by_signed_angle() {
  let mut state = RollerState::default();

  assert!(state.move_by_direction(Vec2::new(0.0, -1.0)));
  assert_eq!(state.target_yaw, 0.0, "Same heading, no turn");
  assert!(state.slot.point.abs_diff_eq(Vec3::new(0.0, 0.0, -0.01), 1e-6));

  assert!(state.move_by_direction(Vec2::new(2.0, 0.0)));
  assert!((state.target_yaw + FRAC_PI_2).abs() < 1e-5, "Got {}", state.target_yaw);
  assert_eq!(state.last_direction, Vec2::X);
}

#[test]
fn test_direction_dead_zone() {
  let mut state = RollerState::default();
  assert!(!state.move_by_direction(Vec2::new(0.3, 0.0)));
  assert!(!state.slot.is_pending());
}

// =========================================================================
// Batch 4: Agent protocol
// =========================================================================

#[test]
fn test_resolution_aligns_roller() {
  let mut roller = Roller::new();
  let mut result = FaceResult::UNRESOLVED;
  result.point = Vec3::new(0.3, 0.0, 0.3);
  result.normal = Vec3::Y;

  roller.on_query_resolved(&result);
  assert_eq!(roller.position(), Vec3::new(0.3, 0.0, 0.3));
  assert!(roller.query_slot().is_some());
}

#[test]
fn test_view_follows_orientation() {
  let mut roller = Roller::new();
  roller.align(Vec3::Z, Vec3::X);

  SurfaceAgent::update(&mut roller, 0.0);
  assert!(roller.state.view.abs_diff_eq(Quat::IDENTITY, 1e-6), "No time, no turn");
  assert_eq!(roller.state.view_position, Vec3::X);

  SurfaceAgent::update(&mut roller, 1000.0);
  assert!(roller.state.view.abs_diff_eq(roller.orientation(), 1e-5));
}

#[test]
fn test_steer_behavior_submits_queries() {
  let mut roller = Roller::new().with_linear_speed(0.1);
  roller.behaviors.add(Box::new(SteerBehavior {
    axis: Vec2::new(0.0, -1.0),
    mode: SteerMode::ThrustRotate,
  }));
  assert_eq!(roller.behaviors.order(), vec![BehaviorKind::View, BehaviorKind::Steer]);

  SurfaceAgent::update(&mut roller, 16.0);
  assert!(roller.state.slot.is_pending());
  assert!(roller.state.slot.point.abs_diff_eq(Vec3::new(0.0, 0.0, -0.1), 1e-6));
}
