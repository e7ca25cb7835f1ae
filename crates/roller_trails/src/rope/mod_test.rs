use glam::Vec3;

use super::*;

fn rope(sections: usize) -> Rope {
  Rope::new(
    RopeId(0),
    RopeConfig::new()
      .with_sections(sections)
      .with_width(0.1)
      .with_min_distance(0.05),
  )
}

fn push_x(rope: &mut Rope, x: f32) -> EngineResult<PushOutcome> {
  rope.push_point(Vec3::new(x, 0.0, 0.0), Vec3::Y, true)
}

// =========================================================================
// Batch 1: Capacity and closing
// =========================================================================

/// Five samples 0.2 apart on a flat surface fill a four-segment rope.
#[test]
fn test_four_segment_scenario() {
  let mut rope = rope(4);

  for (i, x) in [0.0, 0.2, 0.4, 0.6, 0.8].into_iter().enumerate() {
    assert!(!rope.is_closed(), "Closed before push {}", i + 1);
    push_x(&mut rope, x).expect("Rope accepts samples until closed");
    rope.rebuild(false);
  }

  assert_eq!(rope.segment_count(), 4);
  assert!(rope.is_closed());

  // Link pair + four samples = six rows = twelve vertices.
  let drawn = rope.mesh().drawn_indices();
  assert_eq!(rope.mesh().draw_range(), 0..30);
  assert_eq!(drawn.iter().copied().max(), Some(11), "Draw range covers all rows");
  assert!(rope.mesh().is_visible());
}

#[test]
fn test_closed_rope_rejects_pushes() {
  let mut rope = rope(2);
  for x in [0.0, 0.5, 1.0] {
    push_x(&mut rope, x).unwrap();
  }
  assert!(rope.is_closed());

  assert_eq!(push_x(&mut rope, 1.5), Err(EngineError::RopeClosed(RopeId(0))));
  assert_eq!(
    push_x(&mut rope, 1.01),
    Err(EngineError::RopeClosed(RopeId(0))),
    "Tail updates are rejected too"
  );
  assert_eq!(rope.segment_count(), 2);
}

/// Closed flips exactly when the count reaches capacity.
#[test]
fn test_closed_exactness() {
  let mut rope = rope(5);
  let mut x = 0.0;
  push_x(&mut rope, x).unwrap();

  while !rope.is_closed() {
    x += 0.1;
    push_x(&mut rope, x).unwrap();
    assert_eq!(rope.is_closed(), rope.segment_count() == 5);
  }
  assert_eq!(rope.segment_count(), 5);
}

// =========================================================================
// Batch 2: Thinning
// =========================================================================

#[test]
fn test_first_push_stores_link_pair() {
  let mut rope = rope(4);
  assert_eq!(push_x(&mut rope, 1.0), Ok(PushOutcome::Started));
  assert_eq!(rope.points().len(), 2);
  assert_eq!(rope.points()[0], rope.points()[1]);
  assert_eq!(rope.segment_count(), 0);
}

#[test]
fn test_close_samples_only_move_the_tail() {
  let mut rope = rope(10);
  for x in [0.0, 0.3, 0.6] {
    push_x(&mut rope, x).unwrap();
  }
  let count = rope.segment_count();

  // The anchor is the sample before the tail, at x = 0.3.
  for x in [0.32, 0.34, 0.26, 0.349, 0.301] {
    assert_eq!(push_x(&mut rope, x), Ok(PushOutcome::TailUpdated));
    assert_eq!(rope.segment_count(), count, "Thinning never adds segments");
    assert_eq!(rope.points().last().unwrap().position.x, x, "Tail follows the sample");
  }
}

#[test]
fn test_far_sample_adds_exactly_one_segment() {
  let mut rope = rope(10);
  for x in [0.0, 0.3, 0.6] {
    push_x(&mut rope, x).unwrap();
  }
  let count = rope.segment_count();

  assert_eq!(push_x(&mut rope, 0.36), Ok(PushOutcome::Appended));
  assert_eq!(rope.segment_count(), count + 1);
  assert_eq!(rope.points()[rope.points().len() - 2].position.x, 0.6, "Old tail becomes the anchor");
}

#[test]
fn test_uncommitted_push_always_appends() {
  let mut rope = rope(10);
  push_x(&mut rope, 0.0).unwrap();
  let outcome = rope.push_point(Vec3::new(0.001, 0.0, 0.0), Vec3::Y, false);
  assert_eq!(outcome, Ok(PushOutcome::Appended));
  assert_eq!(rope.segment_count(), 1);
}

// =========================================================================
// Batch 3: Rebuild
// =========================================================================

#[test]
fn test_rebuild_writes_offset_edges() {
  let mut rope = rope(4);
  for x in [0.0, 0.2, 0.4] {
    push_x(&mut rope, x).unwrap();
  }
  rope.rebuild(false);

  let vertices = rope.mesh().vertices();
  for (row, sample) in rope.points().iter().enumerate() {
    let left = Vec3::from_array(vertices[row * 2].position);
    let right = Vec3::from_array(vertices[row * 2 + 1].position);
    let x = sample.position.x;

    assert!(left.abs_diff_eq(Vec3::new(x, 0.01, 0.05), 1e-6), "Row {} left {:?}", row, left);
    assert!(right.abs_diff_eq(Vec3::new(x, 0.01, -0.05), 1e-6), "Row {} right {:?}", row, right);
    assert_eq!(vertices[row * 2].normal, [0.0, 1.0, 0.0]);
  }
}

/// Strip triangles face the sample normal.
#[test]
fn test_strip_faces_sample_normal() {
  let mut rope = rope(4);
  for x in [0.0, 0.2, 0.4] {
    push_x(&mut rope, x).unwrap();
  }
  rope.rebuild(false);

  let vertices = rope.mesh().vertices();
  for tri in rope.mesh().drawn_indices().chunks(3) {
    let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(vertices[i as usize].position));
    let n = (b - a).cross(c - a);
    assert!(n.y >= 0.0, "Triangle {:?} faces down", tri);
  }
}

#[test]
fn test_appends_rebuild_only_the_tail_rows() {
  let mut rope = rope(20);
  for i in 0..8 {
    push_x(&mut rope, i as f32 * 0.1).unwrap();
  }
  rope.rebuild(false);
  assert_eq!(rope.last_rebuilt(), 0..9, "First rebuild writes every row");

  push_x(&mut rope, 0.8).unwrap();
  rope.rebuild(false);
  assert_eq!(rope.last_rebuilt(), 7..10, "Append touches the last rows only");

  push_x(&mut rope, 0.72).unwrap();
  rope.rebuild(false);
  assert_eq!(rope.last_rebuilt(), 7..10, "Tail update touches the last rows only");

  rope.rebuild(false);
  assert_eq!(rope.last_rebuilt(), 0..0, "Clean rope skips the rebuild");

  rope.rebuild(true);
  assert_eq!(rope.last_rebuilt(), 0..10, "Force rewrites every row");
}

#[test]
fn test_set_width_forces_full_rebuild() {
  let mut rope = rope(10);
  for x in [0.0, 0.2, 0.4, 0.6] {
    push_x(&mut rope, x).unwrap();
  }
  rope.rebuild(false);

  rope.set_width(0.0);
  rope.set_width(0.1);
  assert!(!rope.is_dirty(), "Non-positive and unchanged widths are ignored");

  rope.set_width(0.4);
  rope.rebuild(false);
  assert_eq!(rope.last_rebuilt(), 0..5);
  let left = rope.mesh().vertices()[0].position;
  assert!((left[2] - 0.2).abs() < 1e-6, "Half of the new width, got {}", left[2]);
}

#[test]
fn test_set_color_recolours_all_rows() {
  let mut rope = rope(10);
  for x in [0.0, 0.2, 0.4] {
    push_x(&mut rope, x).unwrap();
  }
  rope.rebuild(false);

  let red = Color::from_hex(0xff0000);
  rope.set_color(red);
  rope.rebuild(false);
  assert_eq!(rope.color(), red);
  for v in &rope.mesh().vertices()[..8] {
    assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
  }
}

// =========================================================================
// Batch 4: Join and clean
// =========================================================================

#[test]
fn test_join_continuity() {
  let mut parent = rope(3);
  let normals = [Vec3::Y, Vec3::new(0.0, 1.0, 0.1).normalize(), Vec3::Z];
  for (i, n) in normals.into_iter().enumerate() {
    parent.push_point(Vec3::new(i as f32 * 0.3, 0.0, 0.0), n, true).unwrap();
  }

  let mut child = Rope::new(RopeId(1), *parent.config());
  child.join(&parent).unwrap();

  let parent_last = parent.last_segment().unwrap();
  let child_first = child.segment(0).unwrap();
  assert!(child_first.a.abs_diff_eq(&parent_last.a, 1e-6));
  assert!(child_first.b.abs_diff_eq(&parent_last.b, 1e-6));
  assert_eq!(child.predecessor(), Some(RopeId(0)));
  assert_eq!(child.segment_count(), 0, "Seam segment is the child's link");
  assert!(child.mesh().is_visible());
}

#[test]
fn test_join_needs_two_samples() {
  let parent = rope(3);
  let mut child = rope(3);
  assert_eq!(child.join(&parent), Err(EngineError::JoinSourceTooShort(RopeId(0))));
}

#[test]
fn test_clean_resets_everything() {
  let mut rope = rope(3);
  for x in [0.0, 0.3, 0.6] {
    push_x(&mut rope, x).unwrap();
  }
  rope.rebuild(false);
  assert!(rope.mesh().is_visible());

  rope.clean();
  assert!(rope.is_empty());
  assert_eq!(rope.segment_count(), 0);
  assert!(rope.predecessor().is_none());
  assert!(rope.crossings().is_empty());
  assert!(!rope.mesh().is_visible());
  assert_eq!(rope.low_water(), 0);
}

#[test]
fn test_segments_and_tail_pair() {
  let mut rope = rope(5);
  assert!(rope.tail_pair().is_none());
  assert!(rope.last_segment().is_none());

  for x in [0.0, 0.5, 1.0] {
    push_x(&mut rope, x).unwrap();
  }

  let ids: Vec<u32> = rope.segments().map(|s| s.id).collect();
  assert_eq!(ids, vec![0, 1, 2], "Link segment included");
  assert!(rope.segment(0).unwrap().is_degenerate());
  assert!(rope.segment(3).is_none(), "No sample after the tail");

  let [a, b] = rope.tail_pair().unwrap();
  assert_eq!(a.position.x, 0.5);
  assert_eq!(b.position.x, 1.0);
  assert_eq!(rope.last_segment().unwrap().id, 2);
}
