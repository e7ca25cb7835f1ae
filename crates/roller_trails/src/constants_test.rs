use super::*;

/// The strip needs two vertices per sample and two triangles per quad.
#[test]
fn test_strip_layout_constants() {
  assert_eq!(VERTICES_PER_SAMPLE, 2, "One vertex per ribbon edge");
  assert_eq!(INDICES_PER_QUAD, 6, "Two triangles per strip quad");
  assert_eq!(OCTANTS, 8, "Octree nodes have eight octants");
}

/// Spacing must exceed the lift, otherwise neighbouring rows overlap.
#[test]
fn test_spacing_is_larger_than_offset() {
  assert!(
    ROPE_MIN_DISTANCE > SURFACE_OFFSET,
    "Minimum spacing {} should exceed surface offset {}",
    ROPE_MIN_DISTANCE,
    SURFACE_OFFSET
  );
  assert!(ROPE_WIDTH > 0.0, "Rope width must be positive");
}

#[test]
fn test_octree_defaults_are_positive() {
  assert!(OCTREE_MARGIN_RATIO > 0.0 && OCTREE_MARGIN_RATIO < 1.0);
  assert!(OCTREE_MIN_NODE_SIZE > 0.0);
}
