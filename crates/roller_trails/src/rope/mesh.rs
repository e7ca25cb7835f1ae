//! RopeMesh - fixed-capacity strip buffer handed to the renderer.

use std::ops::Range;

use crate::constants::{INDICES_PER_QUAD, VERTICES_PER_SAMPLE};
use crate::types::RopeVertex;

/// Vertex and index buffers for one rope.
///
/// Sized for the rope's capacity at construction and never resized. Sample
/// row `i` owns vertices `2i` (left edge) and `2i + 1` (right edge); quad `i`
/// joins rows `i` and `i + 1`.
#[derive(Clone, Debug)]
pub struct RopeMesh {
  vertices: Vec<RopeVertex>,
  indices: Vec<u32>,
  draw_range: Range<usize>,
  visible: bool,
}

impl RopeMesh {
  /// Buffers for up to `rows` samples.
  pub fn with_rows(rows: usize) -> Self {
    let quads = rows.saturating_sub(1);
    let mut indices = Vec::with_capacity(quads * INDICES_PER_QUAD);
    for quad in 0..quads as u32 {
      let base = quad * VERTICES_PER_SAMPLE as u32;
      indices.extend_from_slice(&[base, base + 2, base + 1, base + 2, base + 3, base + 1]);
    }

    Self {
      vertices: vec![RopeVertex::default(); rows * VERTICES_PER_SAMPLE],
      indices,
      draw_range: 0..0,
      visible: false,
    }
  }

  /// Number of sample rows the buffer holds.
  #[inline]
  pub fn rows(&self) -> usize {
    self.vertices.len() / VERTICES_PER_SAMPLE
  }

  #[inline]
  pub fn vertices(&self) -> &[RopeVertex] {
    &self.vertices
  }

  #[inline]
  pub fn indices(&self) -> &[u32] {
    &self.indices
  }

  /// Index range to draw.
  #[inline]
  pub fn draw_range(&self) -> Range<usize> {
    self.draw_range.clone()
  }

  /// Indices inside the draw range.
  pub fn drawn_indices(&self) -> &[u32] {
    &self.indices[self.draw_range.clone()]
  }

  #[inline]
  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub(crate) fn write_row(&mut self, row: usize, left: RopeVertex, right: RopeVertex) {
    self.vertices[row * VERTICES_PER_SAMPLE] = left;
    self.vertices[row * VERTICES_PER_SAMPLE + 1] = right;
  }

  /// Show `rows` sample rows.
  pub(crate) fn show_rows(&mut self, rows: usize) {
    let quads = rows.saturating_sub(1).min(self.rows().saturating_sub(1));
    self.draw_range = 0..quads * INDICES_PER_QUAD;
    self.visible = quads > 0;
  }

  pub(crate) fn hide(&mut self) {
    self.draw_range = 0..0;
    self.visible = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_buffers_sized_for_rows() {
    let mesh = RopeMesh::with_rows(6);
    assert_eq!(mesh.rows(), 6);
    assert_eq!(mesh.vertices().len(), 12);
    assert_eq!(mesh.indices().len(), 30, "Five quads, six indices each");
    assert!(!mesh.is_visible());
    assert!(mesh.drawn_indices().is_empty());
  }

  #[test]
  fn test_quad_winding() {
    let mesh = RopeMesh::with_rows(3);
    assert_eq!(&mesh.indices()[..6], &[0, 2, 1, 2, 3, 1]);
    assert_eq!(&mesh.indices()[6..], &[2, 4, 3, 4, 5, 3]);
  }

  #[test]
  fn test_show_rows_clamps_to_capacity() {
    let mut mesh = RopeMesh::with_rows(4);
    mesh.show_rows(3);
    assert_eq!(mesh.draw_range(), 0..12);
    assert!(mesh.is_visible());

    mesh.show_rows(10);
    assert_eq!(mesh.draw_range(), 0..18);

    mesh.hide();
    assert_eq!(mesh.draw_range(), 0..0);
    assert!(!mesh.is_visible());
  }

  #[test]
  fn test_single_row_is_not_visible() {
    let mut mesh = RopeMesh::with_rows(4);
    mesh.show_rows(1);
    assert!(!mesh.is_visible());
  }
}
