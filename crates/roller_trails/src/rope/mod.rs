//! Rope - append-only, thinning ribbon built from surface samples.
//!
//! A rope stores a list of [`LinePoint`]s. The first push stores the sample
//! twice, giving a degenerate *link* segment that seeds the tangent before a
//! second real sample exists. After that every push either:
//!
//! - **appends** a sample when it is at least `min_distance` from the last
//!   committed anchor (`points[len - 2]`), or
//! - **updates the tail** (`points[len - 1]`) in place when it is closer.
//!
//! The link segment is not counted: `segment_count = max(len - 2, 0)` and the
//! rope is closed once that reaches `sections`.
//!
//! [`Rope::rebuild`] regenerates two edge vertices per sample, starting at
//! the low-water mark so a tail update only touches the last few rows.

mod intersection;
mod mesh;

use std::ops::Range;

use glam::Vec3;

pub use intersection::{Crossing, Segment, Skip};
pub use mesh::RopeMesh;

use crate::constants::{GEOMETRY_EPSILON, ROPE_MIN_DISTANCE, ROPE_SECTIONS, ROPE_WIDTH, SURFACE_OFFSET};
use crate::error::{EngineError, EngineResult};
use crate::pool::RopeId;
use crate::types::{Color, LinePoint, RopeVertex};

/// Shape parameters of a rope.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopeConfig {
  /// Segment capacity (link segment excluded).
  pub sections: usize,

  /// Strip width in world units.
  pub width: f32,

  /// Lift along the sample normal.
  pub offset: f32,

  /// Spacing below which a push only moves the tail.
  pub min_distance: f32,
}

impl RopeConfig {
  pub const DEFAULT: Self = Self {
    sections: ROPE_SECTIONS,
    width: ROPE_WIDTH,
    offset: SURFACE_OFFSET,
    min_distance: ROPE_MIN_DISTANCE,
  };

  pub fn new() -> Self {
    Self::DEFAULT
  }

  pub fn with_sections(mut self, sections: usize) -> Self {
    self.sections = sections;
    self
  }

  pub fn with_width(mut self, width: f32) -> Self {
    self.width = width;
    self
  }

  pub fn with_offset(mut self, offset: f32) -> Self {
    self.offset = offset;
    self
  }

  pub fn with_min_distance(mut self, min_distance: f32) -> Self {
    self.min_distance = min_distance;
    self
  }

  /// Sample rows needed at capacity: link pair plus one per segment.
  #[inline]
  pub fn max_points(&self) -> usize {
    self.sections + 2
  }
}

impl Default for RopeConfig {
  fn default() -> Self {
    Self::DEFAULT
  }
}

/// What a push did to the rope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
  /// First sample, stored as both ends of the link segment.
  Started,
  /// A new sample was appended.
  Appended,
  /// The tail sample moved in place.
  TailUpdated,
}

/// Incremental ribbon with a fixed capacity and its own render buffer.
#[derive(Clone, Debug)]
pub struct Rope {
  id: RopeId,
  config: RopeConfig,
  color: Color,
  points: Vec<LinePoint>,
  predecessor: Option<RopeId>,
  crossings: Vec<Crossing>,
  mesh: RopeMesh,
  dirty: bool,
  /// First sample row whose vertices are stale.
  low_water: usize,
  last_rebuilt: Range<usize>,
}

impl Rope {
  pub fn new(id: RopeId, config: RopeConfig) -> Self {
    Self {
      id,
      config,
      color: Color::default(),
      points: Vec::with_capacity(config.max_points()),
      predecessor: None,
      crossings: Vec::new(),
      mesh: RopeMesh::with_rows(config.max_points()),
      dirty: true,
      low_water: 0,
      last_rebuilt: 0..0,
    }
  }

  // ===========================================================================
  // Sampling
  // ===========================================================================

  /// Feed one surface sample.
  ///
  /// With `commit` set, a sample closer than `min_distance` to the last
  /// anchor replaces the tail instead of appending. Without it the sample is
  /// always appended. Fails with [`EngineError::RopeClosed`] once the rope is
  /// full.
  pub fn push_point(&mut self, position: Vec3, normal: Vec3, commit: bool) -> EngineResult<PushOutcome> {
    if self.is_closed() {
      return Err(EngineError::RopeClosed(self.id));
    }

    let sample = LinePoint::new(position, normal);
    let len = self.points.len();

    let outcome = if len == 0 {
      self.points.push(sample);
      self.points.push(sample);
      PushOutcome::Started
    } else if commit && len >= 2 && self.points[len - 2].position.distance(position) < self.config.min_distance {
      self.points[len - 1] = sample;
      PushOutcome::TailUpdated
    } else {
      self.points.push(sample);
      PushOutcome::Appended
    };

    self.mark_dirty_from(self.points.len().saturating_sub(3));
    Ok(outcome)
  }

  /// Seed this rope from `parent`'s final two samples and remember it as the
  /// predecessor. Any previous content is discarded.
  pub fn join(&mut self, parent: &Rope) -> EngineResult<()> {
    let tail = parent.tail_pair().ok_or(EngineError::JoinSourceTooShort(parent.id))?;
    self.seed(tail, parent.id);
    Ok(())
  }

  /// Join from a copied tail pair, for callers that cannot borrow both ropes.
  pub(crate) fn seed(&mut self, tail: [LinePoint; 2], parent: RopeId) {
    self.clean();
    self.points.extend_from_slice(&tail);
    self.predecessor = Some(parent);
    self.mark_dirty_from(0);
    self.rebuild(false);
  }

  /// Drop every sample, crossing and predecessor link and hide the mesh.
  pub fn clean(&mut self) {
    self.points.clear();
    self.crossings.clear();
    self.predecessor = None;
    self.dirty = true;
    self.low_water = 0;
    self.rebuild(false);
  }

  // ===========================================================================
  // Mesh
  // ===========================================================================

  /// Regenerate stale sample rows, or every row with `force`.
  ///
  /// Fewer than two samples hides the mesh.
  pub fn rebuild(&mut self, force: bool) {
    if !self.dirty && !force {
      self.last_rebuilt = 0..0;
      return;
    }

    let len = self.points.len();
    if len < 2 {
      self.mesh.hide();
      self.dirty = false;
      self.low_water = 0;
      self.last_rebuilt = 0..0;
      return;
    }

    let start = if force { 0 } else { self.low_water.min(len - 1) };
    let half_width = self.config.width * 0.5;
    let offset = self.config.offset;
    let color = self.color.to_array();

    for row in start..len {
      let sample = self.points[row];
      let side = self.row_side(row) * half_width;
      let lift = sample.normal * offset;
      let normal = sample.normal.to_array();

      let vertex = |position: Vec3| RopeVertex {
        position: position.to_array(),
        normal,
        color,
      };
      self.mesh.write_row(
        row,
        vertex(sample.position - side + lift),
        vertex(sample.position + side + lift),
      );
    }

    self.mesh.show_rows(len);
    self.dirty = false;
    self.low_water = len - 1;
    self.last_rebuilt = start..len;
  }

  /// Unit vector from the strip centre to the right edge at `row`.
  fn row_side(&self, row: usize) -> Vec3 {
    let sample = self.points[row];
    let dir = self.row_direction(row);

    (-dir.cross(sample.normal))
      .try_normalize()
      .or_else(|| sample.normal.try_normalize().map(|n| n.any_orthonormal_vector()))
      .unwrap_or(Vec3::X)
  }

  /// Travel direction at `row`: toward the next distinct sample, or away from
  /// the previous one at the end of the rope.
  fn row_direction(&self, row: usize) -> Vec3 {
    let origin = self.points[row].position;
    let usable = |d: Vec3| d.length_squared() > GEOMETRY_EPSILON * GEOMETRY_EPSILON;

    let ahead = |i: usize| self.points.get(i).map(|p| p.position - origin).filter(|d| usable(*d));
    let behind = || {
      row
        .checked_sub(1)
        .map(|i| origin - self.points[i].position)
        .filter(|d| usable(*d))
    };

    ahead(row + 1)
      .or_else(|| ahead(row + 2))
      .or_else(behind)
      .unwrap_or(Vec3::ZERO)
  }

  fn mark_dirty_from(&mut self, row: usize) {
    self.dirty = true;
    self.low_water = self.low_water.min(row);
  }

  /// Set the strip width. Non-positive or unchanged widths are ignored.
  pub fn set_width(&mut self, width: f32) {
    if width <= 0.0 || width == self.config.width {
      return;
    }
    self.config.width = width;
    self.mark_dirty_from(0);
  }

  pub fn set_color(&mut self, color: Color) {
    if color == self.color {
      return;
    }
    self.color = color;
    self.mark_dirty_from(0);
  }

  // ===========================================================================
  // Accessors
  // ===========================================================================

  #[inline]
  pub fn id(&self) -> RopeId {
    self.id
  }

  #[inline]
  pub fn config(&self) -> &RopeConfig {
    &self.config
  }

  #[inline]
  pub fn width(&self) -> f32 {
    self.config.width
  }

  #[inline]
  pub fn color(&self) -> Color {
    self.color
  }

  #[inline]
  pub fn points(&self) -> &[LinePoint] {
    &self.points
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Committed segments, link segment excluded.
  #[inline]
  pub fn segment_count(&self) -> usize {
    self.points.len().saturating_sub(2)
  }

  #[inline]
  pub fn is_closed(&self) -> bool {
    self.segment_count() >= self.config.sections
  }

  /// Last two samples, the pair a successor is seeded from.
  pub fn tail_pair(&self) -> Option<[LinePoint; 2]> {
    match self.points.as_slice() {
      [.., a, b] => Some([*a, *b]),
      _ => None,
    }
  }

  /// Newest segment (anchor → tail).
  pub fn last_segment(&self) -> Option<Segment> {
    self.segment(self.points.len().checked_sub(2)?)
  }

  /// Segment starting at sample `index`, if the rope has a sample after it.
  pub fn segment(&self, index: usize) -> Option<Segment> {
    Some(Segment {
      a: *self.points.get(index)?,
      b: *self.points.get(index + 1)?,
      id: index as u32,
      rope: self.id,
    })
  }

  /// All segments in order, link segment included.
  pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
    (0..self.points.len().saturating_sub(1)).filter_map(|i| self.segment(i))
  }

  #[inline]
  pub fn predecessor(&self) -> Option<RopeId> {
    self.predecessor
  }

  /// Crossings found from this rope's new segments.
  #[inline]
  pub fn crossings(&self) -> &[Crossing] {
    &self.crossings
  }

  pub(crate) fn record_crossing(&mut self, crossing: Crossing) {
    self.crossings.push(crossing);
  }

  #[inline]
  pub fn mesh(&self) -> &RopeMesh {
    &self.mesh
  }

  #[inline]
  pub fn is_dirty(&self) -> bool {
    self.dirty
  }

  /// First stale sample row.
  #[inline]
  pub fn low_water(&self) -> usize {
    self.low_water
  }

  /// Rows written by the last [`Rope::rebuild`].
  #[inline]
  pub fn last_rebuilt(&self) -> Range<usize> {
    self.last_rebuilt.clone()
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
