//! Core data types shared by the index, the solvers and the rope builder.

use glam::{Affine3A, Vec2, Vec3};

use crate::error::{EngineError, EngineResult};
use crate::geometry::Aabb3;

// =============================================================================
// Mesh input
// =============================================================================

/// One triangle of a [`SurfaceMesh`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
  /// Counter-clockwise vertex indices.
  pub indices: [u32; 3],

  /// Unit face normal.
  pub normal: Vec3,

  /// Optional per-corner texture coordinates.
  pub uvs: Option<[Vec2; 3]>,
}

/// Static triangulated surface the engine indexes.
///
/// Vertices are shared between faces. Indices are validated on construction,
/// so every accessor may index the vertex array directly.
#[derive(Clone, Debug, Default)]
pub struct SurfaceMesh {
  vertices: Vec<Vec3>,
  faces: Vec<Face>,
}

impl SurfaceMesh {
  /// Build a mesh from positions and index triples, computing face normals.
  ///
  /// Fails with [`EngineError::InvalidMesh`] when a triple points past the
  /// vertex array.
  pub fn new(vertices: Vec<Vec3>, triangles: &[[u32; 3]]) -> EngineResult<Self> {
    let mut faces = Vec::with_capacity(triangles.len());

    for (face, &indices) in triangles.iter().enumerate() {
      for vertex in indices {
        if vertex as usize >= vertices.len() {
          return Err(EngineError::InvalidMesh {
            face,
            vertex,
            vertex_count: vertices.len(),
          });
        }
      }

      let [a, b, c] = indices.map(|i| vertices[i as usize]);
      faces.push(Face {
        indices,
        normal: face_normal(a, b, c),
        uvs: None,
      });
    }

    Ok(Self { vertices, faces })
  }

  /// Attach per-face UV triples. Extra entries are ignored, missing ones leave
  /// the face without UVs.
  pub fn with_uvs(mut self, uvs: &[[Vec2; 3]]) -> Self {
    for (face, uv) in self.faces.iter_mut().zip(uvs) {
      face.uvs = Some(*uv);
    }
    self
  }

  /// Apply `transform` to every vertex; normals follow the linear part and are
  /// renormalised.
  pub fn transform(&mut self, transform: &Affine3A) {
    for v in &mut self.vertices {
      *v = transform.transform_point3(*v);
    }
    for face in &mut self.faces {
      face.normal = transform.transform_vector3(face.normal).normalize_or_zero();
    }
  }

  #[inline]
  pub fn vertices(&self) -> &[Vec3] {
    &self.vertices
  }

  #[inline]
  pub fn faces(&self) -> &[Face] {
    &self.faces
  }

  /// Number of faces.
  #[inline]
  pub fn face_count(&self) -> usize {
    self.faces.len()
  }

  /// Returns true if the mesh has no faces.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.faces.is_empty()
  }

  /// Corner positions of a face.
  #[inline]
  pub fn corners(&self, indices: [u32; 3]) -> [Vec3; 3] {
    indices.map(|i| self.vertices[i as usize])
  }

  /// Reference record for face `face_index`.
  pub fn triangle_ref(&self, face_index: usize) -> TriangleRef {
    let face = &self.faces[face_index];
    TriangleRef {
      indices: face.indices,
      normal: face.normal,
      face_index: face_index as u32,
    }
  }

  /// Bounds of every vertex referenced by a face.
  pub fn bounds(&self) -> Aabb3 {
    let mut aabb = Aabb3::EMPTY;
    for face in &self.faces {
      for p in self.corners(face.indices) {
        aabb.encapsulate(p);
      }
    }
    aabb
  }
}

/// Counter-clockwise face normal, zero for degenerate triangles.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  (b - a).cross(c - a).normalize_or_zero()
}

/// Index triple, normal and stable index of one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleRef {
  pub indices: [u32; 3],
  pub normal: Vec3,
  pub face_index: u32,
}

// =============================================================================
// Rope samples and render output
// =============================================================================

/// Position and surface normal, always carried together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePoint {
  pub position: Vec3,
  pub normal: Vec3,
}

impl LinePoint {
  pub const fn new(position: Vec3, normal: Vec3) -> Self {
    Self { position, normal }
  }

  #[inline]
  pub fn distance(&self, other: &LinePoint) -> f32 {
    self.position.distance(other.position)
  }

  #[inline]
  pub fn abs_diff_eq(&self, other: &LinePoint, max_abs_diff: f32) -> bool {
    self.position.abs_diff_eq(other.position, max_abs_diff)
      && self.normal.abs_diff_eq(other.normal, max_abs_diff)
  }
}

/// Linear RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
  pub r: f32,
  pub g: f32,
  pub b: f32,
  pub a: f32,
}

impl Color {
  pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

  pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
    Self { r, g, b, a: 1.0 }
  }

  /// Opaque colour from `0xRRGGBB`.
  pub fn from_hex(hex: u32) -> Self {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Self::rgb(channel(16), channel(8), channel(0))
  }

  #[inline]
  pub fn to_array(self) -> [f32; 4] {
    [self.r, self.g, self.b, self.a]
  }
}

impl Default for Color {
  fn default() -> Self {
    Self::WHITE
  }
}

/// Ribbon vertex as consumed by the renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RopeVertex {
  /// World-space position.
  pub position: [f32; 3],

  /// Surface normal (unit vector).
  pub normal: [f32; 3],

  /// Linear RGBA.
  pub color: [f32; 4],
}

impl Default for RopeVertex {
  fn default() -> Self {
    Self {
      position: [0.0; 3],
      normal: [0.0, 1.0, 0.0],
      color: [1.0; 4],
    }
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
