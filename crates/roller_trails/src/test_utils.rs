//! Mesh fixtures shared by unit tests.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::types::SurfaceMesh;

/// Flat square in the XZ plane, `[-half, half]²`, two triangles facing +Y.
pub fn flat_square(half: f32) -> SurfaceMesh {
  SurfaceMesh::new(
    vec![
      Vec3::new(-half, 0.0, -half),
      Vec3::new(-half, 0.0, half),
      Vec3::new(half, 0.0, half),
      Vec3::new(half, 0.0, -half),
    ],
    &[[0, 1, 2], [0, 2, 3]],
  )
  .expect("Square indices are valid")
  .with_uvs(&[
    [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)],
    [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)],
  ])
}

/// Single triangle facing +Y.
pub fn single_triangle() -> SurfaceMesh {
  SurfaceMesh::new(
    vec![
      Vec3::new(0.0, 0.0, 0.0),
      Vec3::new(0.0, 0.0, 1.0),
      Vec3::new(1.0, 0.0, 0.0),
    ],
    &[[0, 1, 2]],
  )
  .expect("Triangle indices are valid")
}

/// `cells × cells` grid over `[-size/2, size/2]²` with height `h(x, z)`.
pub fn heightfield(cells: u32, size: f32, h: impl Fn(f32, f32) -> f32) -> SurfaceMesh {
  let stride = cells + 1;
  let step = size / cells as f32;
  let origin = -size * 0.5;

  let mut vertices = Vec::with_capacity((stride * stride) as usize);
  for iz in 0..stride {
    for ix in 0..stride {
      let x = origin + ix as f32 * step;
      let z = origin + iz as f32 * step;
      vertices.push(Vec3::new(x, h(x, z), z));
    }
  }

  let mut triangles = Vec::with_capacity((cells * cells * 2) as usize);
  for iz in 0..cells {
    for ix in 0..cells {
      let i0 = iz * stride + ix;
      let i1 = i0 + 1;
      let i2 = i0 + stride;
      let i3 = i2 + 1;
      triangles.push([i0, i2, i1]);
      triangles.push([i1, i2, i3]);
    }
  }

  SurfaceMesh::new(vertices, &triangles).expect("Grid indices are valid")
}

/// Gently rolling terrain used by agreement tests.
pub fn hills(cells: u32, size: f32) -> SurfaceMesh {
  heightfield(cells, size, |x, z| (x * 1.3).sin() * 0.4 + (z * 0.7).cos() * 0.3)
}

/// Latitude/longitude sphere with outward normals.
pub fn uv_sphere(radius: f32, rings: u32, segments: u32) -> SurfaceMesh {
  let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
  for r in 0..=rings {
    let phi = PI * r as f32 / rings as f32;
    for s in 0..=segments {
      let theta = TAU * s as f32 / segments as f32;
      vertices.push(Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
      ));
    }
  }

  let stride = segments + 1;
  let mut triangles = Vec::new();
  for r in 0..rings {
    for s in 0..segments {
      let i0 = r * stride + s;
      let i1 = i0 + 1;
      let i2 = i0 + stride;
      let i3 = i2 + 1;
      if r != 0 {
        triangles.push([i0, i1, i2]);
      }
      if r != rings - 1 {
        triangles.push([i1, i3, i2]);
      }
    }
  }

  SurfaceMesh::new(vertices, &triangles).expect("Sphere indices are valid")
}
