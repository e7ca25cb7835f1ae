//! Triangle kernels: closest point, barycentric coordinates and ray hits.

use glam::{Vec2, Vec3};

use super::Ray;
use crate::constants::GEOMETRY_EPSILON;

/// Closest point on triangle `abc` to `p`.
///
/// Clamped barycentric region test from "Real-Time Collision Detection"
/// (Ericson, 5.1.5). Degenerate triangles fall through to one of the vertex or
/// edge regions and still return a point on the triangle's hull.
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  let ab = b - a;
  let ac = c - a;
  let ap = p - a;

  let d1 = ab.dot(ap);
  let d2 = ac.dot(ap);

  // Vertex region outside A
  if d1 <= 0.0 && d2 <= 0.0 {
    return a;
  }

  // Vertex region outside B
  let bp = p - b;
  let d3 = ab.dot(bp);
  let d4 = ac.dot(bp);
  if d3 >= 0.0 && d4 <= d3 {
    return b;
  }

  // Edge region AB
  let vc = d1 * d4 - d3 * d2;
  if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
    let v = d1 / (d1 - d3);
    return a + ab * v;
  }

  // Vertex region outside C
  let cp = p - c;
  let d5 = ab.dot(cp);
  let d6 = ac.dot(cp);
  if d6 >= 0.0 && d5 <= d6 {
    return c;
  }

  // Edge region AC
  let vb = d5 * d2 - d1 * d6;
  if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
    let w = d2 / (d2 - d6);
    return a + ac * w;
  }

  // Edge region BC
  let va = d3 * d6 - d5 * d4;
  if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
    let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
    return b + (c - b) * w;
  }

  // Face region
  let denom = va + vb + vc;
  if denom.abs() <= f32::EPSILON {
    return a;
  }
  let inv = 1.0 / denom;
  a + ab * (vb * inv) + ac * (vc * inv)
}

/// Barycentric weights `(u, v, w)` of `p` with respect to `abc`,
/// `p ≈ u·a + v·b + w·c`. Degenerate triangles weight vertex `a` fully.
pub fn barycentric(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  let v0 = b - a;
  let v1 = c - a;
  let v2 = p - a;

  let d00 = v0.dot(v0);
  let d01 = v0.dot(v1);
  let d11 = v1.dot(v1);
  let d20 = v2.dot(v0);
  let d21 = v2.dot(v1);

  let denom = d00 * d11 - d01 * d01;
  if denom.abs() <= f32::EPSILON {
    return Vec3::X;
  }

  let v = (d11 * d20 - d01 * d21) / denom;
  let w = (d00 * d21 - d01 * d20) / denom;
  Vec3::new(1.0 - v - w, v, w)
}

/// Interpolate per-vertex UVs at `p` on triangle `abc`.
pub fn interpolate_uv(p: Vec3, a: Vec3, b: Vec3, c: Vec3, uvs: &[Vec2; 3]) -> Vec2 {
  let w = barycentric(p, a, b, c);
  uvs[0] * w.x + uvs[1] * w.y + uvs[2] * w.z
}

/// Möller–Trumbore ray/triangle test without back-face culling.
///
/// Returns the ray parameter `t >= 0` of the hit.
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
  let edge1 = b - a;
  let edge2 = c - a;
  let pvec = ray.direction.cross(edge2);
  let det = edge1.dot(pvec);

  if det.abs() < GEOMETRY_EPSILON {
    return None;
  }

  let inv_det = 1.0 / det;
  let tvec = ray.origin - a;
  let u = tvec.dot(pvec) * inv_det;
  if !(0.0..=1.0).contains(&u) {
    return None;
  }

  let qvec = tvec.cross(edge1);
  let v = ray.direction.dot(qvec) * inv_det;
  if v < 0.0 || u + v > 1.0 {
    return None;
  }

  let t = edge2.dot(qvec) * inv_det;
  if t < 0.0 {
    return None;
  }

  Some(t)
}

#[cfg(test)]
#[path = "triangle_test.rs"]
mod triangle_test;
