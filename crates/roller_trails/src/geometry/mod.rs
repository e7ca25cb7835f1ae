//! Geometry kernels shared by the solvers and the rope builder.
//!
//! - [`bounds`]: `Aabb3` box used by octree nodes and per-triangle bounds
//! - [`ray`]: `Ray` and `Plane` with segment intersection
//! - [`triangle`]: closest point, barycentric coordinates, ray hits

pub mod bounds;
pub mod ray;
pub mod triangle;

pub use bounds::Aabb3;
pub use ray::{Plane, Ray};
pub use triangle::{barycentric, closest_point_on_triangle, interpolate_uv, ray_triangle};
