//! The LOD proxy: a unit cube stretched over a bounding box

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::Mesh;
use crate::scene::{DisplayType, MeshInstance};
use nalgebra::{Matrix4, Translation3, Vector3};

/// Local→world transform that maps the ±1 unit cube onto `aabb`.
///
/// Built as translate-to-center followed by three independent axis-aligned
/// scales (x, then y, then z), each post-multiplied, so the cube stays aligned
/// with the world axes.
pub fn proxy_transform(aabb: &Aabb) -> Matrix4<Real> {
    let width = aabb.maxs.x - aabb.mins.x;
    let depth = aabb.maxs.y - aabb.mins.y;
    let height = aabb.maxs.z - aabb.mins.z;
    let center = Vector3::new(
        aabb.mins.x + width / 2.0,
        aabb.mins.y + depth / 2.0,
        aabb.mins.z + height / 2.0,
    );

    let mut matrix = Translation3::from(center).to_homogeneous();
    matrix *= Matrix4::new_nonuniform_scaling(&Vector3::new(width / 2.0, 1.0, 1.0));
    matrix *= Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, depth / 2.0, 1.0));
    matrix *= Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, height / 2.0));
    matrix
}

/// Wireframe, render-hidden unit cube instance named `name`, fitted to `aabb`.
pub fn build_proxy(aabb: &Aabb, name: &str) -> MeshInstance {
    MeshInstance {
        name: name.to_string(),
        mesh: Mesh::unit_cube(),
        transform: proxy_transform(aabb),
        hide_render: true,
        display: DisplayType::Wire,
    }
}
