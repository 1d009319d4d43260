//! Canonical local-space shapes

use crate::float_types::Real;
use crate::mesh::{Face, Mesh};
use nalgebra::Point3;
use std::sync::OnceLock;

/// Corners of the unit cube spanning `[-1, 1]` on every axis.
pub const UNIT_CUBE_VERTICES: [[Real; 3]; 8] = [
    [1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Quads of the unit cube, wound so every normal points outward:
/// `-z`, `+z`, `+x`, `-y`, `-x`, `+y`.
pub const UNIT_CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 7, 6, 5],
    [0, 4, 5, 1],
    [1, 5, 6, 2],
    [2, 6, 7, 3],
    [4, 0, 3, 7],
];

impl Mesh {
    /// The unit cube built from [`UNIT_CUBE_VERTICES`] and [`UNIT_CUBE_FACES`].
    ///
    /// ## Example
    /// ```
    /// use b4b_lod::mesh::Mesh;
    /// let cube = Mesh::unit_cube();
    /// assert_eq!(cube.vertices.len(), 8);
    /// assert_eq!(cube.faces.len(), 6);
    /// ```
    pub fn unit_cube() -> Mesh {
        let vertices: Vec<Point3<Real>> = UNIT_CUBE_VERTICES
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();
        let faces = UNIT_CUBE_FACES
            .iter()
            .map(|quad| Face::new(quad.to_vec(), &vertices))
            .collect();

        Mesh {
            vertices,
            faces,
            bounding_box: OnceLock::new(),
        }
    }
}
