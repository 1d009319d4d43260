//! World-space bounds of a set of placed meshes

use crate::errors::LodError;
use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::mesh::Mesh;
use nalgebra::{Matrix4, Point3};

/// Smallest axis-aligned box enclosing every instance.
///
/// Each mesh contributes the eight corners of its own local bounding box
/// ([`Mesh::bound_box`]) mapped through its world transform; the result is the
/// running min/max over all those corners.
///
/// ## Errors
/// [`LodError::EmptyInput`] if `instances` yields nothing.
///
/// ## Example
/// ```
/// # use b4b_lod::{lod::compute_bounds, mesh::Mesh};
/// # use nalgebra::{Matrix4, Vector3};
/// let cube = Mesh::unit_cube();
/// let moved = Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0));
/// let aabb = compute_bounds([(&cube, &Matrix4::identity()), (&cube, &moved)]).unwrap();
/// assert_eq!(aabb.mins.x, -1.0);
/// assert_eq!(aabb.maxs.x, 6.0);
/// ```
pub fn compute_bounds<'a, I>(instances: I) -> Result<Aabb, LodError>
where
    I: IntoIterator<Item = (&'a Mesh, &'a Matrix4<Real>)>,
{
    let mut bounds: Option<(Point3<Real>, Point3<Real>)> = None;

    for (mesh, matrix) in instances {
        for corner in mesh.bound_box() {
            let p = matrix.transform_point(&corner);
            bounds = Some(match bounds {
                None => (p, p),
                Some((lo, hi)) => (lo.inf(&p), hi.sup(&p)),
            });
        }
    }

    let (mins, maxs) = bounds.ok_or(LodError::EmptyInput)?;
    Ok(Aabb::new(mins, maxs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Vector3};

    #[test]
    fn empty_input_is_an_error() {
        let none: Vec<(&Mesh, &Matrix4<Real>)> = Vec::new();
        assert!(matches!(compute_bounds(none), Err(LodError::EmptyInput)));
    }

    #[test]
    fn rotation_uses_transformed_local_corners() {
        // a 2x2x2 cube rotated 45° about z: its local box corners reach sqrt(2)
        let cube = Mesh::unit_cube();
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_4 as Real)
            .to_homogeneous();
        let aabb = compute_bounds([(&cube, &rot)]).unwrap();
        let r = (2.0 as Real).sqrt();
        assert!((aabb.maxs.x - r).abs() < 1e-6);
        assert!((aabb.mins.y + r).abs() < 1e-6);
        assert!((aabb.maxs.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn flat_mesh_gives_degenerate_box() {
        let quad = Mesh::from_indexed(
            vec![
                Point3::new(0.0, 0.0, 2.0),
                Point3::new(1.0, 0.0, 2.0),
                Point3::new(1.0, 1.0, 2.0),
                Point3::new(0.0, 1.0, 2.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
        .unwrap();
        let aabb = compute_bounds([(&quad, &Matrix4::identity())]).unwrap();
        assert_eq!(aabb.mins.z, aabb.maxs.z);
        assert_eq!(aabb.maxs.x, 1.0);
    }
}
