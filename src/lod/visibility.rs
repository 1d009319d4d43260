//! Camera-facing face selection

use crate::float_types::Real;
use crate::mesh::{Face, Mesh};
use crate::scene::Camera;
use nalgebra::{Matrix3, Matrix4, Vector3};

/// Direction from the camera into the scene: the world-space offset from the
/// camera's position to the point one unit in front of it.
pub fn view_direction(camera: &Camera) -> Vector3<Real> {
    camera.forward_point() - camera.position()
}

/// Express a world-space `direction` in the local space of an instance, up to
/// a positive factor.
///
/// With `A` the linear part of `local_to_world`, local normals reach world
/// space through `A⁻ᵀ`, so `n · A⁻¹d` has the sign of the world-space test.
/// `A⁻¹` is the cofactor matrix (columns `a₂×a₃`, `a₃×a₁`, `a₁×a₂`)
/// transposed and divided by `det(A)`; only the sign of the determinant is
/// kept. That stays defined for flattened transforms: a zero-height LOD keeps
/// its top and bottom faces and loses its sides.
pub fn local_view_direction(
    local_to_world: &Matrix4<Real>,
    direction: &Vector3<Real>,
) -> Vector3<Real> {
    let a1 = local_to_world.fixed_view::<3, 1>(0, 0).into_owned();
    let a2 = local_to_world.fixed_view::<3, 1>(0, 1).into_owned();
    let a3 = local_to_world.fixed_view::<3, 1>(0, 2).into_owned();
    let cofactor = Matrix3::from_columns(&[a2.cross(&a3), a3.cross(&a1), a1.cross(&a2)]);
    let local = cofactor.transpose() * direction;
    if a1.dot(&a2.cross(&a3)) < 0.0 { -local } else { local }
}

/// A face is visible when its outward normal points back toward the camera.
/// Faces seen exactly edge-on are not.
pub fn is_front_facing(face: &Face, view_direction: &Vector3<Real>) -> bool {
    face.normal().dot(view_direction) < 0.0
}

/// New mesh holding only the faces of `mesh` that face the camera, with the
/// referenced vertices re-indexed densely. `mesh` itself is left untouched.
pub fn filter_visible(mesh: &Mesh, view_direction: &Vector3<Real>) -> Mesh {
    mesh.copy_with_face_filter(|_, face| is_front_facing(face, view_direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Projection;
    use nalgebra::Point3;

    #[test]
    fn unit_cube_seen_from_a_corner_shows_three_faces() {
        let cube = Mesh::unit_cube();
        let visible = filter_visible(&cube, &Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(visible.faces.len(), 3);
        // the three faces meet in the (1, 1, 1) corner and span 7 vertices
        assert_eq!(visible.vertices.len(), 7);
        assert!(!visible.vertices.contains(&Point3::new(-1.0, -1.0, -1.0)));
    }

    #[test]
    fn axis_view_drops_side_faces() {
        let cube = Mesh::unit_cube();
        let visible = filter_visible(&cube, &Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(visible.faces.len(), 1);
        assert_eq!(visible.faces[0].normal(), Vector3::z());
        assert_eq!(visible.vertices.len(), 4);
    }

    #[test]
    fn view_direction_follows_camera_orientation() {
        let camera = Camera::look_at(
            &Point3::new(3.0, 0.0, 0.0),
            &Point3::origin(),
            &Vector3::z(),
            Projection::Orthographic { scale: 2.0 },
        );
        let d = view_direction(&camera);
        assert!((d - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn flattened_transform_keeps_caps() {
        let flat = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 3.0, 0.0));
        let local = local_view_direction(&flat, &Vector3::new(0.3, -0.2, -1.0));
        assert_eq!(local, Vector3::new(0.0, 0.0, -6.0));

        let visible = filter_visible(&Mesh::unit_cube(), &local);
        assert_eq!(visible.faces.len(), 1);
        assert_eq!(visible.faces[0].normal(), Vector3::z());
    }

    #[test]
    fn matches_inverse_for_invertible_transforms() {
        let m = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0))
            * nalgebra::Rotation3::from_euler_angles(0.4, 0.1, -0.9).to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&Vector3::new(0.5, 2.0, 1.5));
        let d = Vector3::new(-0.3, 0.8, -0.5);
        let inverse = m.fixed_view::<3, 3>(0, 0).into_owned().try_inverse().unwrap() * d;
        let local = local_view_direction(&m, &d);
        // same direction, scaled by |det(A)|
        assert!((local.normalize() - inverse.normalize()).norm() < 1e-9);
    }

    #[test]
    fn mirrored_transform_follows_world_winding() {
        // the mirrored +z face sits at world z = -1, facing a camera that looks up
        let mirror = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, -1.0));
        let local = local_view_direction(&mirror, &Vector3::new(0.0, 0.0, 1.0));
        let visible = filter_visible(&Mesh::unit_cube(), &local);
        assert_eq!(visible.faces.len(), 1);
        assert_eq!(visible.faces[0].normal(), Vector3::z());
    }
}
