//! Test support library
//! Deterministic random transforms, box meshes and scene helpers for the
//! integration tests.
#![allow(dead_code)]

use b4b_lod::{
    float_types::Real,
    mesh::{
        Mesh,
        shapes::{UNIT_CUBE_FACES, UNIT_CUBE_VERTICES},
    },
    scene::{Camera, MeshInstance, Projection, Scene, WorkingCollection},
};
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

/// Small xorshift generator so every run sees the same "random" cases.
pub struct XorShift(u64);

impl XorShift {
    pub const fn new(seed: u64) -> Self {
        // spread small seeds over the whole state
        XorShift(seed.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1)
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: Real, hi: Real) -> Real {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit as Real
    }

    /// Uniform in `0..n`.
    pub fn index(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    pub fn coin(&mut self) -> bool {
        self.next_u64() & 1 == 1
    }

    pub fn vector(&mut self, lo: Real, hi: Real) -> Vector3<Real> {
        Vector3::new(self.range(lo, hi), self.range(lo, hi), self.range(lo, hi))
    }
}

pub fn random_rotation(rng: &mut XorShift) -> Matrix4<Real> {
    let axis = Unit::try_new(rng.vector(-1.0, 1.0), 1e-3).unwrap_or(Vector3::z_axis());
    let angle = rng.range(0.0, std::f64::consts::TAU as Real);
    Rotation3::from_axis_angle(&axis, angle).to_homogeneous()
}

/// Translation · rotation · positive non-uniform scale.
pub fn random_transform(rng: &mut XorShift) -> Matrix4<Real> {
    let scale = Matrix4::new_nonuniform_scaling(&rng.vector(0.2, 3.0));
    Matrix4::new_translation(&rng.vector(-10.0, 10.0)) * random_rotation(rng) * scale
}

/// Axis-aligned box mesh spanning `lo..hi` in local space.
pub fn box_mesh(lo: Point3<Real>, hi: Point3<Real>) -> Mesh {
    let center = Point3::from((lo.coords + hi.coords) / 2.0);
    let half = (hi - lo) / 2.0;
    let vertices = UNIT_CUBE_VERTICES
        .iter()
        .map(|c| center + Vector3::new(c[0] * half.x, c[1] * half.y, c[2] * half.z))
        .collect();
    let faces = UNIT_CUBE_FACES.iter().map(|f| f.to_vec()).collect();
    Mesh::from_indexed(vertices, faces).unwrap()
}

pub fn random_box(rng: &mut XorShift) -> Mesh {
    let lo = Point3::from(rng.vector(-3.0, 0.0));
    let hi = lo + rng.vector(0.1, 4.0);
    box_mesh(lo, hi)
}

/// Mesh over a random vertex pool; some vertices are left unreferenced and
/// faces may share vertices freely.
pub fn random_mesh(rng: &mut XorShift) -> Mesh {
    let vertex_count = 4 + rng.index(20);
    let vertices: Vec<Point3<Real>> = (0..vertex_count)
        .map(|_| Point3::from(rng.vector(-5.0, 5.0)))
        .collect();
    let faces = (0..1 + rng.index(12))
        .map(|_| (0..3 + rng.index(3)).map(|_| rng.index(vertex_count)).collect())
        .collect();
    Mesh::from_indexed(vertices, faces).unwrap()
}

/// Min and max over every vertex of every mesh, mapped through its transform.
pub fn brute_force_bounds(instances: &[(Mesh, Matrix4<Real>)]) -> (Point3<Real>, Point3<Real>) {
    let mut lo = Point3::from(Vector3::repeat(Real::INFINITY));
    let mut hi = Point3::from(Vector3::repeat(Real::NEG_INFINITY));
    for (mesh, matrix) in instances {
        for v in &mesh.vertices {
            let p = matrix.transform_point(v);
            for axis in 0..3 {
                lo[axis] = lo[axis].min(p[axis]);
                hi[axis] = hi[axis].max(p[axis]);
            }
        }
    }
    (lo, hi)
}

/// Orthographic camera at `eye` looking at `target`, `scale` wide.
pub fn ortho_camera(eye: Point3<Real>, target: Point3<Real>, scale: Real) -> Camera {
    Camera::look_at(&eye, &target, &up_for(&eye, &target), Projection::Orthographic { scale })
}

pub fn perspective_camera(eye: Point3<Real>, target: Point3<Real>, fov_y: Real) -> Camera {
    Camera::look_at(&eye, &target, &up_for(&eye, &target), Projection::Perspective { fov_y })
}

fn up_for(eye: &Point3<Real>, target: &Point3<Real>) -> Vector3<Real> {
    let dir = (target - eye).normalize();
    if dir.cross(&Vector3::z()).norm() < 1e-3 {
        Vector3::y()
    } else {
        Vector3::z()
    }
}

/// Scene with an active view through `camera` and one solid unit cube.
pub fn cube_scene(camera: Camera) -> Scene {
    let mut scene = Scene::with_camera(camera);
    scene.link(MeshInstance::new("cube", Mesh::unit_cube()));
    scene
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("b4b_lod_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
