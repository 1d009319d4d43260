//! `Mesh` struct: shared vertex positions plus indexed polygonal faces

use crate::errors::LodError;
use crate::float_types::{HashMap, Real, parry3d::bounding_volume::Aabb};
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::OnceLock;

pub mod plane;
pub mod shapes;

use plane::Plane;

/// A polygonal face, defined by indices into the owning mesh's vertex array.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Indices into the vertex array, wound counter-clockwise seen from the front
    pub indices: Vec<usize>,

    /// The plane on which this face lies; its normal is the face normal
    pub plane: Plane,
}

impl Face {
    /// Create a face and derive its plane from the referenced positions.
    pub fn new(indices: Vec<usize>, vertices: &[Point3<Real>]) -> Self {
        let points: Vec<Point3<Real>> = indices.iter().map(|&i| vertices[i]).collect();
        let plane = Plane::from_polygon(&points);
        Face { indices, plane }
    }

    /// Create a face that keeps an already known plane, e.g. a piece split off
    /// a larger coplanar face.
    pub const fn with_plane(indices: Vec<usize>, plane: Plane) -> Self {
        Face { indices, plane }
    }

    /// Outward unit normal.
    pub const fn normal(&self) -> Vector3<Real> {
        self.plane.normal()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions in the mesh's local space
    pub vertices: Vec<Point3<Real>>,

    /// Indexed faces
    pub faces: Vec<Face>,

    /// Lazily calculated AABB that spans `vertices`.
    pub bounding_box: OnceLock<Aabb>,
}

impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.faces == other.faces
    }
}

impl Mesh {
    /// Returns a new empty Mesh
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Build a mesh from vertex positions and face index tuples.
    ///
    /// ## Errors
    /// [`LodError::TooFewIndices`] for faces with fewer than 3 corners and
    /// [`LodError::FaceIndexOutOfRange`] for indices past the vertex list.
    pub fn from_indexed(
        vertices: Vec<Point3<Real>>,
        faces: Vec<Vec<usize>>,
    ) -> Result<Self, LodError> {
        for (face, indices) in faces.iter().enumerate() {
            if indices.len() < 3 {
                return Err(LodError::TooFewIndices(face));
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(LodError::FaceIndexOutOfRange {
                    face,
                    index,
                    len: vertices.len(),
                });
            }
        }

        let faces = faces
            .into_iter()
            .map(|indices| Face::new(indices, &vertices))
            .collect();

        Ok(Mesh {
            vertices,
            faces,
            bounding_box: OnceLock::new(),
        })
    }

    /// True when the mesh has neither faces nor vertices.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.vertices.is_empty()
    }

    /// Returns the local-space AABB of all vertices (cached after first call).
    /// An empty mesh reports a zero-sized box at the origin.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut min_x = Real::MAX;
            let mut min_y = Real::MAX;
            let mut min_z = Real::MAX;
            let mut max_x = -Real::MAX;
            let mut max_y = -Real::MAX;
            let mut max_z = -Real::MAX;

            for v in &self.vertices {
                min_x = min_x.min(v.x);
                min_y = min_y.min(v.y);
                min_z = min_z.min(v.z);
                max_x = max_x.max(v.x);
                max_y = max_y.max(v.y);
                max_z = max_z.max(v.z);
            }

            // If still uninitialized (no vertices), return a trivial AABB at origin
            if min_x > max_x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }

            Aabb::new(
                Point3::new(min_x, min_y, min_z),
                Point3::new(max_x, max_y, max_z),
            )
        })
    }

    /// The eight local-space corners of [`Mesh::bounding_box`], in the host's
    /// order: the `-x` face first, then the `+x` face.
    pub fn bound_box(&self) -> [Point3<Real>; 8] {
        let aabb = self.bounding_box();
        let (lo, hi) = (aabb.mins, aabb.maxs);
        [
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(hi.x, hi.y, lo.z),
        ]
    }

    /// Vertex positions mapped through `matrix`.
    pub fn world_vertices(&self, matrix: &Matrix4<Real>) -> Vec<Point3<Real>> {
        self.vertices
            .iter()
            .map(|p| matrix.transform_point(p))
            .collect()
    }

    /// Copy the faces accepted by `face_filter` into a new, compact mesh.
    ///
    /// The predicate receives each face's index and the face. Only vertices
    /// referenced by a kept face survive; they are renumbered densely in order
    /// of first appearance and the kept faces are rewritten through that
    /// mapping. Positions and face planes are copied unchanged. `self` is not
    /// modified.
    pub fn copy_with_face_filter<F>(&self, mut face_filter: F) -> Mesh
    where
        F: FnMut(usize, &Face) -> bool,
    {
        let mut remap: HashMap<usize, usize> = HashMap::default();
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for (i, face) in self.faces.iter().enumerate() {
            if !face_filter(i, face) {
                continue;
            }
            let indices = face
                .indices
                .iter()
                .map(|&old| {
                    *remap.entry(old).or_insert_with(|| {
                        vertices.push(self.vertices[old]);
                        vertices.len() - 1
                    })
                })
                .collect();
            faces.push(Face::with_plane(indices, face.plane));
        }

        Mesh {
            vertices,
            faces,
            bounding_box: OnceLock::new(),
        }
    }
}
