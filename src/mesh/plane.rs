//! Oriented planes, point classification and face splitting.
//!
//! Planes are stored in Hessian normal form `n · p = w` with a unit normal `n`.
//! Splitting follows the classic Sutherland–Hodgman step used for BSP clipping:
//! vertices are classified against the plane and every edge that crosses it gets
//! a new vertex. Those vertices are appended to the mesh's vertex array and shared
//! between adjacent faces through an [`EdgeCacheKey`] cache, so a cut never
//! opens gaps along the edge it crosses.

use crate::float_types::{HashMap, Real, tolerance};
use nalgebra::{Matrix4, Point3, Vector3};

// Plane classification constants
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// Cache key for a vertex inserted where plane `plane` crosses edge `edge`.
///
/// The edge is stored canonically (smaller index first) so both faces sharing
/// the edge resolve to the same inserted vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeCacheKey {
    edge: (usize, usize),
    plane: usize,
}

impl EdgeCacheKey {
    pub const fn new(plane: usize, idx_i: usize, idx_j: usize) -> Self {
        let edge = if idx_i < idx_j {
            (idx_i, idx_j)
        } else {
            (idx_j, idx_i)
        };
        EdgeCacheKey { edge, plane }
    }
}

/// Result of splitting one face by a plane. Either side may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceSplit {
    /// Indices of the part in front of (or coplanar with) the plane
    pub front: Option<Vec<usize>>,
    /// Indices of the part behind the plane
    pub back: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Default for Plane {
    fn default() -> Self {
        Plane {
            normal: Vector3::z(),
            w: 0.0,
        }
    }
}

impl Plane {
    /// Create a plane from a normal (need not be unit) and the offset measured
    /// along that same normal. Both are rescaled so the stored normal is unit.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len < Real::EPSILON {
            return Plane::default();
        }
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Plane through `point` with the given normal.
    pub fn through_point(normal: Vector3<Real>, point: &Point3<Real>) -> Option<Self> {
        let len = normal.norm();
        if len < Real::EPSILON {
            return None;
        }
        let normal = normal / len;
        Some(Plane {
            normal,
            w: normal.dot(&point.coords),
        })
    }

    /// Best-fit plane of a polygon using Newell's method.
    ///
    /// Robust for quads that are slightly non-planar and for polygons whose
    /// first three corners happen to be collinear. Degenerate input yields +Z.
    pub fn from_polygon(points: &[Point3<Real>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Plane::default();
        }

        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for i in 0..n {
            let a = &points[i];
            let b = &points[(i + 1) % n];
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
            centroid += a.coords;
        }
        centroid /= n as Real;

        if normal.norm_squared() < Real::EPSILON * Real::EPSILON {
            return Plane::default();
        }
        let normal = normal.normalize();
        Plane {
            normal,
            w: normal.dot(&centroid),
        }
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point`; positive in front.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`] within [`tolerance`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let d = self.signed_distance(point);
        if d > tolerance() {
            FRONT
        } else if d < -tolerance() {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Express this world-space plane in the local space of an instance whose
    /// local→world transform is `local_to_world`.
    ///
    /// With `p_world = A·p + t` the plane `n·p_world = w` becomes
    /// `(Aᵀn)·p = w - n·t`. Returns `None` when `A` collapses the normal.
    pub fn to_local(&self, local_to_world: &Matrix4<Real>) -> Option<Self> {
        let linear = local_to_world.fixed_view::<3, 3>(0, 0);
        let translation = local_to_world.fixed_view::<3, 1>(0, 3);
        let normal = linear.transpose() * self.normal;
        let len = normal.norm();
        if len < Real::EPSILON {
            return None;
        }
        let w = self.w - self.normal.dot(&translation);
        Some(Plane {
            normal: normal / len,
            w: w / len,
        })
    }

    /// Splits the polygon `indices` by this plane.
    ///
    /// Coplanar polygons count as front. Spanning polygons get a new vertex on
    /// each crossing edge; `plane_id` identifies this plane in `cache` so the
    /// neighbouring face reuses the same vertex.
    pub fn split_face(
        &self,
        plane_id: usize,
        indices: &[usize],
        vertices: &mut Vec<Point3<Real>>,
        cache: &mut HashMap<EdgeCacheKey, usize>,
    ) -> FaceSplit {
        let types: Vec<i8> = indices
            .iter()
            .map(|&idx| self.orient_point(&vertices[idx]))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR | FRONT => FaceSplit {
                front: Some(indices.to_vec()),
                back: None,
            },
            BACK => FaceSplit {
                front: None,
                back: Some(indices.to_vec()),
            },
            _ => {
                let mut split_front = Vec::with_capacity(indices.len() + 1);
                let mut split_back = Vec::with_capacity(indices.len() + 1);

                for i in 0..indices.len() {
                    let j = (i + 1) % indices.len();
                    let (type_i, type_j) = (types[i], types[j]);
                    let (idx_i, idx_j) = (indices[i], indices[j]);

                    if type_i != BACK {
                        split_front.push(idx_i);
                    }
                    if type_i != FRONT {
                        split_back.push(idx_i);
                    }

                    if (type_i | type_j) == SPANNING {
                        let key = EdgeCacheKey::new(plane_id, idx_i, idx_j);
                        let new_idx = match cache.get(&key) {
                            Some(&existing) => existing,
                            None => {
                                let (a, b) = key.edge;
                                let (pa, pb) = (vertices[a], vertices[b]);
                                let denom = self.normal.dot(&(pb - pa));
                                // Spanning edges have endpoints on opposite sides, so denom != 0
                                let t = (self.w - self.normal.dot(&pa.coords)) / denom;
                                vertices.push(pa + (pb - pa) * t);
                                let idx = vertices.len() - 1;
                                cache.insert(key, idx);
                                idx
                            },
                        };
                        split_front.push(new_idx);
                        split_back.push(new_idx);
                    }
                }

                FaceSplit {
                    front: (split_front.len() >= 3).then_some(split_front),
                    back: (split_back.len() >= 3).then_some(split_back),
                }
            },
        }
    }
}
