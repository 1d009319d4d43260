//! Render canvas tiling.
//!
//! A render is split into a `rows × cols` grid of tiles. Each tile is a planar
//! quad one unit in front of the camera, covering its cell of the image; the
//! tile slicer projects these outlines onto the LOD.

use crate::errors::LodError;
use crate::float_types::Real;
use crate::scene::{Camera, Projection};
use nalgebra::Point3;

/// A planar quad in world space, corners in order around its boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad3D {
    pub corners: [Point3<Real>; 4],
}

impl Quad3D {
    pub const fn new(corners: [Point3<Real>; 4]) -> Self {
        Quad3D { corners }
    }

    pub fn centroid(&self) -> Point3<Real> {
        let sum = self
            .corners
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, c| acc + c.coords);
        Point3::from(sum / 4.0)
    }

    /// The four boundary edges, closing back to the first corner.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<Real>, Point3<Real>)> + '_ {
        (0..4).map(move |i| (self.corners[i], self.corners[(i + 1) % 4]))
    }
}

/// Grid layout of the output image. Both dimensions are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    rows: usize,
    cols: usize,
}

impl Canvas {
    /// ## Errors
    /// [`LodError::EmptyCanvas`] when `rows` or `cols` is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self, LodError> {
        if rows == 0 || cols == 0 {
            return Err(LodError::EmptyCanvas { rows, cols });
        }
        Ok(Canvas { rows, cols })
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Half width and half height of the image at unit distance from the camera.
    fn half_extents(camera: &Camera) -> (Real, Real) {
        match camera.projection {
            Projection::Orthographic { scale } => {
                let half = scale / 2.0;
                if camera.aspect >= 1.0 {
                    (half, half / camera.aspect)
                } else {
                    (half * camera.aspect, half)
                }
            },
            Projection::Perspective { fov_y } => {
                let half_h = (fov_y / 2.0).tan();
                (half_h * camera.aspect, half_h)
            },
        }
    }

    /// Tile at `row` (0 = top) and `col` (0 = left), wound counter-clockwise
    /// as seen from the camera.
    pub fn tile(&self, camera: &Camera, row: usize, col: usize) -> Quad3D {
        let (hw, hh) = Self::half_extents(camera);
        let cell_w = 2.0 * hw / self.cols as Real;
        let cell_h = 2.0 * hh / self.rows as Real;

        let x0 = -hw + col as Real * cell_w;
        let x1 = x0 + cell_w;
        let y1 = hh - row as Real * cell_h;
        let y0 = y1 - cell_h;

        let to_world = |x: Real, y: Real| camera.transform.transform_point(&Point3::new(x, y, -1.0));
        Quad3D::new([to_world(x0, y0), to_world(x1, y0), to_world(x1, y1), to_world(x0, y1)])
    }

    /// All tiles in row-major order.
    pub fn tiles(&self, camera: &Camera) -> Vec<Quad3D> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .map(|(row, col)| self.tile(camera, row, col))
            .collect()
    }
}
