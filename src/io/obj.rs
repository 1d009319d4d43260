//! Wavefront OBJ export

use crate::errors::LodError;
use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::scene::{MeshInstance, WorkingCollection};
use log::info;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A signed principal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "X")]
    X,
    #[serde(rename = "Y")]
    Y,
    #[serde(rename = "Z")]
    Z,
    #[serde(rename = "-X")]
    NegX,
    #[serde(rename = "-Y")]
    NegY,
    #[serde(rename = "-Z")]
    NegZ,
}

impl Axis {
    pub fn vector(self) -> Vector3<Real> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
            Axis::NegX => -Vector3::x(),
            Axis::NegY => -Vector3::y(),
            Axis::NegZ => -Vector3::z(),
        }
    }

    const fn principal(self) -> usize {
        match self {
            Axis::X | Axis::NegX => 0,
            Axis::Y | Axis::NegY => 1,
            Axis::Z | Axis::NegZ => 2,
        }
    }
}

/// Which file axes the scene's forward (`+Y`) and up (`+Z`) directions are
/// written along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConvention {
    pub forward: Axis,
    pub up: Axis,
}

impl Default for AxisConvention {
    /// The scene's own frame: forward `Y`, up `Z`.
    fn default() -> Self {
        AxisConvention {
            forward: Axis::Y,
            up: Axis::Z,
        }
    }
}

impl AxisConvention {
    /// Rotation taking scene coordinates to file coordinates.
    ///
    /// ## Errors
    /// [`LodError::InvalidAxes`] if forward and up share a principal axis.
    pub fn matrix(&self) -> Result<Matrix4<Real>, LodError> {
        if self.forward.principal() == self.up.principal() {
            return Err(LodError::InvalidAxes {
                forward: self.forward,
                up: self.up,
            });
        }
        let forward = self.forward.vector();
        let up = self.up.vector();
        // scene X = Y × Z, so it must map to forward × up
        let right = forward.cross(&up);
        Ok(Matrix3::from_columns(&[right, forward, up]).to_homogeneous())
    }
}

/// Render `instance` as OBJ text in world space under `axes`.
///
/// Vertices are written once, each face gets its own flat normal.
///
/// ```
/// # use b4b_lod::{io::obj::{to_obj, AxisConvention}, mesh::Mesh, scene::MeshInstance};
/// let text = to_obj(&MeshInstance::new("cube", Mesh::unit_cube()), &AxisConvention::default()).unwrap();
/// assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
/// assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 6);
/// ```
pub fn to_obj(instance: &MeshInstance, axes: &AxisConvention) -> Result<String, LodError> {
    let matrix = axes.matrix()? * instance.transform;
    let points: Vec<Point3<Real>> = instance.mesh.world_vertices(&matrix);

    let mut out = String::new();
    out.push_str("# b4b-lod\n");
    out.push_str(&format!("o {}\n", instance.name));
    for p in &points {
        out.push_str(&format!("v {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
    }
    for face in &instance.mesh.faces {
        let corners: Vec<Point3<Real>> = face.indices.iter().map(|&i| points[i]).collect();
        let n = Plane::from_polygon(&corners).normal();
        out.push_str(&format!("vn {:.4} {:.4} {:.4}\n", n.x, n.y, n.z));
    }
    out.push_str("s off\n");
    for (fi, face) in instance.mesh.faces.iter().enumerate() {
        out.push('f');
        for &i in &face.indices {
            out.push_str(&format!(" {}//{}", i + 1, fi + 1));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Write `instance` to `path`, creating parent directories as needed.
pub fn write_obj(
    instance: &MeshInstance,
    path: &Path,
    axes: &AxisConvention,
) -> Result<(), LodError> {
    let text = to_obj(instance, axes)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    info!("exported {} to {}", instance.name, path.display());
    Ok(())
}

/// Export the instance linked as `name`.
///
/// ## Errors
/// [`LodError::MissingAsset`] when nothing named `name` is linked.
pub fn export_named<C: WorkingCollection + ?Sized>(
    collection: &C,
    name: &str,
    path: &Path,
    axes: &AxisConvention,
) -> Result<(), LodError> {
    let instance = collection
        .get(name)
        .ok_or_else(|| LodError::MissingAsset(name.to_string()))?;
    write_obj(instance, path, axes)
}
