//! Knife projection of canvas tiles onto a mesh.
//!
//! A tile outline seen from the camera sweeps four cutting planes: for a
//! perspective camera each plane passes through the eye and one tile edge, for
//! an orthographic camera it contains the tile edge and the view direction.
//! Every face is split by each plane in turn. What lies in front of all four
//! planes is the tile's footprint and ends up selected; everything cut away
//! stays in the mesh unselected, like a knife cut in the host's edit mode.

use crate::canvas::Quad3D;
use crate::errors::LodError;
use crate::float_types::{HashMap, Real, tolerance};
use crate::lod::visibility::view_direction;
use crate::mesh::{Face, Mesh, plane::{BACK, Plane}};
use crate::scene::{ActiveViewport, Camera, InteractionMode, Projection, Viewport};
use log::trace;
use nalgebra::{Matrix4, Point3};
use std::sync::OnceLock;

/// Steps of one tile slice, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceState {
    Idle,
    VisibleCopyCreated,
    EditModeCutting,
    FacesExtracted,
    ObjectModeRestored,
    Disposed,
}

impl SliceState {
    /// Whether `next` may follow `self`. A failed cut leaves edit mode
    /// without extracting anything.
    pub const fn can_advance_to(self, next: SliceState) -> bool {
        use SliceState::*;
        matches!(
            (self, next),
            (Idle, VisibleCopyCreated)
                | (VisibleCopyCreated, EditModeCutting)
                | (EditModeCutting, FacesExtracted)
                | (EditModeCutting, ObjectModeRestored)
                | (FacesExtracted, ObjectModeRestored)
                | (ObjectModeRestored, Disposed)
        )
    }
}

/// The steps one tile slice has gone through, starting at [`SliceState::Idle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceProgress {
    steps: Vec<SliceState>,
}

impl Default for SliceProgress {
    fn default() -> Self {
        SliceProgress {
            steps: vec![SliceState::Idle],
        }
    }
}

impl SliceProgress {
    pub fn new() -> Self {
        SliceProgress::default()
    }

    pub fn state(&self) -> SliceState {
        self.steps.last().copied().unwrap_or(SliceState::Idle)
    }

    pub fn steps(&self) -> &[SliceState] {
        &self.steps
    }

    pub(crate) fn advance(&mut self, next: SliceState) {
        let current = self.state();
        debug_assert!(
            current.can_advance_to(next),
            "slice cannot go from {current:?} to {next:?}"
        );
        trace!("slice {current:?} -> {next:?}");
        self.steps.push(next);
    }
}

/// Scoped edit mode on the host.
///
/// `begin` makes sure the host is in object mode, enters edit mode and moves
/// the slice to [`SliceState::EditModeCutting`]. Dropping the session always
/// returns the host to object mode and records
/// [`SliceState::ObjectModeRestored`], whether the work inside finished or
/// bailed out with `?`.
pub struct EditSession<'a, H: ActiveViewport + ?Sized> {
    host: &'a mut H,
    progress: &'a mut SliceProgress,
}

impl<'a, H: ActiveViewport + ?Sized> EditSession<'a, H> {
    pub fn begin(host: &'a mut H, progress: &'a mut SliceProgress) -> Self {
        if host.mode() != InteractionMode::Object {
            host.set_mode(InteractionMode::Object);
        }
        host.set_mode(InteractionMode::Edit);
        progress.advance(SliceState::EditModeCutting);
        EditSession { host, progress }
    }

    pub fn host(&self) -> &H {
        &*self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut *self.host
    }

    /// The active 3D view the cutting primitive runs in.
    pub fn viewport(&self) -> Result<&Viewport, LodError> {
        self.host.viewport().ok_or(LodError::NoViewportContext)
    }

    /// Record that the cut faces were separated into their own mesh.
    pub fn faces_extracted(&mut self) {
        self.progress.advance(SliceState::FacesExtracted);
    }
}

impl<H: ActiveViewport + ?Sized> Drop for EditSession<'_, H> {
    fn drop(&mut self) {
        self.host.set_mode(InteractionMode::Object);
        self.progress.advance(SliceState::ObjectModeRestored);
    }
}

/// A mesh after a knife cut, with one selection flag per face.
#[derive(Debug, Clone, Default)]
pub struct CutMesh {
    pub mesh: Mesh,
    pub selected: Vec<bool>,
}

impl CutMesh {
    /// The selected faces as a new compact mesh.
    pub fn selected_faces(&self) -> Mesh {
        self.mesh.copy_with_face_filter(|i, _| self.selected[i])
    }
}

/// The four world-space planes bounding the region `camera` sees through
/// `tile`, oriented so the inside is in front.
///
/// ## Errors
/// [`LodError::DegenerateTile`] when an edge has zero length, is seen end-on,
/// or leaves the tile's centroid on its plane.
pub fn cutting_planes(tile: &Quad3D, camera: &Camera) -> Result<[Plane; 4], LodError> {
    let centroid = tile.centroid();
    let eye = camera.position();
    let direction = view_direction(camera);

    let mut planes = [Plane::default(); 4];
    for (edge, (a, b)) in tile.edges().enumerate() {
        let normal = match camera.projection {
            Projection::Perspective { .. } => (a - eye).cross(&(b - eye)),
            Projection::Orthographic { .. } => (b - a).cross(&direction),
        };
        let mut plane =
            Plane::through_point(normal, &a).ok_or(LodError::DegenerateTile { edge })?;

        let side = plane.signed_distance(&centroid);
        if side.abs() <= tolerance() {
            return Err(LodError::DegenerateTile { edge });
        }
        if side < 0.0 {
            plane.flip();
        }
        planes[edge] = plane;
    }
    Ok(planes)
}

/// Cut `mesh` with `planes` and select what lies in front of all of them.
///
/// Faces untouched by every plane keep their original indices; split faces
/// share the vertices inserted on common edges. Pieces inherit the plane of
/// the face they were cut from.
pub fn knife_project(mesh: &Mesh, planes: &[Plane]) -> CutMesh {
    let mut vertices = mesh.vertices.clone();
    let mut cache = HashMap::default();
    let mut faces = Vec::with_capacity(mesh.faces.len());
    let mut selected = Vec::with_capacity(mesh.faces.len());

    for face in &mesh.faces {
        let mut inside = Some(face.indices.clone());

        for (plane_id, plane) in planes.iter().enumerate() {
            let Some(current) = inside.take() else {
                break;
            };
            let split = plane.split_face(plane_id, &current, &mut vertices, &mut cache);
            if let Some(back) = split.back {
                faces.push(Face::with_plane(back, face.plane));
                selected.push(false);
            }
            inside = split.front;
        }

        if let Some(front) = inside {
            faces.push(Face::with_plane(front, face.plane));
            selected.push(true);
        }
    }

    trace!(
        "knife cut: {} faces -> {} pieces, {} new vertices",
        mesh.faces.len(),
        faces.len(),
        vertices.len() - mesh.vertices.len()
    );

    CutMesh {
        mesh: Mesh {
            vertices,
            faces,
            bounding_box: OnceLock::new(),
        },
        selected,
    }
}

/// The part of `mesh` (placed by `transform`) whose projection through
/// `camera` falls inside `tile`.
///
/// A transform that flattens a cutting plane's normal (a zero-height LOD seen
/// against a horizontal plane) puts the whole mesh at one distance from that
/// plane: the plane then either keeps everything or nothing.
///
/// ## Errors
/// [`LodError::DegenerateTile`] for tiles that do not span a region.
pub fn slice_by_tile(
    mesh: &Mesh,
    transform: &Matrix4<Real>,
    tile: &Quad3D,
    camera: &Camera,
) -> Result<Mesh, LodError> {
    let origin = transform.transform_point(&Point3::origin());
    let mut local_planes = Vec::with_capacity(4);

    for plane in cutting_planes(tile, camera)? {
        match plane.to_local(transform) {
            Some(local) => local_planes.push(local),
            None if plane.orient_point(&origin) == BACK => return Ok(Mesh::new()),
            None => {},
        }
    }

    Ok(knife_project(mesh, &local_planes).selected_faces())
}
