//! Host capabilities the LOD operations need, and an in-memory host.
//!
//! The add-on talks to its host application through three narrow traits:
//! [`SceneQuery`] enumerates render meshes, [`ActiveViewport`] exposes the 3D
//! view and the object/edit mode switch, and [`WorkingCollection`] is where new
//! mesh instances are linked and unlinked. [`Scene`] implements all three in
//! memory and is what the tests and the demo binary run against.

use crate::float_types::Real;
use crate::mesh::Mesh;
use log::trace;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

/// How the host draws an instance in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayType {
    #[default]
    Solid,
    Wire,
}

/// A named mesh placed in the world.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub name: String,
    pub mesh: Mesh,
    /// local → world
    pub transform: Matrix4<Real>,
    /// Excluded from rendered output
    pub hide_render: bool,
    pub display: DisplayType,
}

impl MeshInstance {
    /// A render-visible, solid instance with identity transform.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        MeshInstance {
            name: name.into(),
            mesh,
            transform: Matrix4::identity(),
            hide_render: false,
            display: DisplayType::Solid,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<Real>) -> Self {
        self.transform = transform;
        self
    }

    pub fn hidden_from_render(mut self) -> Self {
        self.hide_render = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Parallel projection; `scale` is the view width along the larger image side
    Orthographic { scale: Real },
    /// Pinhole projection with vertical field of view `fov_y` in radians
    Perspective { fov_y: Real },
}

/// A camera looking down its local `-Z` axis with `+Y` up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// local → world
    pub transform: Matrix4<Real>,
    pub projection: Projection,
    /// Image width / height
    pub aspect: Real,
}

impl Camera {
    pub fn new(transform: Matrix4<Real>, projection: Projection) -> Self {
        Camera {
            transform,
            projection,
            aspect: 1.0,
        }
    }

    /// Camera at `eye` looking at `target`.
    pub fn look_at(
        eye: &Point3<Real>,
        target: &Point3<Real>,
        up: &Vector3<Real>,
        projection: Projection,
    ) -> Self {
        let view = Isometry3::look_at_rh(eye, target, up);
        Camera::new(view.inverse().to_homogeneous(), projection)
    }

    pub const fn with_aspect(mut self, aspect: Real) -> Self {
        self.aspect = aspect;
        self
    }

    /// World-space position.
    pub fn position(&self) -> Point3<Real> {
        self.transform.transform_point(&Point3::origin())
    }

    /// World-space point one unit in front of the camera.
    pub fn forward_point(&self) -> Point3<Real> {
        self.transform.transform_point(&Point3::new(0.0, 0.0, -1.0))
    }
}

/// The active 3D view; cutting is projected from its camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub camera: Camera,
}

/// Object mode edits instances, edit mode edits the active mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Object,
    Edit,
}

pub trait SceneQuery {
    /// Every instance contributing to rendered output, with its world transform.
    fn render_meshes(&self) -> Vec<(&Mesh, &Matrix4<Real>)>;
}

pub trait ActiveViewport {
    fn viewport(&self) -> Option<&Viewport>;
    fn mode(&self) -> InteractionMode;
    fn set_mode(&mut self, mode: InteractionMode);
}

pub trait WorkingCollection {
    /// Link `instance`, returning the name it was stored under. A taken name
    /// is made unique with a numeric suffix.
    fn link(&mut self, instance: MeshInstance) -> String;
    fn unlink(&mut self, name: &str) -> Option<MeshInstance>;
    fn get(&self, name: &str) -> Option<&MeshInstance>;

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Everything the LOD operations need from the host.
pub trait Host: SceneQuery + ActiveViewport + WorkingCollection {}

impl<T: SceneQuery + ActiveViewport + WorkingCollection + ?Sized> Host for T {}

/// In-memory host: one collection of instances plus an optional viewport.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<MeshInstance>,
    viewport: Option<Viewport>,
    mode: InteractionMode,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    /// Scene with an active 3D view looking through `camera`.
    pub fn with_camera(camera: Camera) -> Self {
        Scene {
            viewport: Some(Viewport { camera }),
            ..Scene::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.viewport = viewport;
    }

    /// All linked instances, in link order.
    pub fn objects(&self) -> &[MeshInstance] {
        &self.objects
    }

    fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

impl SceneQuery for Scene {
    fn render_meshes(&self) -> Vec<(&Mesh, &Matrix4<Real>)> {
        self.objects
            .iter()
            .filter(|o| !o.hide_render)
            .map(|o| (&o.mesh, &o.transform))
            .collect()
    }
}

impl ActiveViewport for Scene {
    fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    fn mode(&self) -> InteractionMode {
        self.mode
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        trace!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }
}

impl WorkingCollection for Scene {
    fn link(&mut self, mut instance: MeshInstance) -> String {
        instance.name = self.unique_name(&instance.name);
        let name = instance.name.clone();
        trace!("link {name}");
        self.objects.push(instance);
        name
    }

    fn unlink(&mut self, name: &str) -> Option<MeshInstance> {
        let pos = self.objects.iter().position(|o| o.name == name)?;
        trace!("unlink {name}");
        Some(self.objects.remove(pos))
    }

    fn get(&self, name: &str) -> Option<&MeshInstance> {
        self.objects.iter().find(|o| o.name == name)
    }
}
