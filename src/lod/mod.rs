//! LOD proxy fitting, camera-facing copies and per-tile slicing.
//!
//! The building blocks live in the submodules and work on plain meshes. The
//! functions here drive them against a [`Host`]: they read render meshes, link
//! and unlink named instances in the working collection and switch the host
//! between object and edit mode.

pub mod bounds;
pub mod proxy;
pub mod slice;
pub mod visibility;

pub use bounds::compute_bounds;
pub use proxy::{build_proxy, proxy_transform};
pub use slice::{
    CutMesh, EditSession, SliceProgress, SliceState, cutting_planes, knife_project, slice_by_tile,
};
pub use visibility::{filter_visible, local_view_direction, view_direction};

use crate::canvas::{Canvas, Quad3D};
use crate::config::LodConfig;
use crate::errors::LodError;
use crate::io::obj::export_named;
use crate::scene::{Camera, Host, MeshInstance, WorkingCollection};
use log::{debug, info, warn};
use std::path::PathBuf;

/// Fit a new LOD proxy around everything the host renders.
///
/// Bounds are taken before the old LOD goes away; it is hidden from render and
/// never contributes to them. Returns the name the proxy was linked under.
///
/// ## Errors
/// [`LodError::EmptyInput`] when no render mesh exists; any existing LOD is
/// then left in place.
pub fn fit_new<H: Host + ?Sized>(host: &mut H, config: &LodConfig) -> Result<String, LodError> {
    let aabb = compute_bounds(host.render_meshes())?;
    delete(host, config);
    let name = host.link(build_proxy(&aabb, &config.lod_name));
    info!(
        "fitted {name} to [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
        aabb.mins.x, aabb.mins.y, aabb.mins.z, aabb.maxs.x, aabb.maxs.y, aabb.maxs.z
    );
    Ok(name)
}

/// Remove the LOD proxy. Returns whether there was one.
pub fn delete<C: WorkingCollection + ?Sized>(collection: &mut C, config: &LodConfig) -> bool {
    let removed = collection.unlink(&config.lod_name).is_some();
    if removed {
        debug!("deleted {}", config.lod_name);
    }
    removed
}

/// Write the LOD proxy to `<output_dir>/<lod_name>.obj`.
///
/// A missing LOD is reported in the log and yields `Ok(None)`.
pub fn export<C: WorkingCollection + ?Sized>(
    collection: &C,
    config: &LodConfig,
) -> Result<Option<PathBuf>, LodError> {
    let path = config.output_path(&config.lod_name);
    match export_named(collection, &config.lod_name, &path, &config.export_axes) {
        Ok(()) => Ok(Some(path)),
        Err(LodError::MissingAsset(_)) => {
            warn!("there is no LOD to export!");
            Ok(None)
        },
        Err(e) => Err(e),
    }
}

/// Link a copy of the LOD holding only the faces `camera` sees.
///
/// The copy keeps the LOD's transform and is hidden from render. The caller
/// owns it and unlinks it when done.
pub fn copy_visible_faces<H: Host + ?Sized>(
    host: &mut H,
    lod_name: &str,
    camera: &Camera,
    config: &LodConfig,
) -> Result<String, LodError> {
    let lod = host
        .get(lod_name)
        .ok_or_else(|| LodError::MissingAsset(lod_name.to_string()))?;

    let direction = local_view_direction(&lod.transform, &view_direction(camera));
    let visible = filter_visible(&lod.mesh, &direction);
    debug!(
        "{lod_name}: {} of {} faces face the camera",
        visible.faces.len(),
        lod.mesh.faces.len()
    );

    let copy = MeshInstance::new(config.visible_name.clone(), visible)
        .with_transform(lod.transform)
        .hidden_from_render();
    Ok(host.link(copy))
}

/// Slice the camera-facing part of the LOD under `tile` into its own
/// instance and return the name it was linked under.
///
/// The transient visible copy is unlinked again whether or not the cut
/// succeeds, and the host is back in object mode on return.
///
/// ## Errors
/// [`LodError::MissingAsset`] without a LOD, [`LodError::NoViewportContext`]
/// when the host has no active 3D view, and the errors of [`slice_by_tile`].
pub fn slice<H: Host + ?Sized>(
    host: &mut H,
    lod_name: &str,
    camera: &Camera,
    tile: &Quad3D,
    config: &LodConfig,
) -> Result<String, LodError> {
    slice_with_progress(host, lod_name, camera, tile, config, &mut SliceProgress::new())
}

/// [`slice`], recording every step it takes in `progress`.
pub fn slice_with_progress<H: Host + ?Sized>(
    host: &mut H,
    lod_name: &str,
    camera: &Camera,
    tile: &Quad3D,
    config: &LodConfig,
    progress: &mut SliceProgress,
) -> Result<String, LodError> {
    let visible = copy_visible_faces(host, lod_name, camera, config)?;
    progress.advance(SliceState::VisibleCopyCreated);

    let result = cut_visible_copy(host, &visible, camera, tile, config, progress);

    host.unlink(&visible);
    progress.advance(SliceState::Disposed);

    if let Err(e) = &result {
        warn!("slicing {lod_name} failed: {e}");
    }
    result
}

fn cut_visible_copy<H: Host + ?Sized>(
    host: &mut H,
    visible: &str,
    camera: &Camera,
    tile: &Quad3D,
    config: &LodConfig,
    progress: &mut SliceProgress,
) -> Result<String, LodError> {
    let mut session = EditSession::begin(host, progress);
    session.viewport()?;

    let source = session
        .host()
        .get(visible)
        .ok_or_else(|| LodError::MissingAsset(visible.to_string()))?;
    let transform = source.transform;
    let piece = slice_by_tile(&source.mesh, &transform, tile, camera)?;

    let name = session.host_mut().link(
        MeshInstance::new(config.slice_name.clone(), piece)
            .with_transform(transform)
            .hidden_from_render(),
    );
    session.faces_extracted();
    Ok(name)
}

/// Slice the LOD once per canvas tile, in row-major order.
///
/// If any tile fails, the slices already made are unlinked before the error is
/// returned.
pub fn slice_tiles<H: Host + ?Sized>(
    host: &mut H,
    lod_name: &str,
    camera: &Camera,
    canvas: &Canvas,
    config: &LodConfig,
) -> Result<Vec<String>, LodError> {
    let tiles = canvas.tiles(camera);
    let mut names = Vec::with_capacity(tiles.len());

    for tile in &tiles {
        match slice(host, lod_name, camera, tile, config) {
            Ok(name) => names.push(name),
            Err(e) => {
                for name in &names {
                    host.unlink(name);
                }
                return Err(e);
            },
        }
    }

    info!(
        "sliced {lod_name} into {} tiles ({}x{})",
        names.len(),
        canvas.rows(),
        canvas.cols()
    );
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::scene::{ActiveViewport, InteractionMode, Projection, Scene, SceneQuery};
    use nalgebra::{Matrix4, Point3, Vector3};

    fn top_camera() -> Camera {
        Camera::look_at(
            &Point3::new(0.0, 0.0, 10.0),
            &Point3::origin(),
            &Vector3::y(),
            Projection::Orthographic { scale: 4.0 },
        )
    }

    fn scene_with_cube() -> Scene {
        let mut scene = Scene::with_camera(top_camera());
        scene.link(MeshInstance::new("cube", Mesh::unit_cube()));
        scene
    }

    #[test]
    fn fit_replaces_previous_lod() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        assert_eq!(fit_new(&mut scene, &config).unwrap(), "b4b_lod");

        scene.link(
            MeshInstance::new("far", Mesh::unit_cube())
                .with_transform(Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0))),
        );
        assert_eq!(fit_new(&mut scene, &config).unwrap(), "b4b_lod");

        let lods = scene.objects().iter().filter(|o| o.name.starts_with("b4b_lod")).count();
        assert_eq!(lods, 1);
        let lod = scene.get("b4b_lod").unwrap();
        assert_eq!(lod.transform.transform_point(&Point3::origin()).x, 5.0);
        assert_eq!(scene.render_meshes().len(), 2);
    }

    #[test]
    fn fit_without_render_meshes_keeps_old_lod() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        fit_new(&mut scene, &config).unwrap();
        scene.unlink("cube");
        assert!(matches!(fit_new(&mut scene, &config), Err(LodError::EmptyInput)));
        assert!(scene.contains("b4b_lod"));
    }

    #[test]
    fn delete_reports_whether_lod_existed() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        assert!(!delete(&mut scene, &config));
        fit_new(&mut scene, &config).unwrap();
        assert!(delete(&mut scene, &config));
        assert!(!scene.contains("b4b_lod"));
    }

    #[test]
    fn visible_copy_inherits_lod_placement() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        fit_new(&mut scene, &config).unwrap();

        let name = copy_visible_faces(&mut scene, "b4b_lod", &top_camera(), &config).unwrap();
        let copy = scene.get(&name).unwrap();
        assert_eq!(copy.mesh.faces.len(), 1);
        assert!(copy.hide_render);
        assert_eq!(copy.transform, scene.get("b4b_lod").unwrap().transform);
    }

    #[test]
    fn slice_disposes_visible_copy() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        fit_new(&mut scene, &config).unwrap();

        let tile = Canvas::new(1, 2).unwrap().tile(&top_camera(), 0, 0);
        let name = slice(&mut scene, "b4b_lod", &top_camera(), &tile, &config).unwrap();
        assert_eq!(name, "b4b_lod_slice");
        assert!(!scene.contains("b4b_lod_visible"));
        assert_eq!(scene.mode(), InteractionMode::Object);

        let piece = scene.get(&name).unwrap();
        assert!(piece.hide_render);
        assert_eq!(piece.mesh.faces.len(), 1);
        for v in piece.mesh.world_vertices(&piece.transform) {
            assert!(v.x <= 1e-9);
        }
    }

    #[test]
    fn slice_without_viewport_cleans_up() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        fit_new(&mut scene, &config).unwrap();
        scene.set_viewport(None);
        scene.set_mode(InteractionMode::Edit);

        let tile = Canvas::new(1, 1).unwrap().tile(&top_camera(), 0, 0);
        assert!(matches!(
            slice(&mut scene, "b4b_lod", &top_camera(), &tile, &config),
            Err(LodError::NoViewportContext)
        ));
        assert!(!scene.contains("b4b_lod_visible"));
        assert!(!scene.contains("b4b_lod_slice"));
        assert_eq!(scene.mode(), InteractionMode::Object);
    }

    #[test]
    fn tiles_get_unique_slice_names() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        fit_new(&mut scene, &config).unwrap();

        let canvas = Canvas::new(2, 2).unwrap();
        let names = slice_tiles(&mut scene, "b4b_lod", &top_camera(), &canvas, &config).unwrap();
        assert_eq!(
            names,
            ["b4b_lod_slice", "b4b_lod_slice.001", "b4b_lod_slice.002", "b4b_lod_slice.003"]
        );
        // the four quarters together cover the LOD's top face
        let faces: usize = names.iter().map(|n| scene.get(n).unwrap().mesh.faces.len()).sum();
        assert_eq!(faces, 4);
    }

    #[test]
    fn missing_lod_is_not_sliced() {
        let config = LodConfig::default();
        let mut scene = scene_with_cube();
        let tile = Canvas::new(1, 1).unwrap().tile(&top_camera(), 0, 0);
        assert!(matches!(
            slice(&mut scene, "b4b_lod", &top_camera(), &tile, &config),
            Err(LodError::MissingAsset(_))
        ));
        assert!(matches!(export(&scene, &config), Ok(None)));
    }
}
