// main.rs
//
// Demo: fit a LOD proxy around a few boxes, export it, then slice it over a
// 2x2 render canvas and export every slice. Output lands in the configured
// output directory (`lod/` by default).
//
// Usage: b4b-lod [config.json]

use b4b_lod::canvas::Canvas;
use b4b_lod::io::obj::write_obj;
use b4b_lod::lod;
use b4b_lod::scene::{Camera, MeshInstance, Projection, Scene, WorkingCollection};
use b4b_lod::{LodConfig, LodError, Mesh};
use log::info;
use nalgebra::{Matrix4, Point3, Vector3};
use std::path::Path;

fn main() -> Result<(), LodError> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => LodConfig::from_path(Path::new(&path))?,
        None => LodConfig::default(),
    };

    let camera = Camera::look_at(
        &Point3::new(8.0, -8.0, 6.0),
        &Point3::new(1.0, 0.5, 0.5),
        &Vector3::z(),
        Projection::Orthographic { scale: 10.0 },
    );
    let mut scene = Scene::with_camera(camera.clone());

    // a table top and two crates standing on it
    scene.link(
        MeshInstance::new("table", Mesh::unit_cube()).with_transform(
            Matrix4::new_nonuniform_scaling(&Vector3::new(3.0, 2.0, 0.1)),
        ),
    );
    scene.link(
        MeshInstance::new("crate", Mesh::unit_cube()).with_transform(
            Matrix4::new_translation(&Vector3::new(1.5, 0.5, 0.6)) * Matrix4::new_scaling(0.5),
        ),
    );
    scene.link(
        MeshInstance::new("crate", Mesh::unit_cube()).with_transform(
            Matrix4::new_translation(&Vector3::new(-1.0, -0.5, 1.1))
                * Matrix4::new_nonuniform_scaling(&Vector3::new(0.6, 0.6, 1.0)),
        ),
    );

    let lod_name = lod::fit_new(&mut scene, &config)?;
    lod::export(&scene, &config)?;

    let slices = lod::slice_tiles(&mut scene, &lod_name, &camera, &Canvas::new(2, 2)?, &config)?;
    for name in &slices {
        if let Some(slice) = scene.unlink(name) {
            // slice.001 -> slice_001.obj
            let path = config.output_path(&name.replace('.', "_"));
            write_obj(&slice, &path, &config.export_axes)?;
            info!("{name}: {} faces", slice.mesh.faces.len());
        }
    }

    Ok(())
}
