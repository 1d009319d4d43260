//! Level-of-detail proxies for tiled rendering.
//!
//! A scene's render meshes are wrapped in a single axis-aligned box, the
//! **LOD proxy**. For a given camera the proxy is reduced to the faces the
//! camera sees, and that copy is cut along the outline of each render tile so
//! every tile gets its own slice of the proxy.
//!
//! The host application (scene, active view, working collection) is reached
//! through the traits in [`scene`]; [`scene::Scene`] is an in-memory host.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **hashmap**: use hashbrown for the knife cut's edge cache
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod canvas;
pub mod config;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod lod;
pub mod mesh;
pub mod scene;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use config::LodConfig;
pub use errors::LodError;
pub use mesh::Mesh;
