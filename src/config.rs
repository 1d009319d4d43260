//! Names and export settings shared by the LOD operations

use crate::errors::LodError;
use crate::io::obj::AxisConvention;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Reserved object names, output location and export axes.
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```
/// # use b4b_lod::config::LodConfig;
/// let config = LodConfig::from_json_str(r#"{ "output_dir": "renders/lod" }"#).unwrap();
/// assert_eq!(config.lod_name, "b4b_lod");
/// assert_eq!(config.output_path("b4b_lod").to_str(), Some("renders/lod/b4b_lod.obj"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Name of the single LOD proxy object
    pub lod_name: String,
    /// Name of the transient camera-facing copy
    pub visible_name: String,
    /// Base name of tile slices
    pub slice_name: String,
    /// Directory exported `.obj` files are written to
    pub output_dir: PathBuf,
    pub export_axes: AxisConvention,
}

impl Default for LodConfig {
    fn default() -> Self {
        LodConfig {
            lod_name: "b4b_lod".to_string(),
            visible_name: "b4b_lod_visible".to_string(),
            slice_name: "b4b_lod_slice".to_string(),
            output_dir: PathBuf::from("lod"),
            export_axes: AxisConvention::default(),
        }
    }
}

impl LodConfig {
    pub fn from_json_str(text: &str) -> Result<Self, LodError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, LodError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// `<output_dir>/<name>.obj`
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.obj"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::obj::Axis;

    #[test]
    fn axes_parse_from_signed_names() {
        let config = LodConfig::from_json_str(
            r#"{ "lod_name": "proxy", "export_axes": { "forward": "-Z", "up": "Y" } }"#,
        )
        .unwrap();
        assert_eq!(config.lod_name, "proxy");
        assert_eq!(config.visible_name, "b4b_lod_visible");
        assert_eq!(config.export_axes.forward, Axis::NegZ);
        assert_eq!(config.export_axes.up, Axis::Y);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(
            LodConfig::from_json_str("{ \"lod_name\": 3 }"),
            Err(LodError::Config(_))
        ));
    }
}
