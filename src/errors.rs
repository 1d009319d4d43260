//! Errors raised by LOD construction, slicing and export

/// Everything that can abort a LOD operation.
#[derive(Debug, thiserror::Error)]
pub enum LodError {
    /// (EmptyInput) No render-visible meshes were supplied to bound
    #[error("(EmptyInput) there are no meshes to compute a bounding box for")]
    EmptyInput,
    /// (NoViewportContext) A knife cut was requested without an active 3D view
    #[error("(NoViewportContext) no active 3D viewport with a camera could be located")]
    NoViewportContext,
    /// (MissingAsset) The named object is not linked in the working collection
    #[error("(MissingAsset) there is no object named {0:?}")]
    MissingAsset(String),
    /// (DegenerateTile) A tile edge collapses to a line or point when seen from the camera
    #[error("(DegenerateTile) tile edge {edge} does not span a cutting plane")]
    DegenerateTile { edge: usize },
    /// (EmptyCanvas) A render canvas needs at least one row and one column
    #[error("(EmptyCanvas) a {rows}x{cols} canvas has no tiles")]
    EmptyCanvas { rows: usize, cols: usize },
    /// (FaceIndexOutOfRange) A face references a vertex the mesh does not have
    #[error("(FaceIndexOutOfRange) face {face} references vertex {index}, mesh has {len}")]
    FaceIndexOutOfRange { face: usize, index: usize, len: usize },
    /// (TooFewIndices) A face has fewer than three corners
    #[error("(TooFewIndices) face {0} has fewer than three vertices")]
    TooFewIndices(usize),
    /// (InvalidAxes) Export forward and up axes share a principal axis
    #[error("(InvalidAxes) forward {forward:?} and up {up:?} must be different axes")]
    InvalidAxes {
        forward: crate::io::obj::Axis,
        up: crate::io::obj::Axis,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
