use thiserror::Error;

use crate::tile::Tile;

/// Top-level error type for tile mesh generation.
#[derive(Debug, Error)]
pub enum TilemeshError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Errors related to tile geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate tile: {0}")]
    DegenerateTile(Tile),
}

/// Errors in layer or subwall configuration. A build aborts on any of these.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("wall layer has no subwalls configured")]
    NoSubwalls,

    #[error("subwall {index} has {steps} steps, at least 1 is required")]
    InvalidSteps { index: usize, steps: u32 },

    #[error("{parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{parameter} must be finite, got {value}")]
    NotFinite { parameter: &'static str, value: f32 },

    #[error("{parameter} has keys that are not finite")]
    NonFiniteKeys { parameter: &'static str },
}

/// Errors raised by the mesh assembler when its invariants would be broken.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("triangle index {index} references a vertex that does not exist (vertex count {vertex_count})")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("a sub-mesh is already open")]
    SubMeshAlreadyOpen,

    #[error("no sub-mesh is open")]
    NoOpenSubMesh,

    #[error("vertex count exceeds the u32 index range")]
    TooManyVertices,
}

/// A non-fatal problem encountered while building a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildWarning {
    /// A tile with no extent was skipped.
    DegenerateTile(Tile),
    /// A tile appeared more than once; the copies were ignored.
    DuplicateTile(Tile),
}

/// Convenience type alias for results using [`TilemeshError`].
pub type Result<T> = std::result::Result<T, TilemeshError>;
