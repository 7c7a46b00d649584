//! Error types for BVH construction and mesh queries.

use thiserror::Error;

/// Errors that can occur while building or querying a BVH.
#[derive(Error, Debug)]
pub enum BvhError {
    /// No triangles to build from.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Build settings out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Index buffer length is not a multiple of three.
    #[error("index buffer length {0} is not a multiple of 3")]
    MalformedIndices(usize),

    /// An index references a vertex that does not exist.
    #[error("vertex index {index} out of range for {len} positions")]
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Number of positions in the mesh.
        len: usize,
    },

    /// Per-face normals do not line up with the triangle count.
    #[error("{normals} face normals supplied for {triangles} triangles")]
    NormalCountMismatch {
        /// Number of normals supplied.
        normals: usize,
        /// Number of triangles in the index buffer.
        triangles: usize,
    },

    /// Queried after the geometry changed without a rebuild.
    #[error("BVH is stale: geometry changed since the last rebuild")]
    StaleTree,

    /// Settings file could not be parsed.
    #[error("settings parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for BVH operations.
pub type Result<T> = std::result::Result<T, BvhError>;
