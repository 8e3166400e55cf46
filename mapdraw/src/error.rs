use thiserror::Error;

/// Unified result type for fallible map operations.
pub type Result<T> = std::result::Result<T, MapError>;

/// A call into the rendering surface was rejected.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("rendering surface is no longer alive")]
    Detached,
    #[error("surface call `{op}` failed: {message}")]
    Call { op: &'static str, message: String },
}

/// A persistence backend failed to read or write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage {op} failed: {message}")]
    Backend { op: &'static str, message: String },
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("unknown boundary `{0}`")]
    UnknownBoundary(String),
    #[error("boundary `{0}` is not in the allowed set")]
    BoundaryNotAllowed(String),
    #[error("malformed feature: {0}")]
    MalformedFeature(String),
    #[error("unsupported geometry `{0}`")]
    UnsupportedGeometry(String),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    /// Stable machine-readable code, shared with the JS result objects.
    pub fn code(&self) -> &'static str {
        match self {
            MapError::UnknownBoundary(_) => "unknown_boundary",
            MapError::BoundaryNotAllowed(_) => "boundary_not_allowed",
            MapError::MalformedFeature(_) => "malformed_feature",
            MapError::UnsupportedGeometry(_) => "unsupported_geometry",
            MapError::Surface(_) => "surface",
            MapError::Storage(_) => "storage",
            MapError::Json(_) => "invalid_json",
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        MapError::MalformedFeature(reason.into())
    }
}
