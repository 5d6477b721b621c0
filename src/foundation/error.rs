/// Convenience result type used across layercomp.
pub type LayercompResult<T> = Result<T, LayercompError>;

/// Top-level error taxonomy used by editor and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum LayercompError {
    /// Invalid user-provided style, transform, color or settings value.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image or font needed by an export could not be fetched or decoded.
    #[error("resource load failure: {0}")]
    ResourceLoad(String),

    /// An export was requested while another one was still running.
    #[error("export already in progress")]
    ExportBusy,

    /// Errors raised while rasterizing a compiled scene.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayercompError {
    /// Build a [`LayercompError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayercompError::ResourceLoad`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }

    /// Build a [`LayercompError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
