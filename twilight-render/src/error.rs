use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A render type this renderer has no projection for. Parameter
    /// validation makes this unreachable for well-formed states.
    #[error("unsupported render mode: {0}")]
    UnsupportedRenderMode(String),

    #[error("invalid generator config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Core(#[from] twilight_core::CoreError),
}
