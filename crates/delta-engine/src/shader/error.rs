use thiserror::Error;

/// Pipeline-compilation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShaderError {
    #[error("failed to parse shader '{label}': {message}")]
    Parse { label: String, message: String },

    #[error("shader '{label}' failed validation: {message}")]
    Validation { label: String, message: String },

    #[error("shader '{label}' has no {stage} entry point named '{name}'")]
    MissingEntryPoint {
        label: String,
        name: String,
        stage: &'static str,
    },

    #[error("shader '{label}' reads vertex input @location({location}) that no vertex buffer provides")]
    MissingVertexInput { label: String, location: u32 },

    /// Rejected by the device while building the pipeline.
    #[error("pipeline for shader '{label}' was rejected by the device: {message}")]
    Pipeline { label: String, message: String },
}
