//! Shader sources and their validation.
//!
//! WGSL is parsed and validated with `naga` before anything reaches the device.
//! A failure here is the one error path of the renderer: it is reported as a
//! [`ShaderError`] and the pipeline is never built.

mod error;
mod source;
mod validate;

pub use error::ShaderError;
pub use source::{ShaderSource, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use validate::{capabilities_for, validate, ValidatedShader};
