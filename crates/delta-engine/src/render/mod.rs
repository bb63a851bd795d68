//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers), create them once on
//! first use and record into the frame's encoder through a [`RenderTarget`].

mod ctx;
mod draw;
pub mod pipeline;
mod triangle;
pub mod vertex;

pub use ctx::{RenderCtx, RenderTarget};
pub use draw::DrawCall;
pub use pipeline::{PipelineConfig, PipelineState};
pub use triangle::TriangleRenderer;
pub use vertex::{Vertex, TRIANGLE_VERTICES};
