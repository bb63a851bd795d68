use std::ops::Range;

use crate::render::vertex::TRIANGLE_VERTICES;

/// One non-indexed draw command, as passed to `RenderPass::draw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub vertices: Range<u32>,
    pub instances: Range<u32>,
}

impl DrawCall {
    /// All triangle vertices, one instance.
    pub fn triangle() -> Self {
        Self {
            vertices: 0..TRIANGLE_VERTICES.len() as u32,
            instances: 0..1,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }
}
