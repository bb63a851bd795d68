use bytemuck::{Pod, Zeroable};

/// One vertex: a position in normalized device coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// The demo triangle: top-center, bottom-left, bottom-right.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new(0.0, 1.0, 0.0),
    Vertex::new(-1.0, -1.0, 0.0),
    Vertex::new(1.0, -1.0, 0.0),
];
