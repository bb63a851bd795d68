/// The drawable acquired for one refresh tick.
///
/// Short-lived: it is created by [`Gpu::begin_frame`](super::Gpu::begin_frame) and
/// consumed by [`Gpu::submit`](super::Gpu::submit). Holding the surface texture
/// prevents acquisition of the next drawable.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
