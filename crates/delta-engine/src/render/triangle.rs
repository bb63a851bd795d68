use wgpu::util::DeviceExt;

use crate::render::pipeline::{self, PipelineConfig, PipelineState};
use crate::render::vertex::{Vertex, TRIANGLE_VERTICES};
use crate::render::{DrawCall, RenderCtx, RenderTarget};
use crate::shader::{self, ShaderError, ShaderSource, ValidatedShader};

/// Draws the static demo triangle.
///
/// GPU resources are created on the first frame and kept for the lifetime of
/// the renderer: the vertex buffer is uploaded once and the pipeline compiled
/// once. If compilation fails the error is logged and every later frame records
/// no draw (the caller's clear still happens).
pub struct TriangleRenderer {
    shader: ShaderSource,
    vertex_buffer: Option<wgpu::Buffer>,
    pipeline: PipelineState<wgpu::RenderPipeline>,
}

impl TriangleRenderer {
    /// Renderer using the bundled pass-through shader.
    pub fn new() -> Self {
        Self::with_shader(ShaderSource::triangle())
    }

    pub fn with_shader(shader: ShaderSource) -> Self {
        Self {
            shader,
            vertex_buffer: None,
            pipeline: PipelineState::Pending,
        }
    }

    /// Uploads the vertex buffer but never builds a pipeline, so nothing is drawn.
    pub fn vertices_only() -> Self {
        Self {
            shader: ShaderSource::triangle(),
            vertex_buffer: None,
            pipeline: PipelineState::Skipped,
        }
    }

    pub fn pipeline_state(&self) -> &PipelineState<wgpu::RenderPipeline> {
        &self.pipeline
    }

    pub fn has_vertex_buffer(&self) -> bool {
        self.vertex_buffer.is_some()
    }

    /// Creates whatever GPU resources are still missing.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) {
        self.ensure_vertex_buffer(ctx);
        self.ensure_pipeline(ctx);
    }

    /// The draw the next frame will record, if any.
    pub fn draw_call(&self) -> Option<DrawCall> {
        plan_draw(&self.pipeline, self.vertex_buffer.is_some())
    }

    /// Records the triangle into `target` and returns the draw it issued.
    ///
    /// Loads the existing attachment contents; the frame loop clears beforehand.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) -> Option<DrawCall> {
        self.prepare(ctx);

        let call = self.draw_call()?;
        let pipeline = self.pipeline.ready()?;
        let vertex_buffer = self.vertex_buffer.as_ref()?;

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("delta triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.draw(call.vertices.clone(), call.instances.clone());

        Some(call)
    }

    fn ensure_vertex_buffer(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertex_buffer.is_some() {
            return;
        }

        self.vertex_buffer = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("delta triangle vbo"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        log::debug!("uploaded {} triangle vertices", TRIANGLE_VERTICES.len());
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        let features = ctx.device.features();
        self.build_pipeline_with(ctx.surface_format, features, |shader| {
            pipeline::create(
                ctx.device,
                &PipelineConfig {
                    label: "delta triangle pipeline",
                    shader,
                    format: ctx.surface_format,
                    vertex_buffers: &[Vertex::layout()],
                },
            )
        });
    }

    /// Device-free part of pipeline compilation: WGSL validation against the
    /// device's features and the vertex-input check against [`Vertex::layout`].
    pub fn compile_shader(&self, features: wgpu::Features) -> Result<ValidatedShader, ShaderError> {
        let shader = shader::validate(&self.shader, features)?;
        pipeline::check_vertex_inputs(&shader, &[Vertex::layout()])?;
        Ok(shader)
    }

    /// Compiles the shader and hands it to `create` if the pipeline still needs
    /// building for `format`. `create` is not called when compilation fails.
    fn build_pipeline_with<F>(&mut self, format: wgpu::TextureFormat, features: wgpu::Features, create: F)
    where
        F: FnOnce(&ValidatedShader) -> Result<wgpu::RenderPipeline, ShaderError>,
    {
        if !self.pipeline.needs_build(format) {
            return;
        }

        let result = self.compile_shader(features).and_then(|shader| create(&shader));
        self.pipeline = PipelineState::from_compile(result, format);
    }
}

impl Default for TriangleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// One triangle when both the pipeline and the vertex buffer exist, nothing otherwise.
fn plan_draw<P>(pipeline: &PipelineState<P>, has_vertices: bool) -> Option<DrawCall> {
    match (pipeline.ready(), has_vertices) {
        (Some(_), true) => Some(DrawCall::triangle()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

    fn ready() -> PipelineState<()> {
        PipelineState::Ready {
            pipeline: (),
            format: FORMAT,
        }
    }

    // ── plan_draw ─────────────────────────────────────────────────────────

    #[test]
    fn ready_pipeline_draws_one_triangle_every_tick() {
        let state = ready();
        for _ in 0..120 {
            let call = plan_draw(&state, true).expect("a draw per tick");
            assert_eq!(call.vertex_count(), 3);
            assert_eq!(call.instance_count(), 1);
        }
    }

    #[test]
    fn no_draw_without_vertex_buffer() {
        assert_eq!(plan_draw(&ready(), false), None);
    }

    #[test]
    fn pending_and_skipped_pipelines_do_not_draw() {
        assert_eq!(plan_draw(&PipelineState::<()>::Pending, true), None);
        assert_eq!(plan_draw(&PipelineState::<()>::Skipped, true), None);
    }

    #[test]
    fn failed_pipeline_never_draws_afterwards() {
        let err = ShaderError::Parse {
            label: "triangle".to_string(),
            message: "expected ')'".to_string(),
        };
        let state = PipelineState::<()>::from_compile(Err(err), FORMAT);

        for _ in 0..120 {
            assert!(!state.needs_build(FORMAT));
            assert_eq!(plan_draw(&state, true), None);
        }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_renderer_starts_without_gpu_resources() {
        let renderer = TriangleRenderer::new();
        assert!(!renderer.has_vertex_buffer());
        assert!(matches!(renderer.pipeline_state(), PipelineState::Pending));
        assert_eq!(renderer.draw_call(), None);
    }

    #[test]
    fn vertices_only_renderer_never_builds_a_pipeline() {
        let renderer = TriangleRenderer::vertices_only();
        assert!(matches!(renderer.pipeline_state(), PipelineState::Skipped));
        assert!(!renderer.pipeline_state().needs_build(FORMAT));
    }

    // ── compile failure ───────────────────────────────────────────────────

    #[test]
    fn bundled_shader_compiles_without_a_device() {
        let shader = TriangleRenderer::new()
            .compile_shader(wgpu::Features::empty())
            .expect("bundled shader compiles");
        assert_eq!(shader.vertex_inputs(), &[0]);
    }

    #[test]
    fn syntax_error_fails_once_and_never_draws() {
        let capture = capture_logs();
        let mut renderer =
            TriangleRenderer::with_shader(ShaderSource::wgsl("triangle-bad-syntax", "fn basic_vertex( {"));

        for _ in 0..3 {
            renderer.build_pipeline_with(FORMAT, wgpu::Features::empty(), |_| {
                unreachable!("device is never reached for invalid WGSL")
            });
        }

        match renderer.pipeline_state() {
            PipelineState::Failed(ShaderError::Parse { label, .. }) => {
                assert_eq!(label, "triangle-bad-syntax")
            }
            other => panic!("expected a parse failure, got {}", state_name(other)),
        }
        assert_eq!(capture.count(log::Level::Error, "triangle-bad-syntax"), 1);

        for _ in 0..120 {
            assert_eq!(renderer.draw_call(), None);
            assert_eq!(plan_draw(renderer.pipeline_state(), true), None);
        }
    }

    #[test]
    fn shader_reading_missing_vertex_input_fails_before_the_device() {
        let capture = capture_logs();
        let wgsl = "@vertex fn basic_vertex(@location(0) p: vec3<f32>, @location(1) uv: vec2<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(p.xy + uv, p.z, 1.0); }\n\
                    @fragment fn basic_fragment() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let mut renderer = TriangleRenderer::with_shader(ShaderSource::wgsl("triangle-uv", wgsl));

        renderer.build_pipeline_with(FORMAT, wgpu::Features::empty(), |_| {
            unreachable!("vertex inputs are checked before pipeline creation")
        });

        assert!(matches!(
            renderer.pipeline_state(),
            PipelineState::Failed(ShaderError::MissingVertexInput { location: 1, .. })
        ));
        assert_eq!(capture.count(log::Level::Error, "triangle-uv"), 1);
    }

    fn state_name<P>(state: &PipelineState<P>) -> &'static str {
        match state {
            PipelineState::Pending => "Pending",
            PipelineState::Skipped => "Skipped",
            PipelineState::Ready { .. } => "Ready",
            PipelineState::Failed(_) => "Failed",
        }
    }
}
