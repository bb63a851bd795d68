//! Render pipeline construction and lifecycle.

use crate::shader::{ShaderError, ValidatedShader};

/// Pairing of a validated vertex/fragment shader with one output pixel format.
pub struct PipelineConfig<'a> {
    pub label: &'a str,
    pub shader: &'a ValidatedShader,
    pub format: wgpu::TextureFormat,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
}

/// Fails if the vertex stage reads a `@location` none of `buffers` supplies.
///
/// wgpu rejects such a pipeline at creation; checking here keeps the failure on
/// the logged path and lets it be caught without a device.
pub fn check_vertex_inputs(
    shader: &ValidatedShader,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> Result<(), ShaderError> {
    let provided = |location: u32| {
        buffers
            .iter()
            .flat_map(|b| b.attributes.iter())
            .any(|a| a.shader_location == location)
    };

    match shader.vertex_inputs().iter().copied().find(|&l| !provided(l)) {
        Some(location) => Err(ShaderError::MissingVertexInput {
            label: shader.label().to_string(),
            location,
        }),
        None => Ok(()),
    }
}

/// Builds an opaque, non-blended triangle-list pipeline with no bind groups.
///
/// Device-side validation runs inside an error scope, so a rejected pipeline
/// comes back as [`ShaderError::Pipeline`] instead of reaching wgpu's
/// uncaptured-error handler.
pub fn create(
    device: &wgpu::Device,
    config: &PipelineConfig<'_>,
) -> Result<wgpu::RenderPipeline, ShaderError> {
    check_vertex_inputs(config.shader, config.vertex_buffers)?;

    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = config.shader.create_module(device);

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(config.label),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(config.label),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(config.shader.vertex_entry()),
            compilation_options: Default::default(),
            buffers: config.vertex_buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(config.shader.fragment_entry()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: config.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(ShaderError::Pipeline {
            label: config.shader.label().to_string(),
            message: err.to_string(),
        }),
        None => Ok(pipeline),
    }
}

/// Lifecycle of a renderer's pipeline.
///
/// `Pending -> Ready` on a successful build, `Pending -> Failed` on a compile
/// error. `Failed` and `Skipped` are terminal: nothing rebuilds them.
#[derive(Debug)]
pub enum PipelineState<P> {
    /// Not built yet; the next prepare builds it.
    Pending,
    /// The renderer was configured not to build a pipeline at all.
    Skipped,
    Ready {
        pipeline: P,
        format: wgpu::TextureFormat,
    },
    Failed(ShaderError),
}

impl<P> PipelineState<P> {
    /// Records the outcome of a build. A failure is logged here, once.
    pub fn from_compile(
        result: Result<P, ShaderError>,
        format: wgpu::TextureFormat,
    ) -> Self {
        match result {
            Ok(pipeline) => {
                log::info!("render pipeline ready ({format:?})");
                Self::Ready { pipeline, format }
            }
            Err(err) => {
                log::error!("render pipeline compilation failed: {err}");
                Self::Failed(err)
            }
        }
    }

    /// Whether a build should run for a surface with `format`.
    ///
    /// A ready pipeline is only rebuilt when the surface format changed.
    pub fn needs_build(&self, format: wgpu::TextureFormat) -> bool {
        match self {
            Self::Pending => true,
            Self::Ready { format: built, .. } => *built != format,
            Self::Skipped | Self::Failed(_) => false,
        }
    }

    pub fn ready(&self) -> Option<&P> {
        match self {
            Self::Ready { pipeline, .. } => Some(pipeline),
            _ => None,
        }
    }
}
