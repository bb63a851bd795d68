use std::borrow::Cow;

/// Entry point of the vertex stage in the bundled shader.
pub const VERTEX_ENTRY: &str = "basic_vertex";

/// Entry point of the fragment stage in the bundled shader.
pub const FRAGMENT_ENTRY: &str = "basic_fragment";

/// WGSL source plus the names of its two stage entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: Cow<'static, str>,
    pub wgsl: Cow<'static, str>,
    pub vertex_entry: Cow<'static, str>,
    pub fragment_entry: Cow<'static, str>,
}

impl ShaderSource {
    /// The pass-through triangle shader shipped with the engine.
    pub fn triangle() -> Self {
        Self {
            label: Cow::Borrowed("triangle"),
            wgsl: Cow::Borrowed(include_str!("shaders/triangle.wgsl")),
            vertex_entry: Cow::Borrowed(VERTEX_ENTRY),
            fragment_entry: Cow::Borrowed(FRAGMENT_ENTRY),
        }
    }

    /// Custom WGSL using the standard `basic_vertex` / `basic_fragment` entry names.
    pub fn wgsl(label: impl Into<Cow<'static, str>>, wgsl: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            wgsl: wgsl.into(),
            vertex_entry: Cow::Borrowed(VERTEX_ENTRY),
            fragment_entry: Cow::Borrowed(FRAGMENT_ENTRY),
        }
    }
}
