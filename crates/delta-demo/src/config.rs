use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use winit::dpi::LogicalSize;

use delta_engine::device::GpuInit;
use delta_engine::window::RuntimeConfig;

/// Environment variable selecting the tutorial stage.
pub const STAGE_VAR: &str = "DELTA_STAGE";

/// How far through the setup sequence the demo goes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Stage {
    /// Device and surface only; every frame is just cleared.
    Connect,
    /// Also uploads the vertex buffer; still nothing drawn.
    Upload,
    /// Full demo: pipeline compiled, one triangle per frame.
    #[default]
    Draw,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Connect => "connect",
            Stage::Upload => "upload",
            Stage::Draw => "draw",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connect" => Ok(Stage::Connect),
            "upload" => Ok(Stage::Upload),
            "draw" => Ok(Stage::Draw),
            other => bail!("unknown stage '{other}' (expected connect, upload or draw)"),
        }
    }
}

/// Demo configuration.
///
/// ```rust,ignore
/// let config = DemoConfig::new().title("triangle").size(640.0, 480.0);
/// ```
#[derive(Debug, Clone)]
pub struct DemoConfig {
    title: String,
    width: f64,
    height: f64,
    stage: Stage,
}

impl DemoConfig {
    pub fn new() -> Self {
        Self {
            title: "delta triangle".to_string(),
            width: 800.0,
            height: 600.0,
            stage: Stage::default(),
        }
    }

    /// Defaults overridden by `DELTA_STAGE`, if set.
    pub fn from_env() -> Result<Self> {
        Self::new().with_stage_var(std::env::var(STAGE_VAR).ok().as_deref())
    }

    fn with_stage_var(self, value: Option<&str>) -> Result<Self> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(self.stage(v.parse()?)),
            _ => Ok(self),
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn current_stage(&self) -> Stage {
        self.stage
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        }
    }

    /// GPU settings: a linear (non-sRGB) surface so the clear color is shown as
    /// written, and FIFO presentation for one frame per vertical sync.
    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            ..GpuInit::default()
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}
