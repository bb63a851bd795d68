mod app;
mod config;

use anyhow::Result;

use delta_engine::logging::{init_logging, LoggingConfig};
use delta_engine::window::Runtime;

use crate::app::TriangleApp;
use crate::config::DemoConfig;

fn main() {
    if let Err(e) = run() {
        eprintln!("delta runtime error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_logging(LoggingConfig {
        default_filter: "info,wgpu_core=warn,wgpu_hal=warn,naga=warn".to_string(),
        ..LoggingConfig::default()
    });

    let config = DemoConfig::from_env()?;
    log::info!("starting triangle demo (stage {})", config.current_stage());

    Runtime::run(
        config.runtime(),
        config.gpu_init(),
        TriangleApp::new(config.current_stage()),
    )
}
