use winit::event::WindowEvent;
use winit::window::WindowId;

use delta_engine::core::{App, AppControl, FrameCtx};
use delta_engine::paint::Color;
use delta_engine::render::{DrawCall, TriangleRenderer};
use delta_engine::time::FrameTime;

use crate::config::Stage;

/// Clear color of every frame: (0, 104, 5) on a 0-255 scale, opaque.
pub const CLEAR_COLOR: Color = Color::from_premul(0.0, 104.0 / 255.0, 5.0 / 255.0, 1.0);

/// How often (in frames) the running totals are logged at debug level.
const STATS_EVERY: u64 = 600;

/// Running totals of what the demo submitted.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub draws: u64,
}

impl FrameStats {
    pub fn record(&mut self, draw: Option<&DrawCall>) {
        self.frames += 1;
        if draw.is_some() {
            self.draws += 1;
        }
    }
}

/// The triangle demo: clears every frame and draws the triangle when the stage allows.
pub struct TriangleApp {
    stage: Stage,
    renderer: Option<TriangleRenderer>,
    stats: FrameStats,
}

impl TriangleApp {
    pub fn new(stage: Stage) -> Self {
        let renderer = match stage {
            Stage::Connect => None,
            Stage::Upload => Some(TriangleRenderer::vertices_only()),
            Stage::Draw => Some(TriangleRenderer::new()),
        };

        Self {
            stage,
            renderer,
            stats: FrameStats::default(),
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn log_frame(&self, time: &FrameTime, draw: Option<&DrawCall>) {
        if time.frame_index == 0 {
            log::info!(
                "first frame (stage {}): {}",
                self.stage,
                match draw {
                    Some(call) => format!(
                        "{} vertices x {} instance",
                        call.vertex_count(),
                        call.instance_count()
                    ),
                    None => "clear only".to_string(),
                }
            );
        } else if time.frame_index % STATS_EVERY == 0 {
            log::debug!(
                "{} frames submitted, {} draws, last frame {:.2} ms",
                self.stats.frames,
                self.stats.draws,
                time.dt * 1000.0
            );
        }
    }
}

impl App for TriangleApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if matches!(event, WindowEvent::CloseRequested) {
            let stats = self.stats();
            log::info!("closing after {} frames ({} draws)", stats.frames, stats.draws);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let renderer = &mut self.renderer;
        let mut issued = None;

        let control = ctx.render(CLEAR_COLOR, |rctx, target| {
            if let Some(renderer) = renderer.as_mut() {
                issued = renderer.render(rctx, target);
            }
        });

        self.stats.record(issued.as_ref());
        self.log_frame(&ctx.time, issued.as_ref());

        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delta_engine::render::PipelineState;

    #[test]
    fn clear_color_is_fixed() {
        assert_eq!(CLEAR_COLOR, Color::from_u8(0, 104, 5, 255));
        assert_eq!(CLEAR_COLOR.r, 0.0);
        assert_eq!(CLEAR_COLOR.g, 104.0 / 255.0);
        assert_eq!(CLEAR_COLOR.b, 5.0 / 255.0);
        assert_eq!(CLEAR_COLOR.a, 1.0);
    }

    // ── stages ────────────────────────────────────────────────────────────

    #[test]
    fn connect_stage_has_no_renderer() {
        let app = TriangleApp::new(Stage::Connect);
        assert!(app.renderer.is_none());
    }

    #[test]
    fn upload_stage_never_compiles_a_pipeline() {
        let app = TriangleApp::new(Stage::Upload);
        let renderer = app.renderer.as_ref().unwrap();
        assert!(matches!(renderer.pipeline_state(), PipelineState::Skipped));
        assert_eq!(renderer.draw_call(), None);
    }

    #[test]
    fn draw_stage_builds_pipeline_on_first_frame() {
        let app = TriangleApp::new(Stage::Draw);
        let renderer = app.renderer.as_ref().unwrap();
        assert!(matches!(renderer.pipeline_state(), PipelineState::Pending));
    }

    // ── stats ─────────────────────────────────────────────────────────────

    #[test]
    fn stats_count_frames_and_draws() {
        let mut stats = FrameStats::default();
        stats.record(Some(&DrawCall::triangle()));
        stats.record(None);
        stats.record(Some(&DrawCall::triangle()));
        assert_eq!(stats, FrameStats { frames: 3, draws: 2 });
    }

    #[test]
    fn new_app_has_no_frames() {
        assert_eq!(TriangleApp::new(Stage::Draw).stats(), FrameStats::default());
    }
}
