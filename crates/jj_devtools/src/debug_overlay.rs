//! Text overlay for development: frame timing, actor/camera position, and
//! the world coordinate of the last canvas click.
//!
//! Clicks are always recorded so the readout is current the moment the
//! overlay is shown; drawing only happens while `visible` (toggled by F3).

use glam::Vec2;
use jj_core::coords::{graphic_to_world, GraphicPoint, Viewport, WorldPoint};
use jj_core::draw::{Color, DrawSurface};
use jj_core::time::FrameStats;

const TEXT_SIZE_PT: f32 = 10.0;
const LINE_HEIGHT: f32 = 16.0;
const MARGIN: Vec2 = Vec2::new(10.0, 20.0);

#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayStats {
    pub frame: FrameStats,
    pub actor_position: Vec2,
    pub camera_y: f32,
}

#[derive(Debug, Default)]
pub struct DebugOverlay {
    pub visible: bool,
    last_click_world: Option<WorldPoint>,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!(
            "Debug overlay {}",
            if self.visible { "shown" } else { "hidden" }
        );
    }

    /// Convert a canvas click to world space through the current camera.
    pub fn record_click(
        &mut self,
        click: Vec2,
        camera: WorldPoint,
        viewport: Viewport,
    ) -> WorldPoint {
        let world = graphic_to_world(GraphicPoint(click), camera, viewport);
        log::info!("Clicked world point: {}, {}", world.0.x, world.0.y);
        self.last_click_world = Some(world);
        world
    }

    pub fn last_click(&self) -> Option<WorldPoint> {
        self.last_click_world
    }

    pub fn lines(&self, stats: &OverlayStats) -> Vec<String> {
        let mut lines = vec![
            format!(
                "{:.1} fps ({:.2} ms)",
                stats.frame.frames_per_second,
                stats.frame.frame_time_seconds * 1000.0
            ),
            format!(
                "actor {:.1}, {:.1}",
                stats.actor_position.x, stats.actor_position.y
            ),
            format!("camera y {:.0}", stats.camera_y),
        ];
        if let Some(click) = self.last_click_world {
            lines.push(format!("click {}, {}", click.0.x, click.0.y));
        }
        lines
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, stats: &OverlayStats) {
        if !self.visible {
            return;
        }
        for (i, line) in self.lines(stats).iter().enumerate() {
            let baseline = MARGIN + Vec2::new(0.0, LINE_HEIGHT * i as f32);
            surface.fill_text(line, baseline, TEXT_SIZE_PT, Color::BLACK);
        }
    }
}
