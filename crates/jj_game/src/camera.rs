use glam::Vec2;
use jj_core::coords::{Viewport, WorldPoint};

/// World-space viewpoint that follows the actor one screen-height "room" at
/// a time. Horizontal position never changes.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: WorldPoint,
    pub height_interval: f32,
    origin: WorldPoint,
}

impl Camera {
    pub fn new(origin: WorldPoint, viewport: Viewport) -> Self {
        Self {
            position: origin,
            height_interval: viewport.height,
            origin,
        }
    }

    #[allow(dead_code)]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Snap to the room containing `target`.
    pub fn chase(&mut self, target: Vec2) {
        let room = (target.y / self.height_interval).floor();
        self.position.0.y = self.origin.0.y + room * self.height_interval;
    }
}
