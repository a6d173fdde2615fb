//! World <-> graphic coordinate transforms.
//!
//! World space is unbounded and Y-up. Graphic space is the draw surface:
//! Y-down, origin at the top-left corner of the canvas, with the camera's
//! world position mapped to the canvas centre.

use glam::Vec2;

/// Position in world space (Y increases upward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint(pub Vec2);

/// Position on the draw surface (Y increases downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphicPoint(pub Vec2);

impl WorldPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

impl GraphicPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

pub fn world_to_graphic(point: WorldPoint, camera: WorldPoint, viewport: Viewport) -> GraphicPoint {
    let gx = viewport.width / 2.0 - (camera.0.x - point.0.x);
    let gy = viewport.height / 2.0 + (camera.0.y - point.0.y);
    GraphicPoint::new(gx, gy)
}

pub fn graphic_to_world(point: GraphicPoint, camera: WorldPoint, viewport: Viewport) -> WorldPoint {
    let wx = camera.0.x - viewport.width / 2.0 + point.0.x;
    let wy = camera.0.y + viewport.height / 2.0 - point.0.y;
    WorldPoint::new(wx, wy)
}
