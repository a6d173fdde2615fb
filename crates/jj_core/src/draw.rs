//! Draw-surface primitives.
//!
//! The game issues only three kinds of calls per frame: filled rectangles,
//! images placed at a rectangle, and baseline-anchored text. All coordinates
//! are graphic pixels (Y-down). The host owns the surface; [`CommandRecorder`]
//! is a surface that just records the calls, used by the headless host and
//! by tests.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of size `w`×`h` centred on `center`.
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub trait DrawSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `image` into `dest`. `source` selects a sub-rectangle of the image
    /// in image pixels; `None` draws the whole image.
    fn draw_image(&mut self, image: &str, source: Option<Rect>, dest: Rect);

    /// `baseline` is the left end of the text baseline.
    fn fill_text(&mut self, text: &str, baseline: Vec2, size_pt: f32, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    Image {
        image: String,
        source: Option<Rect>,
        dest: Rect,
    },
    Text {
        text: String,
        baseline: Vec2,
        size_pt: f32,
        color: Color,
    },
}

#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn images(&self) -> impl Iterator<Item = (&str, Rect)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Image { image, dest, .. } => Some((image.as_str(), *dest)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl DrawSurface for CommandRecorder {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn draw_image(&mut self, image: &str, source: Option<Rect>, dest: Rect) {
        self.commands.push(DrawCommand::Image {
            image: image.to_string(),
            source,
            dest,
        });
    }

    fn fill_text(&mut self, text: &str, baseline: Vec2, size_pt: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            baseline,
            size_pt,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_puts_center_in_middle() {
        let rect = Rect::centered(Vec2::new(100.0, 50.0), 40.0, 20.0);
        assert_eq!(rect, Rect::new(80.0, 40.0, 40.0, 20.0));
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn recorder_keeps_call_order() {
        let mut surface = CommandRecorder::new();
        surface.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        surface.draw_image("actor", None, Rect::new(1.0, 2.0, 3.0, 4.0));
        surface.fill_text("hi", Vec2::new(5.0, 6.0), 12.0, Color::BLACK);

        assert_eq!(surface.commands().len(), 3);
        assert!(matches!(surface.commands()[0], DrawCommand::FillRect { .. }));
        assert_eq!(
            surface.images().collect::<Vec<_>>(),
            vec![("actor", Rect::new(1.0, 2.0, 3.0, 4.0))]
        );
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["hi"]);

        surface.clear();
        assert!(surface.commands().is_empty());
    }
}
