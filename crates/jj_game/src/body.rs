//! Collidable geometry shared by the actor and obstacles.
//!
//! A [`Body`] is plain data: an axis-aligned box positioned by its centre in
//! world space (Y-up), plus velocity and contact properties. Entity types
//! compose a body rather than inheriting from one.

use glam::Vec2;
use serde::Deserialize;
use uuid::Uuid;

/// Identity of a collidable, stable for the entity's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    #[default]
    None,
    Ground,
    Wall,
    Goal,
}

/// Face of a body along which it touches another body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub id: EntityId,
    pub tag: Tag,
    /// Restitution in [0, 1]; 0 absorbs, 1 is elastic.
    pub bounciness: f32,
    pub width: f32,
    pub height: f32,
    pub velocity: Vec2,
    pub position: Vec2,
}

impl Body {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            id: EntityId::new(),
            tag: Tag::None,
            bounciness: 1.0,
            width,
            height,
            velocity: Vec2::ZERO,
            position,
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_bounciness(mut self, bounciness: f32) -> Self {
        self.bounciness = bounciness;
        self
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    pub fn left(&self) -> f32 {
        self.position.x - self.half_width()
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.half_width()
    }

    pub fn top(&self) -> f32 {
        self.position.y + self.half_height()
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.half_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_center_and_half_extents() {
        let body = Body::new(Vec2::new(100.0, 60.0), 200.0, 40.0);
        assert_eq!(body.left(), 0.0);
        assert_eq!(body.right(), 200.0);
        assert_eq!(body.top(), 80.0);
        assert_eq!(body.bottom(), 40.0);
    }

    #[test]
    fn edges_are_ordered_for_positive_extents() {
        let samples = [
            (Vec2::new(0.0, 0.0), 1.0, 1.0),
            (Vec2::new(-500.0, 3000.0), 50.0, 740.0),
            (Vec2::new(12.5, -7.25), 0.5, 1000.0),
        ];
        for (position, w, h) in samples {
            let body = Body::new(position, w, h);
            assert!(body.left() <= body.right());
            assert!(body.bottom() <= body.top());
        }
    }

    #[test]
    fn opposite_side_is_involution() {
        for side in [Side::Left, Side::Top, Side::Right, Side::Bottom] {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn ids_are_unique() {
        let a = Body::new(Vec2::ZERO, 1.0, 1.0);
        let b = Body::new(Vec2::ZERO, 1.0, 1.0);
        assert_ne!(a.id, b.id);
    }
}
