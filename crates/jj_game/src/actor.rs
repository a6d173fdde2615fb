//! The player-controlled body.
//!
//! State is a set of independent flags rather than one enum: grounded,
//! stopped, charging and bounced-this-flight combine freely (grounded while
//! charging, airborne after a bounce, ...).
//!
//! Physics runs once per frame with explicit Euler integration and no
//! sub-stepping. Input methods are no-ops outside the states in which they
//! apply, so the scene can call them unconditionally from the key buffer.

use glam::Vec2;
use jj_core::animation::Animator;
use jj_core::coords::{world_to_graphic, Viewport, WorldPoint};
use jj_core::draw::{DrawSurface, Rect};

use crate::body::{Body, Side, Tag};
use crate::collision::{ContactEvent, ContactPhase};

#[derive(Debug, Clone, Copy)]
pub struct ActorConfig {
    pub gravity: f32,
    /// Subtracted from the fall rate each frame while descending.
    pub air_resistance: f32,
    pub max_vx: f32,
    pub max_vy: f32,
    pub max_jump_charge: u32,
    pub walk_speed: f32,
    pub jump_vx_factor: f32,
    pub jump_vy_factor: f32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            air_resistance: 0.7,
            max_vx: 24.0,
            max_vy: 24.0,
            max_jump_charge: 36,
            walk_speed: 4.5,
            jump_vx_factor: 1.2,
            jump_vy_factor: 3.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpDirection {
    Left,
    Center,
    Right,
}

/// One-shot notifications raised by the actor, drained by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorNotice {
    JumpUp,
    Land,
    Bounce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Charge,
    Stand(Facing),
    Walk(Facing),
    Jump(Facing),
    Fall(Facing),
}

#[derive(Debug, Clone)]
struct Animators {
    stand_right: Animator,
    stand_left: Animator,
    walk_right: Animator,
    walk_left: Animator,
    jump_right: Animator,
    jump_left: Animator,
    fall_right: Animator,
    fall_left: Animator,
    charge: Animator,
}

impl Animators {
    fn new() -> Self {
        Self {
            stand_right: Animator::still("actor_stop_right"),
            stand_left: Animator::still("actor_stop_left"),
            walk_right: Animator::new(&["actor_right", "actor_right_1"], 30, true),
            walk_left: Animator::new(&["actor_left", "actor_left_1"], 30, true),
            jump_right: Animator::still("actor_jump_right"),
            jump_left: Animator::still("actor_jump_left"),
            fall_right: Animator::still("actor_fall_right"),
            fall_left: Animator::still("actor_fall_left"),
            charge: Animator::still("actor_charge"),
        }
    }

    fn for_pose(&self, pose: Pose) -> &Animator {
        match pose {
            Pose::Charge => &self.charge,
            Pose::Stand(Facing::Right) => &self.stand_right,
            Pose::Stand(Facing::Left) => &self.stand_left,
            Pose::Walk(Facing::Right) => &self.walk_right,
            Pose::Walk(Facing::Left) => &self.walk_left,
            Pose::Jump(Facing::Right) => &self.jump_right,
            Pose::Jump(Facing::Left) => &self.jump_left,
            Pose::Fall(Facing::Right) => &self.fall_right,
            Pose::Fall(Facing::Left) => &self.fall_left,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub body: Body,
    pub is_ground: bool,
    pub is_stop: bool,
    pub is_land: bool,
    pub is_bounced: bool,
    /// Set on landing on a goal; consumed by the scene.
    pub hit_goal: bool,
    jump_charge: u32,
    is_charge: bool,
    jump_direction: JumpDirection,
    facing: Facing,
    config: ActorConfig,
    animators: Animators,
    notices: Vec<ActorNotice>,
}

impl Actor {
    pub fn new(position: Vec2, width: f32, height: f32, config: ActorConfig) -> Self {
        Self {
            body: Body::new(position, width, height),
            is_ground: false,
            is_stop: true,
            is_land: false,
            is_bounced: false,
            hit_goal: false,
            jump_charge: 0,
            is_charge: false,
            jump_direction: JumpDirection::Center,
            facing: Facing::Right,
            config,
            animators: Animators::new(),
            notices: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn jump_charge(&self) -> u32 {
        self.jump_charge
    }

    #[allow(dead_code)]
    pub fn is_charging(&self) -> bool {
        self.is_charge
    }

    #[allow(dead_code)]
    pub fn jump_direction(&self) -> JumpDirection {
        self.jump_direction
    }

    #[allow(dead_code)]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn drain_notices(&mut self) -> Vec<ActorNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Advance one frame of motion.
    pub fn update(&mut self) {
        let v = &mut self.body.velocity;
        if self.is_ground {
            v.y = 0.0;
        } else {
            v.y -= self.config.gravity;
            if v.y < 0.0 {
                v.y += self.config.air_resistance;
            }
        }

        v.x = limit(v.x, self.config.max_vx);
        v.y = limit(v.y, self.config.max_vy);

        self.body.position += self.body.velocity;

        if self.is_ground && self.body.velocity.x != 0.0 {
            match self.facing {
                Facing::Right => self.animators.walk_right.advance(),
                Facing::Left => self.animators.walk_left.advance(),
            }
        }
    }

    pub fn walk(&mut self, facing: Facing) {
        if !self.is_ground || self.is_charge {
            return;
        }
        self.is_stop = false;
        self.facing = facing;
        self.body.velocity.x = match facing {
            Facing::Right => self.config.walk_speed,
            Facing::Left => -self.config.walk_speed,
        };
    }

    pub fn stop(&mut self) {
        if !self.is_ground {
            return;
        }
        self.is_stop = true;
        self.body.velocity.x = 0.0;
    }

    pub fn charge(&mut self) {
        if !self.is_ground {
            return;
        }
        self.body.velocity.x = 0.0;
        if self.jump_charge < self.config.max_jump_charge {
            self.jump_charge += 1;
        }
        self.is_charge = true;
    }

    pub fn set_jump_direction(&mut self, direction: JumpDirection) {
        if !self.is_charge {
            return;
        }
        self.jump_direction = direction;
    }

    pub fn jump(&mut self) {
        if !self.is_charge || !self.is_ground {
            return;
        }
        self.is_ground = false;
        self.is_charge = false;

        // Square-root curve: longer holds give diminishing extra height.
        let strength = (self.jump_charge as f32).sqrt();
        self.body.velocity.x = match self.jump_direction {
            JumpDirection::Left => {
                self.facing = Facing::Left;
                -self.config.jump_vx_factor * strength
            }
            JumpDirection::Center => 0.0,
            JumpDirection::Right => {
                self.facing = Facing::Right;
                self.config.jump_vx_factor * strength
            }
        };
        self.body.velocity.y = self.config.jump_vy_factor * strength;
        self.jump_charge = 0;
        log::debug!(
            "jump {:?} vx={:.2} vy={:.2}",
            self.jump_direction,
            self.body.velocity.x,
            self.body.velocity.y
        );
        self.notices.push(ActorNotice::JumpUp);
    }

    pub fn on_contact(&mut self, event: &ContactEvent<'_>) {
        match event.phase {
            ContactPhase::Enter => self.on_contact_enter(event.other, event.side),
            ContactPhase::Continuing => {
                self.clamp_against(event.other, event.side);
            }
            ContactPhase::Exit => {
                // Only leaving the floor affects groundedness.
                if event.side == Side::Bottom {
                    self.is_ground = false;
                }
            }
        }
    }

    fn on_contact_enter(&mut self, other: &Body, side: Side) {
        match side {
            Side::Left | Side::Right => {
                if !self.clamp_against(other, side) {
                    return;
                }
                if !self.is_ground && !self.is_bounced {
                    self.body.velocity.x *= -self.body.bounciness * other.bounciness;
                    self.is_bounced = true;
                    self.notices.push(ActorNotice::Bounce);
                } else {
                    self.body.velocity.x = 0.0;
                }
            }
            Side::Top => {
                if self.clamp_against(other, side) {
                    self.body.velocity.y = 0.0;
                    if !self.is_ground {
                        self.notices.push(ActorNotice::Bounce);
                    }
                }
            }
            Side::Bottom => {
                self.clamp_against(other, side);
                self.body.velocity.x = 0.0;
                self.is_ground = true;
                self.is_land = true;
                self.is_bounced = false;
                self.jump_direction = JumpDirection::Center;
                self.notices.push(ActorNotice::Land);
                if other.tag == Tag::Goal {
                    self.hit_goal = true;
                }
            }
        }
    }

    /// Push the actor flush against `other` on `side` if it is still moving
    /// into that face. Returns whether a correction applied.
    fn clamp_against(&mut self, other: &Body, side: Side) -> bool {
        let hw = self.body.half_width();
        let hh = self.body.half_height();
        let v = self.body.velocity;
        let p = &mut self.body.position;
        match side {
            Side::Left if v.x <= 0.0 && p.x <= other.right() + hw => {
                p.x = other.right() + hw;
                true
            }
            Side::Right if v.x >= 0.0 && p.x >= other.left() - hw => {
                p.x = other.left() - hw;
                true
            }
            Side::Top if v.y >= 0.0 && p.y >= other.bottom() - hh => {
                p.y = other.bottom() - hh;
                true
            }
            Side::Bottom if v.y <= 0.0 && p.y <= other.top() + hh => {
                p.y = other.top() + hh;
                true
            }
            _ => false,
        }
    }

    pub fn pose(&self) -> Pose {
        if self.is_ground {
            if self.is_charge {
                Pose::Charge
            } else if self.is_stop {
                Pose::Stand(self.facing)
            } else {
                Pose::Walk(self.facing)
            }
        } else if self.body.velocity.y < 0.0 {
            Pose::Fall(self.facing)
        } else {
            match self.jump_direction {
                JumpDirection::Right => Pose::Jump(Facing::Right),
                JumpDirection::Left => Pose::Jump(Facing::Left),
                JumpDirection::Center => Pose::Jump(self.facing),
            }
        }
    }

    pub fn current_image(&self) -> &'static str {
        self.animators.for_pose(self.pose()).current()
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, camera: WorldPoint, viewport: Viewport) {
        let g = world_to_graphic(WorldPoint(self.body.position), camera, viewport);
        surface.draw_image(
            self.current_image(),
            None,
            Rect::centered(g.0, self.body.width, self.body.height),
        );
    }
}

/// Sign-preserving clamp of `v` to `[-max, max]`.
fn limit(v: f32, max: f32) -> f32 {
    if v.abs() > max {
        max.copysign(v)
    } else {
        v
    }
}
