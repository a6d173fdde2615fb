//! The play scene: one synchronous pass per frame.
//!
//! Order within a frame is fixed: goal check, buffered input, gimmicks,
//! actor integration, collision resolution, camera chase, draw. The scene
//! owns all mutable game state (actor, stage, camera, contact table) and its
//! host-event subscriptions; dropping the scene cancels them.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use jj_core::coords::{GraphicPoint, Viewport, WorldPoint};
use jj_core::draw::{Color, DrawSurface, Rect};
use jj_core::input::{EventHub, InputState, Key, Subscription};
use jj_core::time::FrameStats;
use jj_devtools::{DebugOverlay, OverlayStats};

use crate::actor::{Actor, ActorConfig, ActorNotice, Facing, JumpDirection};
use crate::camera::Camera;
use crate::collision::{CollisionDetector, Participant};
use crate::stage::Stage;

#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    pub viewport: Viewport,
    pub spawn: Vec2,
    pub actor_size: Vec2,
    pub actor: ActorConfig,
}

impl SceneConfig {
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// The camera starts centred on the first screen of the stage.
    pub fn camera_origin(&self) -> WorldPoint {
        WorldPoint(self.viewport.center())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(960.0, 720.0),
            spawn: Vec2::new(100.0, 100.0),
            actor_size: Vec2::new(40.0, 40.0),
            actor: ActorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneNotice {
    Actor(ActorNotice),
    StageCleared,
}

/// What happened during one frame, for the host to react to (audio cues,
/// logging, replay checks).
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub notices: Vec<SceneNotice>,
    pub actor_position: Vec2,
    pub camera_y: f32,
}

impl FrameReport {
    pub fn stage_cleared(&self) -> bool {
        self.notices.contains(&SceneNotice::StageCleared)
    }
}

#[derive(Debug, Clone)]
struct TextObject {
    point: GraphicPoint,
    text: &'static str,
    size_pt: f32,
    active: bool,
}

impl TextObject {
    fn draw(&self, surface: &mut dyn DrawSurface) {
        if self.active {
            surface.fill_text(self.text, self.point.0, self.size_pt, Color::BLACK);
        }
    }
}

pub struct PlayScene {
    config: SceneConfig,
    actor: Actor,
    stage: Stage,
    camera: Camera,
    detector: CollisionDetector,
    goal_text: TextObject,
    input: Rc<RefCell<InputState>>,
    input_enabled: bool,
    overlay: DebugOverlay,
    _subscriptions: Vec<Subscription>,
}

impl PlayScene {
    pub fn setup(config: SceneConfig, stage: Stage, hub: &EventHub) -> Self {
        let input = Rc::new(RefCell::new(InputState::new()));
        let sink = Rc::clone(&input);
        let subscription = hub.subscribe(move |event| sink.borrow_mut().apply(event));

        log::info!(
            "Play scene setup: stage '{}' ({} obstacles, {} gimmicks)",
            stage.stage_id,
            stage.obstacles.len(),
            stage.gimmicks.len()
        );

        Self {
            actor: Actor::new(
                config.spawn,
                config.actor_size.x,
                config.actor_size.y,
                config.actor,
            ),
            stage,
            camera: Camera::new(config.camera_origin(), config.viewport),
            detector: CollisionDetector::new(),
            goal_text: TextObject {
                point: GraphicPoint::new(220.0, 200.0),
                text: "Congratulations!",
                size_pt: 50.0,
                active: false,
            },
            input,
            input_enabled: true,
            overlay: DebugOverlay::new(),
            _subscriptions: vec![subscription],
            config,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[allow(dead_code)]
    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    #[allow(dead_code)]
    pub fn overlay(&self) -> &DebugOverlay {
        &self.overlay
    }

    pub fn update(&mut self, stats: FrameStats, surface: &mut dyn DrawSurface) -> FrameReport {
        let mut notices = Vec::new();
        let viewport = self.config.viewport;

        if self.actor.hit_goal {
            log::info!("Goal reached, input disabled");
            self.input_enabled = false;
            self.goal_text.active = true;
            self.actor.hit_goal = false;
            notices.push(SceneNotice::StageCleared);
        }

        self.apply_input();

        self.stage
            .trigger_gimmicks(std::slice::from_mut(&mut self.actor));
        self.actor.update();

        let candidates = self.stage.obstacles_around(self.camera.position, viewport);
        self.detector
            .detect(&mut Participant::Actor(&mut self.actor), &candidates);

        self.camera.chase(self.actor.body.position);

        for notice in self.actor.drain_notices() {
            log::debug!("actor {:?} at {:?}", notice, self.actor.body.position);
            notices.push(SceneNotice::Actor(notice));
        }

        let overlay_stats = OverlayStats {
            frame: stats,
            actor_position: self.actor.body.position,
            camera_y: self.camera.position.0.y,
        };
        self.draw(surface, &overlay_stats);

        FrameReport {
            notices,
            actor_position: overlay_stats.actor_position,
            camera_y: overlay_stats.camera_y,
        }
    }

    fn apply_input(&mut self) {
        let mut input = self.input.borrow_mut();

        if input.is_just_pressed(Key::F3) {
            self.overlay.toggle();
        }
        if let Some(click) = input.take_click() {
            self.overlay
                .record_click(click, self.camera.position, self.config.viewport);
        }

        if self.input_enabled {
            let actor = &mut self.actor;
            if input.is_held(Key::Space) {
                actor.charge();
            } else {
                actor.jump();
            }

            let right = input.is_held(Key::ArrowRight);
            let left = input.is_held(Key::ArrowLeft);
            if !right && !left {
                actor.stop();
            }
            if right {
                actor.walk(Facing::Right);
                actor.set_jump_direction(JumpDirection::Right);
            }
            if left {
                actor.walk(Facing::Left);
                actor.set_jump_direction(JumpDirection::Left);
            }
            if input.is_held(Key::ArrowUp) {
                actor.set_jump_direction(JumpDirection::Center);
            }
        }

        input.end_frame();
    }

    fn draw(&self, surface: &mut dyn DrawSurface, stats: &OverlayStats) {
        let viewport = self.config.viewport;
        surface.fill_rect(
            Rect::new(0.0, 0.0, viewport.width, viewport.height),
            Color::WHITE,
        );
        self.stage.draw(surface, self.camera.position, viewport);
        self.actor.draw(surface, self.camera.position, viewport);
        self.goal_text.draw(surface);
        self.overlay.draw(surface, stats);
    }
}

impl Drop for PlayScene {
    fn drop(&mut self) {
        log::info!("Play scene torn down");
    }
}
