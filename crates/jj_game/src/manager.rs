//! Game state and the outer frame loop.

use jj_core::draw::DrawSurface;
use jj_core::input::EventHub;
use jj_core::time::{FrameClock, FrameStats};

use crate::scene::{FrameReport, PlayScene, SceneConfig};
use crate::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Play,
    /// Goal reached. The play scene keeps running with input disabled.
    Cleared,
}

#[derive(Debug)]
pub struct GameManager {
    state: GameState,
    on_transition: bool,
}

impl GameManager {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            on_transition: true,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn set_state(&mut self, state: GameState) {
        log::info!("Game state {:?} -> {:?}", self.state, state);
        self.state = state;
        self.on_transition = true;
    }

    /// Returns whether a transition is pending, clearing the flag.
    pub fn take_transition(&mut self) -> bool {
        std::mem::replace(&mut self.on_transition, false)
    }
}

/// Owns the game manager and the active scene for one session.
pub struct GameLoop {
    config: SceneConfig,
    stage: Stage,
    hub: EventHub,
    manager: GameManager,
    scene: Option<PlayScene>,
    clock: FrameClock,
    running: bool,
}

impl GameLoop {
    pub fn new(config: SceneConfig, stage: Stage, hub: EventHub) -> Self {
        Self {
            config,
            stage,
            hub,
            manager: GameManager::new(GameState::Play),
            scene: None,
            clock: FrameClock::new(),
            running: false,
        }
    }

    pub fn start(&mut self) {
        log::info!("Game loop starting ({})", self.stage.stage_id);
        self.running = true;
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> GameState {
        self.manager.state()
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    pub fn scene(&self) -> Option<&PlayScene> {
        self.scene.as_ref()
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count
    }

    /// Run one frame timed by the wall clock.
    pub fn frame(&mut self, surface: &mut dyn DrawSurface) -> Option<FrameReport> {
        if !self.running {
            return None;
        }
        let stats = self.clock.begin_frame();
        self.frame_with_stats(stats, surface)
    }

    /// Run one frame with caller-provided timing. Returns `None` once stopped.
    pub fn frame_with_stats(
        &mut self,
        stats: FrameStats,
        surface: &mut dyn DrawSurface,
    ) -> Option<FrameReport> {
        if !self.running {
            return None;
        }

        if self.manager.take_transition() && self.manager.state() == GameState::Play {
            self.scene = Some(PlayScene::setup(
                self.config,
                self.stage.clone(),
                &self.hub,
            ));
        }

        let Some(scene) = self.scene.as_mut() else {
            log::error!(
                "No active scene for state {:?}, stopping",
                self.manager.state()
            );
            self.end();
            return None;
        };

        let report = scene.update(stats, surface);
        if report.stage_cleared() && self.manager.state() != GameState::Cleared {
            self.manager.set_state(GameState::Cleared);
        }
        Some(report)
    }

    /// Stop updating and tear the scene down, cancelling its subscriptions.
    pub fn end(&mut self) {
        if self.running {
            log::info!("Game loop stopped after {} frames", self.clock.frame_count);
        }
        self.running = false;
        self.scene = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Tag;
    use crate::stage::{ObstacleRecord, StageFile};
    use jj_core::draw::CommandRecorder;

    fn goal_floor_stage() -> Stage {
        Stage::from_file(&StageFile {
            version: "0.1".to_string(),
            stage_id: "goal_floor".to_string(),
            obstacles: vec![ObstacleRecord {
                x: 480.0,
                y: 0.0,
                w: 1000.0,
                h: 100.0,
                tag: Tag::Goal,
                bounciness: 0.7,
            }],
            winds: Vec::new(),
        })
    }

    #[test]
    fn manager_transition_flag_is_one_shot() {
        let mut manager = GameManager::new(GameState::Play);
        assert!(manager.take_transition());
        assert!(!manager.take_transition());
        manager.set_state(GameState::Cleared);
        assert_eq!(manager.state(), GameState::Cleared);
        assert!(manager.take_transition());
    }

    #[test]
    fn loop_does_nothing_before_start() {
        let mut game = GameLoop::new(SceneConfig::default(), goal_floor_stage(), EventHub::new());
        let mut surface = CommandRecorder::new();
        assert!(game.frame(&mut surface).is_none());
        assert!(game.scene().is_none());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn first_frame_sets_up_scene() {
        let mut game = GameLoop::new(SceneConfig::default(), goal_floor_stage(), EventHub::new());
        game.start();
        let mut surface = CommandRecorder::new();
        let report = game.frame_with_stats(FrameStats::default(), &mut surface);
        assert!(report.is_some());
        assert!(game.scene().is_some());
        assert_eq!(game.hub().listener_count(), 1);
    }

    #[test]
    fn reaching_goal_moves_to_cleared() {
        let mut game = GameLoop::new(SceneConfig::default(), goal_floor_stage(), EventHub::new());
        game.start();
        let mut surface = CommandRecorder::new();
        for _ in 0..120 {
            surface.clear();
            game.frame_with_stats(FrameStats::default(), &mut surface);
        }
        assert_eq!(game.state(), GameState::Cleared);
        let scene = game.scene().expect("scene survives the goal");
        assert!(!scene.is_input_enabled());
    }

    #[test]
    fn end_tears_down_scene_and_stops_updates() {
        let mut game = GameLoop::new(SceneConfig::default(), goal_floor_stage(), EventHub::new());
        game.start();
        let mut surface = CommandRecorder::new();
        game.frame_with_stats(FrameStats::default(), &mut surface);
        game.end();
        assert!(!game.is_running());
        assert!(game.scene().is_none());
        assert_eq!(game.hub().listener_count(), 0);
        assert!(game
            .frame_with_stats(FrameStats::default(), &mut surface)
            .is_none());
    }
}
