//! Level geometry: immovable obstacles and wind gimmicks.
//!
//! Stages are authored as JSON (see `assets/stages/`). The built-in stage is
//! embedded in the binary; others can be loaded from disk. Both go through
//! the same validation before a [`Stage`] is built.
//!
//! Culling is by vertical distance from the camera only. Obstacles within
//! ±1.5 viewport heights are both collision candidates and drawn; gimmicks
//! are drawn only inside the viewport band.

use std::f32::consts::{PI, TAU};
use std::fs;
use std::path::Path;

use glam::Vec2;
use jj_core::coords::{world_to_graphic, Viewport, WorldPoint};
use jj_core::draw::{Color, DrawSurface, Rect};
use serde::Deserialize;

use crate::actor::Actor;
use crate::body::{Body, Tag};

const BUILTIN_STAGE: &str = include_str!("../../../assets/stages/jumpjack.json");
const OBSTACLE_COLOR: Color = Color::rgb(20, 20, 20);
const WIND_IMAGE: &str = "wind";
const WIND_TEXTURE_SPAN: f32 = 3000.0;
const WIND_PHASE_STEP: f32 = PI / 180.0 / 3.0;
const WIND_SCROLL_SCALE: f32 = 200.0;

#[derive(Debug, Deserialize, Clone)]
pub struct StageFile {
    pub version: String,
    pub stage_id: String,
    pub obstacles: Vec<ObstacleRecord>,
    #[serde(default)]
    pub winds: Vec<WindRecord>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ObstacleRecord {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default)]
    pub tag: Tag,
    #[serde(default = "default_bounciness")]
    pub bounciness: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct WindRecord {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub strength: f32,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub body: Body,
}

impl Obstacle {
    pub fn new(body: Body) -> Self {
        Self { body }
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, camera: WorldPoint, viewport: Viewport) {
        let g = world_to_graphic(WorldPoint(self.body.position), camera, viewport);
        let rect = Rect::centered(g.0, self.body.width, self.body.height);
        if rect.bottom() < 0.0 || rect.y > viewport.height {
            return;
        }
        surface.fill_rect(rect, OBSTACLE_COLOR);
    }
}

/// Trigger volume that pushes actors sideways with a slow sinusoidal gust.
#[derive(Debug, Clone)]
pub struct Wind {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub strength: f32,
    phase: f32,
    scroll_offset: f32,
}

impl Wind {
    pub fn new(position: Vec2, width: f32, height: f32, strength: f32) -> Self {
        Self {
            position,
            width,
            height,
            strength,
            phase: 0.0,
            scroll_offset: 0.0,
        }
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Current horizontal push applied per frame.
    pub fn push(&self) -> f32 {
        self.phase.sin() * self.strength
    }

    fn update(&mut self) {
        self.phase += WIND_PHASE_STEP;
        if self.phase > TAU {
            self.phase = 0.0;
        }
        self.scroll_offset += self.push() * WIND_SCROLL_SCALE;
    }

    fn contains(&self, point: Vec2) -> bool {
        let half = Vec2::new(self.width, self.height) / 2.0;
        let min = self.position - half;
        let max = self.position + half;
        min.x < point.x && max.x > point.x && min.y < point.y && max.y > point.y
    }

    fn draw(&self, surface: &mut dyn DrawSurface, camera: WorldPoint, viewport: Viewport) {
        let g = world_to_graphic(WorldPoint(self.position), camera, viewport);
        let mut source_x = WIND_TEXTURE_SPAN - self.scroll_offset;
        if source_x < 0.0 {
            source_x = source_x.rem_euclid(WIND_TEXTURE_SPAN);
        }
        surface.draw_image(
            WIND_IMAGE,
            Some(Rect::new(source_x, 0.0, self.width, self.height)),
            Rect::centered(g.0, self.width, self.height),
        );
    }
}

#[derive(Debug, Clone)]
pub enum Gimmick {
    Wind(Wind),
}

impl Gimmick {
    pub fn position(&self) -> Vec2 {
        match self {
            Gimmick::Wind(wind) => wind.position,
        }
    }

    fn update(&mut self) {
        match self {
            Gimmick::Wind(wind) => wind.update(),
        }
    }

    /// Tested against the actor's centre point, not its full box.
    fn affects(&self, actor: &Actor) -> bool {
        match self {
            Gimmick::Wind(wind) => wind.contains(actor.body.position),
        }
    }

    fn trigger(&self, actor: &mut Actor) {
        match self {
            Gimmick::Wind(wind) => actor.body.velocity.x += wind.push(),
        }
    }

    fn draw(&self, surface: &mut dyn DrawSurface, camera: WorldPoint, viewport: Viewport) {
        match self {
            Gimmick::Wind(wind) => wind.draw(surface, camera, viewport),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub stage_id: String,
    pub obstacles: Vec<Obstacle>,
    pub gimmicks: Vec<Gimmick>,
}

impl Stage {
    pub fn from_file(file: &StageFile) -> Self {
        let obstacles = file
            .obstacles
            .iter()
            .map(|r| {
                Obstacle::new(
                    Body::new(Vec2::new(r.x, r.y), r.w, r.h)
                        .with_tag(r.tag)
                        .with_bounciness(r.bounciness),
                )
            })
            .collect();
        let gimmicks = file
            .winds
            .iter()
            .map(|r| Gimmick::Wind(Wind::new(Vec2::new(r.x, r.y), r.w, r.h, r.strength)))
            .collect();
        Self {
            stage_id: file.stage_id.clone(),
            obstacles,
            gimmicks,
        }
    }

    /// Advance every gimmick one frame and apply it to the actors it contains.
    pub fn trigger_gimmicks(&mut self, actors: &mut [Actor]) {
        for gimmick in &mut self.gimmicks {
            gimmick.update();
            for actor in actors.iter_mut() {
                if gimmick.affects(actor) {
                    gimmick.trigger(actor);
                }
            }
        }
    }

    /// Collision candidates: obstacles within 1.5 viewport heights of the camera.
    pub fn obstacles_around(&self, camera: WorldPoint, viewport: Viewport) -> Vec<&Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| within_band(o.body.position.y, camera, 1.5 * viewport.height))
            .collect()
    }

    pub fn gimmicks_in_view(&self, camera: WorldPoint, viewport: Viewport) -> Vec<&Gimmick> {
        self.gimmicks
            .iter()
            .filter(|g| within_band(g.position().y, camera, 0.5 * viewport.height))
            .collect()
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface, camera: WorldPoint, viewport: Viewport) {
        for gimmick in self.gimmicks_in_view(camera, viewport) {
            gimmick.draw(surface, camera, viewport);
        }
        for obstacle in self.obstacles_around(camera, viewport) {
            obstacle.draw(surface, camera, viewport);
        }
    }
}

fn within_band(y: f32, camera: WorldPoint, half_band: f32) -> bool {
    y >= camera.0.y - half_band && y <= camera.0.y + half_band
}

pub fn builtin_stage_file() -> Result<StageFile, String> {
    parse_stage(BUILTIN_STAGE, "built-in stage")
}

pub fn load_stage_from_path(path: &Path) -> Result<StageFile, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_stage(&raw, &path.display().to_string())
}

fn parse_stage(raw: &str, origin: &str) -> Result<StageFile, String> {
    let file: StageFile = serde_json::from_str(raw)
        .map_err(|e| format!("Failed to parse stage JSON {origin}: {e}"))?;
    validate_stage(&file)?;
    Ok(file)
}

fn validate_stage(file: &StageFile) -> Result<(), String> {
    if file.obstacles.is_empty() {
        return Err("Stage validation failed: obstacles list is empty".to_string());
    }
    for (i, o) in file.obstacles.iter().enumerate() {
        if o.w <= 0.0 || o.h <= 0.0 {
            return Err(format!(
                "Stage validation failed: obstacle {i} has non-positive size {}x{}",
                o.w, o.h
            ));
        }
        if !(0.0..=1.0).contains(&o.bounciness) {
            return Err(format!(
                "Stage validation failed: obstacle {i} bounciness {} outside [0, 1]",
                o.bounciness
            ));
        }
    }
    for (i, w) in file.winds.iter().enumerate() {
        if w.w <= 0.0 || w.h <= 0.0 {
            return Err(format!(
                "Stage validation failed: wind {i} has non-positive size {}x{}",
                w.w, w.h
            ));
        }
    }
    if !file.obstacles.iter().any(|o| o.tag == Tag::Goal) {
        log::warn!(
            "Stage '{}' has no goal obstacle. It cannot be cleared.",
            file.stage_id
        );
    }
    Ok(())
}

const fn default_bounciness() -> f32 {
    1.0
}
