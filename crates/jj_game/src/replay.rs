use glam::Vec2;
use jj_core::input::{HostEvent, Key};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Scripted input: each frame lists the keys held during it.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub keys: Vec<String>,
    /// Canvas-local click delivered on the first repetition only.
    #[serde(default)]
    pub click: Option<[f32; 2]>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayInput {
    /// Held keys in `Key::ALL` order.
    pub held: Vec<Key>,
    pub click: Option<Vec2>,
}

impl ReplaySequence {
    pub fn expanded_inputs(&self) -> Vec<ReplayInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let keys: Vec<Key> = frame
                .keys
                .iter()
                .filter_map(|code| Key::from_code(code))
                .collect();
            let held: Vec<Key> = Key::ALL
                .iter()
                .copied()
                .filter(|key| keys.contains(key))
                .collect();
            for i in 0..frame.repeat.max(1) {
                out.push(ReplayInput {
                    held: held.clone(),
                    click: if i == 0 {
                        frame.click.map(Vec2::from)
                    } else {
                        None
                    },
                });
            }
        }
        out
    }

    pub fn total_frames(&self) -> usize {
        self.frames.iter().map(|f| f.repeat.max(1) as usize).sum()
    }
}

/// Host events that turn the `prev` held set into `next`, releases first.
pub fn events_between(prev: &ReplayInput, next: &ReplayInput) -> Vec<HostEvent> {
    let mut events = Vec::new();
    for key in &prev.held {
        if !next.held.contains(key) {
            events.push(HostEvent::KeyUp(*key));
        }
    }
    for key in &next.held {
        if !prev.held.contains(key) {
            events.push(HostEvent::KeyDown(*key));
        }
    }
    if let Some(click) = next.click {
        events.push(HostEvent::Click(click));
    }
    events
}

/// Steps through an expanded replay one frame at a time.
#[derive(Debug, Clone)]
pub struct ReplayDriver {
    inputs: Vec<ReplayInput>,
    cursor: usize,
    previous: ReplayInput,
}

impl ReplayDriver {
    pub fn new(replay: &ReplaySequence) -> Self {
        Self {
            inputs: replay.expanded_inputs(),
            cursor: 0,
            previous: ReplayInput::default(),
        }
    }

    #[allow(dead_code)]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.inputs.len()
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len().saturating_sub(self.cursor)
    }

    /// Events to dispatch before the next frame, or `None` once exhausted.
    pub fn next_events(&mut self) -> Option<Vec<HostEvent>> {
        let next = self.inputs.get(self.cursor)?.clone();
        self.cursor += 1;
        let events = events_between(&self.previous, &next);
        self.previous = next;
        Some(events)
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    for (i, frame) in replay.frames.iter().enumerate() {
        if let Some(code) = frame.keys.iter().find(|c| Key::from_code(c).is_none()) {
            return Err(format!(
                "Replay validation failed: frame {i} has unknown key '{code}'"
            ));
        }
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PlayScene, SceneConfig};
    use crate::stage::{builtin_stage_file, Stage};
    use jj_core::draw::CommandRecorder;
    use jj_core::input::EventHub;
    use jj_core::time::FrameStats;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "jj_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "keys": ["ArrowRight", "Space"], "repeat": 3 },
                { "keys": [], "click": [10.0, 20.0] }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 4);
        assert_eq!(replay.total_frames(), 4);
        assert_eq!(expanded[0].held, vec![Key::Space, Key::ArrowRight]);
        assert!(expanded[3].held.is_empty());
        assert_eq!(expanded[3].click, Some(Vec2::new(10.0, 20.0)));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let path = temp_file_path("unknown_key");
        fs::write(&path, r#"{ "frames": [ { "keys": ["KeyQ"] } ] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("unknown key should fail");
        assert!(err.contains("unknown key 'KeyQ'"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn events_between_releases_then_presses() {
        let prev = ReplayInput {
            held: vec![Key::Space, Key::ArrowLeft],
            click: None,
        };
        let next = ReplayInput {
            held: vec![Key::ArrowLeft, Key::ArrowRight],
            click: None,
        };
        assert_eq!(
            events_between(&prev, &next),
            vec![
                HostEvent::KeyUp(Key::Space),
                HostEvent::KeyDown(Key::ArrowRight)
            ]
        );
        assert!(events_between(&next, &next).is_empty());
    }

    #[test]
    fn driver_ends_after_last_frame() {
        let replay = ReplaySequence {
            frames: vec![ReplayFrame {
                keys: vec!["Space".to_string()],
                click: None,
                repeat: 2,
            }],
        };
        let mut driver = ReplayDriver::new(&replay);
        assert_eq!(
            driver.next_events(),
            Some(vec![HostEvent::KeyDown(Key::Space)])
        );
        assert_eq!(driver.next_events(), Some(Vec::new()));
        assert!(driver.is_finished());
        assert_eq!(driver.next_events(), None);
    }

    fn run_replay(replay: &ReplaySequence) -> (Vec2, Vec2, bool) {
        let file = builtin_stage_file().expect("built-in stage");
        let hub = EventHub::new();
        let mut scene = PlayScene::setup(SceneConfig::default(), Stage::from_file(&file), &hub);
        let mut driver = ReplayDriver::new(replay);
        let mut surface = CommandRecorder::new();
        while let Some(events) = driver.next_events() {
            for event in &events {
                hub.dispatch(event);
            }
            surface.clear();
            scene.update(FrameStats::default(), &mut surface);
        }
        let actor = scene.actor();
        (actor.body.position, actor.body.velocity, actor.is_ground)
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay: ReplaySequence = serde_json::from_str(
            r#"{
              "frames": [
                { "keys": [], "repeat": 60 },
                { "keys": ["ArrowRight"], "repeat": 40 },
                { "keys": ["Space"], "repeat": 30 },
                { "keys": ["Space", "ArrowRight"], "repeat": 1 },
                { "keys": [], "repeat": 120 },
                { "keys": ["Space", "ArrowUp"], "repeat": 36 },
                { "keys": [], "repeat": 90 }
              ]
            }"#,
        )
        .expect("inline replay");

        let (pos_a, vel_a, ground_a) = run_replay(&replay);
        let (pos_b, vel_b, ground_b) = run_replay(&replay);

        assert!((pos_a - pos_b).length() < 0.0001);
        assert!((vel_a - vel_b).length() < 0.0001);
        assert_eq!(ground_a, ground_b);
    }
}
