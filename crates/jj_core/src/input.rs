//! Host input: named keys, a last-value-wins key buffer, and scoped
//! subscriptions to host events.
//!
//! The host delivers key and mouse events asynchronously through an
//! [`EventHub`]. A scene subscribes once at setup and keeps the returned
//! [`Subscription`] handles; dropping a handle (normally by dropping the scene)
//! removes the listener, so nothing leaks across scene transitions.
//!
//! [`InputState`] is the buffer listeners write into. It is consumed at the
//! start of the next frame:
//!
//! - **Level-triggered (held):** `is_held(key)` reflects the last event seen
//!   for that key. Rapid taps between two frames are not queued.
//! - **Edge-triggered (just_pressed):** true only until `end_frame()`. Used for
//!   toggles such as the debug overlay.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    F3,
}

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::Space,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::ArrowUp,
        Key::F3,
    ];

    /// Map a DOM-style key code (`"Space"`, `"ArrowLeft"`, ...) to a key.
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "Space" => Some(Key::Space),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "F3" => Some(Key::F3),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Key::Space => "Space",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowUp => "ArrowUp",
            Key::F3 => "F3",
        }
    }
}

/// Event delivered by the host outside the frame boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Click position in canvas-local pixels (Y-down).
    Click(Vec2),
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    last_click: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &HostEvent) {
        match *event {
            HostEvent::KeyDown(key) => self.key_down(key),
            HostEvent::KeyUp(key) => self.key_up(key),
            HostEvent::Click(position) => self.last_click = Some(position),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Take the most recent click, if any arrived since the last call.
    pub fn take_click(&mut self) -> Option<Vec2> {
        self.last_click.take()
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

type Listener = Rc<RefCell<dyn FnMut(&HostEvent)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Fan-out point for host events.
#[derive(Default, Clone)]
pub struct EventHub {
    registry: Rc<RefCell<Registry>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the subscription removes the listener immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&HostEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry.listeners.push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn dispatch(&self, event: &HostEvent) {
        // Snapshot so listeners may subscribe or cancel while we iterate.
        let listeners: Vec<Listener> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            (&mut *listener.borrow_mut())(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Handle for one registered listener. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
