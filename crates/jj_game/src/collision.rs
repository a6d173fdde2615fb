//! Pairwise contact tracking between one active body and a candidate list.
//!
//! Each frame the detector recomputes, for every (active, candidate) pair,
//! which single side of the active body is in contact, then compares against
//! the stored per-pair record to emit an enter / continuing / exit event on
//! both participants. The only state carried across frames is the table of
//! `{touching, side}` records; geometry is never cached.
//!
//! Side determination is directional: a side only registers while the active
//! body's velocity points toward the other body, so a body receding from an
//! obstacle it still overlaps does not pick up a new side. Corner overlaps
//! (two adjacent sides true) are resolved by keeping the side whose
//! overlapping edge is longer.
//!
//! Records are never pruned. That is fine while the entity population is
//! static for the life of the detector, which holds for a play session.

use std::collections::HashMap;

use crate::actor::Actor;
use crate::body::{Body, EntityId, Side};
use crate::stage::Obstacle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Enter,
    Continuing,
    Exit,
}

/// Contact as seen by one participant: `side` is relative to the receiver.
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent<'a> {
    pub phase: ContactPhase,
    pub side: Side,
    pub other: &'a Body,
}

/// Something that can take part in a contact, dispatched by entity kind.
pub enum Participant<'a> {
    Actor(&'a mut Actor),
    Obstacle(&'a Obstacle),
}

impl Participant<'_> {
    pub fn body(&self) -> &Body {
        match self {
            Participant::Actor(actor) => &actor.body,
            Participant::Obstacle(obstacle) => &obstacle.body,
        }
    }

    fn respond(&mut self, event: &ContactEvent<'_>) {
        match self {
            Participant::Actor(actor) => actor.on_contact(event),
            // Obstacles are immovable and have no contact behavior.
            Participant::Obstacle(_) => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactRecord {
    pub touching: bool,
    pub side: Option<Side>,
}

#[derive(Debug, Default)]
pub struct CollisionDetector {
    records: HashMap<(EntityId, EntityId), ContactRecord>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve contacts between `active` and every candidate, in order.
    ///
    /// Responses run immediately, so a position correction from one pair is
    /// visible when the next pair is tested.
    pub fn detect(&mut self, active: &mut Participant<'_>, candidates: &[&Obstacle]) {
        for &obstacle in candidates {
            let active_id = active.body().id;
            let other_id = obstacle.body.id;
            if active_id == other_id {
                continue;
            }

            let forward = self.record(active_id, other_id);
            let backward = self.record(other_id, active_id);
            let was_touching = forward.touching && backward.touching;

            match (contact_side(active.body(), &obstacle.body), was_touching) {
                (Some(side), touching) => {
                    let phase = if touching {
                        ContactPhase::Continuing
                    } else {
                        ContactPhase::Enter
                    };
                    if phase == ContactPhase::Enter {
                        log::trace!("contact enter {active_id} -> {other_id} on {side:?}");
                    }
                    dispatch(active, obstacle, phase, side, side.opposite());
                    self.store(active_id, other_id, true, side);
                    self.store(other_id, active_id, true, side.opposite());
                }
                (None, true) => {
                    // Geometry no longer overlaps, so report the last known sides.
                    let (Some(side), Some(other_side)) = (forward.side, backward.side) else {
                        continue;
                    };
                    log::trace!("contact exit {active_id} -> {other_id} on {side:?}");
                    dispatch(active, obstacle, ContactPhase::Exit, side, other_side);
                    self.store(active_id, other_id, false, side);
                    self.store(other_id, active_id, false, other_side);
                }
                (None, false) => {}
            }
        }
    }

    #[allow(dead_code)]
    pub fn contact(&self, entity: EntityId, other: EntityId) -> Option<ContactRecord> {
        self.records.get(&(entity, other)).copied()
    }

    fn record(&mut self, entity: EntityId, other: EntityId) -> ContactRecord {
        *self.records.entry((entity, other)).or_default()
    }

    fn store(&mut self, entity: EntityId, other: EntityId, touching: bool, side: Side) {
        self.records.insert(
            (entity, other),
            ContactRecord {
                touching,
                side: Some(side),
            },
        );
    }
}

fn dispatch(
    active: &mut Participant<'_>,
    obstacle: &Obstacle,
    phase: ContactPhase,
    active_side: Side,
    other_side: Side,
) {
    active.respond(&ContactEvent {
        phase,
        side: active_side,
        other: &obstacle.body,
    });
    let snapshot = *active.body();
    Participant::Obstacle(obstacle).respond(&ContactEvent {
        phase,
        side: other_side,
        other: &snapshot,
    });
}

/// Which side of `body` touches `other`, if any, given `body`'s motion.
pub fn contact_side(body: &Body, other: &Body) -> Option<Side> {
    let v = body.velocity;
    let overlaps_x = body.left() < other.right() && body.right() > other.left();
    let overlaps_y = body.top() > other.bottom() && body.bottom() < other.top();

    let mut hit_top = v.y >= 0.0
        && body.bottom() < other.bottom()
        && body.top() >= other.bottom()
        && body.top() < other.top()
        && overlaps_x;
    let mut hit_bottom = v.y <= 0.0
        && body.top() > other.top()
        && body.bottom() <= other.top()
        && body.bottom() > other.bottom()
        && overlaps_x;
    let mut hit_left = v.x <= 0.0
        && body.right() > other.right()
        && body.left() <= other.right()
        && body.left() > other.left()
        && overlaps_y;
    let mut hit_right = v.x >= 0.0
        && body.left() < other.left()
        && body.right() >= other.left()
        && body.right() < other.right()
        && overlaps_y;

    // Corner catch: keep the side with the longer overlapping edge.
    if hit_right && hit_bottom {
        let right_len = body.height - (body.top() - other.top());
        let bottom_len = body.width - (other.left() - body.left());
        hit_right = right_len > bottom_len;
        hit_bottom = !hit_right;
    } else if hit_left && hit_bottom {
        let left_len = body.height - (body.top() - other.top());
        let bottom_len = body.width - (body.right() - other.right());
        hit_left = left_len > bottom_len;
        hit_bottom = !hit_left;
    } else if hit_left && hit_top {
        let left_len = body.height - (other.bottom() - body.bottom());
        let top_len = body.width - (body.right() - other.right());
        hit_left = left_len > top_len;
        hit_top = !hit_left;
    } else if hit_right && hit_top {
        let right_len = body.height - (other.bottom() - body.bottom());
        let top_len = body.width - (other.left() - body.left());
        hit_right = right_len > top_len;
        hit_top = !hit_right;
    }

    if hit_left {
        Some(Side::Left)
    } else if hit_top {
        Some(Side::Top)
    } else if hit_right {
        Some(Side::Right)
    } else if hit_bottom {
        Some(Side::Bottom)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, ActorConfig};
    use crate::body::Tag;
    use glam::Vec2;

    fn moving(position: Vec2, w: f32, h: f32, velocity: Vec2) -> Body {
        let mut body = Body::new(position, w, h);
        body.velocity = velocity;
        body
    }

    fn obstacle(x: f32, y: f32, w: f32, h: f32, tag: Tag) -> Obstacle {
        Obstacle::new(
            Body::new(Vec2::new(x, y), w, h)
                .with_tag(tag)
                .with_bounciness(0.7),
        )
    }

    #[test]
    fn falling_onto_platform_is_bottom_contact() {
        let a = moving(Vec2::new(100.0, 100.0), 40.0, 40.0, Vec2::new(0.0, -5.0));
        let b = Body::new(Vec2::new(100.0, 60.0), 200.0, 40.0);
        assert_eq!(contact_side(&a, &b), Some(Side::Bottom));

        let penetrating = moving(Vec2::new(100.0, 95.0), 40.0, 40.0, Vec2::new(0.0, -5.0));
        assert_eq!(contact_side(&penetrating, &b), Some(Side::Bottom));
    }

    #[test]
    fn rising_body_does_not_register_floor() {
        let a = moving(Vec2::new(100.0, 95.0), 40.0, 40.0, Vec2::new(0.0, 5.0));
        let b = Body::new(Vec2::new(100.0, 60.0), 200.0, 40.0);
        assert_eq!(contact_side(&a, &b), None);
    }

    #[test]
    fn mirrored_query_yields_opposite_side() {
        let a = moving(Vec2::new(130.0, 100.0), 40.0, 40.0, Vec2::new(-5.0, 0.0));
        let b = Body::new(Vec2::new(100.0, 100.0), 40.0, 200.0);
        let side = contact_side(&a, &b).expect("overlapping bodies should touch");
        assert_eq!(side, Side::Left);
        assert_eq!(contact_side(&b, &a), Some(side.opposite()));
    }

    #[test]
    fn separated_bodies_have_no_side() {
        let a = moving(Vec2::new(0.0, 0.0), 10.0, 10.0, Vec2::new(3.0, -3.0));
        let b = Body::new(Vec2::new(100.0, 0.0), 10.0, 10.0);
        assert_eq!(contact_side(&a, &b), None);
    }

    #[test]
    fn corner_overlap_prefers_longer_edge() {
        // 5px of horizontal overlap against 2px vertical: landing wins.
        let landing = moving(Vec2::new(85.0, 118.0), 40.0, 40.0, Vec2::new(3.0, -3.0));
        let block = Body::new(Vec2::new(120.0, 80.0), 40.0, 40.0);
        assert_eq!(contact_side(&landing, &block), Some(Side::Bottom));

        // 2px of horizontal overlap against 5px vertical: the wall wins.
        let sliding = moving(Vec2::new(82.0, 115.0), 40.0, 40.0, Vec2::new(3.0, -3.0));
        assert_eq!(contact_side(&sliding, &block), Some(Side::Right));
    }

    #[test]
    fn corner_overlap_left_and_bottom() {
        let block = Body::new(Vec2::new(120.0, 80.0), 40.0, 40.0);
        let landing = moving(Vec2::new(155.0, 118.0), 40.0, 40.0, Vec2::new(-3.0, -3.0));
        assert_eq!(contact_side(&landing, &block), Some(Side::Bottom));

        let sliding = moving(Vec2::new(158.0, 115.0), 40.0, 40.0, Vec2::new(-3.0, -3.0));
        assert_eq!(contact_side(&sliding, &block), Some(Side::Left));
    }

    #[test]
    fn corner_overlap_left_and_top() {
        let block = Body::new(Vec2::new(120.0, 80.0), 40.0, 40.0);
        let bumping = moving(Vec2::new(155.0, 42.0), 40.0, 40.0, Vec2::new(-3.0, 3.0));
        assert_eq!(contact_side(&bumping, &block), Some(Side::Top));

        let sliding = moving(Vec2::new(158.0, 45.0), 40.0, 40.0, Vec2::new(-3.0, 3.0));
        assert_eq!(contact_side(&sliding, &block), Some(Side::Left));
    }

    #[test]
    fn corner_overlap_right_and_top() {
        let block = Body::new(Vec2::new(120.0, 80.0), 40.0, 40.0);
        let bumping = moving(Vec2::new(85.0, 42.0), 40.0, 40.0, Vec2::new(3.0, 3.0));
        assert_eq!(contact_side(&bumping, &block), Some(Side::Top));

        let sliding = moving(Vec2::new(82.0, 45.0), 40.0, 40.0, Vec2::new(3.0, 3.0));
        assert_eq!(contact_side(&sliding, &block), Some(Side::Right));
    }

    #[test]
    fn enter_continue_exit_sequence() {
        let config = ActorConfig::default();
        let mut actor = Actor::new(Vec2::new(100.0, 95.0), 40.0, 40.0, config);
        actor.body.velocity = Vec2::new(0.0, -5.0);
        let floor = obstacle(100.0, 60.0, 200.0, 40.0, Tag::Ground);
        let mut detector = CollisionDetector::new();

        detector.detect(&mut Participant::Actor(&mut actor), &[&floor]);
        assert!(actor.is_ground);
        assert_eq!(actor.body.position.y, 100.0);
        let record = detector
            .contact(actor.body.id, floor.body.id)
            .expect("record after enter");
        assert_eq!(
            record,
            ContactRecord {
                touching: true,
                side: Some(Side::Bottom)
            }
        );
        assert_eq!(
            detector.contact(floor.body.id, actor.body.id),
            Some(ContactRecord {
                touching: true,
                side: Some(Side::Top)
            })
        );
        let notices = actor.drain_notices();
        assert_eq!(notices.len(), 1);

        // Resting: still touching, no new notices.
        actor.update();
        detector.detect(&mut Participant::Actor(&mut actor), &[&floor]);
        assert!(actor.is_ground);
        assert!(actor.drain_notices().is_empty());

        // Lift off: exit on the bottom clears groundedness.
        actor.body.position.y = 200.0;
        detector.detect(&mut Participant::Actor(&mut actor), &[&floor]);
        assert!(!actor.is_ground);
        let record = detector
            .contact(actor.body.id, floor.body.id)
            .expect("record after exit");
        assert!(!record.touching);
        assert_eq!(record.side, Some(Side::Bottom));
    }

    #[test]
    fn self_pairs_are_skipped() {
        let floor = obstacle(0.0, 0.0, 100.0, 100.0, Tag::Ground);
        let mut detector = CollisionDetector::new();
        detector.detect(&mut Participant::Obstacle(&floor), &[&floor]);
        assert!(detector.contact(floor.body.id, floor.body.id).is_none());
    }
}
