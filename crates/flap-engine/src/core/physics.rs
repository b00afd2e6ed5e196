use std::collections::HashSet;

use glam::Vec2;

use crate::api::types::{CollisionPair, EntityId, WatchId};
use crate::core::scene::Scene;

/// One registered overlap watch: one entity against a set of others.
struct Watch {
    id: WatchId,
    subject: EntityId,
    others: Vec<EntityId>,
    /// Pairs currently in contact, for enter-edge detection.
    touching: HashSet<EntityId>,
}

/// Arcade-style physics: per-entity gravity flag, explicit Euler
/// integration, and AABB overlap watches. There is no contact
/// resolution; overlaps are reported, never pushed apart.
pub struct Physics {
    /// World gravity in units/s² (y-down positive).
    gravity: Vec2,
    watches: Vec<Watch>,
    next_watch: u32,
}

impl Physics {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            watches: Vec::new(),
            next_watch: 0,
        }
    }

    /// Register an overlap watch between `subject` and each of `others`.
    pub fn watch(&mut self, subject: EntityId, others: &[EntityId]) -> WatchId {
        let id = WatchId(self.next_watch);
        self.next_watch += 1;
        self.watches.push(Watch {
            id,
            subject,
            others: others.to_vec(),
            touching: HashSet::new(),
        });
        id
    }

    /// Remove a watch. Safe to call with an already-removed handle.
    pub fn unwatch(&mut self, id: WatchId) -> bool {
        let before = self.watches.len();
        self.watches.retain(|w| w.id != id);
        self.watches.len() != before
    }

    /// Number of live watches.
    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// Advance every entity by `dt` seconds and report overlaps that
    /// began this step, in watch-registration order.
    pub fn step(&mut self, dt: f32, scene: &mut Scene, events: &mut Vec<CollisionPair>) {
        for entity in scene.iter_mut() {
            if entity.gravity_enabled {
                entity.vel += self.gravity * dt;
            }
            entity.pos += entity.vel * dt;
        }

        for watch in &mut self.watches {
            let Some(subject) = scene.get(watch.subject) else {
                watch.touching.clear();
                continue;
            };
            for &other_id in &watch.others {
                let overlapping = scene
                    .get(other_id)
                    .map(|other| subject.overlaps(other))
                    .unwrap_or(false);
                if overlapping {
                    if watch.touching.insert(other_id) {
                        events.push(CollisionPair {
                            watch: watch.id,
                            entity_a: watch.subject,
                            entity_b: other_id,
                        });
                    }
                } else {
                    watch.touching.remove(&other_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    fn world() -> (Physics, Scene, Vec<CollisionPair>) {
        (Physics::new(Vec2::new(0.0, 100.0)), Scene::new(), Vec::new())
    }

    #[test]
    fn gravity_only_when_enabled() {
        let (mut physics, mut scene, mut events) = world();
        scene.spawn(Entity::new(EntityId(1)).with_gravity(true));
        scene.spawn(Entity::new(EntityId(2)).with_gravity(false));

        for _ in 0..10 {
            physics.step(0.1, &mut scene, &mut events);
        }

        let falling = scene.get(EntityId(1)).unwrap();
        let floating = scene.get(EntityId(2)).unwrap();
        assert!(falling.pos.y > 0.0, "should fall: y={}", falling.pos.y);
        assert_eq!(floating.pos.y, 0.0);
    }

    #[test]
    fn velocity_moves_immovable_entities() {
        // Immovable is a contact-response flag only; scrolling obstacles
        // still advance by their velocity.
        let (mut physics, mut scene, mut events) = world();
        scene.spawn(
            Entity::new(EntityId(1))
                .with_vel(Vec2::new(-200.0, 0.0))
                .with_immovable(true),
        );
        physics.step(0.5, &mut scene, &mut events);
        let e = scene.get(EntityId(1)).unwrap();
        assert!((e.pos.x + 100.0).abs() < 0.001, "x={}", e.pos.x);
    }

    #[test]
    fn collision_fires_once_per_contact() {
        let (mut physics, mut scene, mut events) = world();
        scene.spawn(
            Entity::new(EntityId(1))
                .with_size(Vec2::new(10.0, 10.0))
                .with_vel(Vec2::new(10.0, 0.0)),
        );
        scene.spawn(
            Entity::new(EntityId(2))
                .with_pos(Vec2::new(30.0, 0.0))
                .with_size(Vec2::new(10.0, 10.0))
                .with_immovable(true),
        );
        physics.watch(EntityId(1), &[EntityId(2)]);

        for _ in 0..40 {
            physics.step(0.1, &mut scene, &mut events);
        }

        // Mover passes straight through; the contact begins exactly once.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity_a, EntityId(1));
        assert_eq!(events[0].entity_b, EntityId(2));
    }

    #[test]
    fn unwatch_is_idempotent() {
        let (mut physics, _, _) = world();
        let id = physics.watch(EntityId(1), &[EntityId(2)]);
        assert_eq!(physics.watch_count(), 1);
        assert!(physics.unwatch(id));
        assert!(!physics.unwatch(id));
        assert_eq!(physics.watch_count(), 0);
    }

    #[test]
    fn watch_survives_missing_entities() {
        let (mut physics, mut scene, mut events) = world();
        physics.watch(EntityId(7), &[EntityId(8)]);
        physics.step(0.1, &mut scene, &mut events);
        assert!(events.is_empty());
    }
}
