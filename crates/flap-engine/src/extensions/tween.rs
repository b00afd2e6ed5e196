// extensions/tween.rs
//
// Tween system: timed value transitions addressed by EntityId.
// Supports a start delay and in-place restart, so a controller can
// re-trigger the same motion on every input without queueing.

use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::easing::{ease, Easing};

/// What property a tween animates.
#[derive(Debug, Clone, Copy)]
pub enum TweenTarget {
    /// Animate Entity.pos.y only.
    PositionY { from: f32, to: f32 },
    /// Animate Entity.rotation.
    Rotation { from: f32, to: f32 },
}

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Reverse direction and run again (ping-pong).
    PingPong,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    /// What to animate.
    pub target: TweenTarget,
    /// Duration in seconds, not counting the delay.
    pub duration: f32,
    /// Seconds to wait before the value starts moving.
    pub delay: f32,
    /// Elapsed time since the last (re)start.
    pub elapsed: f32,
    /// Easing function.
    pub easing: Easing,
    /// Loop behavior.
    pub loop_mode: TweenLoop,
    /// Whether currently playing (can be paused).
    pub playing: bool,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
}

impl Tween {
    /// Create a vertical position tween.
    pub fn position_y(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            target: TweenTarget::PositionY { from, to },
            duration,
            delay: 0.0,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            playing: true,
            forward: true,
        }
    }

    /// Create a rotation tween.
    pub fn rotation(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            target: TweenTarget::Rotation { from, to },
            duration,
            delay: 0.0,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            playing: true,
            forward: true,
        }
    }

    // -- Builder methods --

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn paused(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Normalized progress [0, 1] past the delay.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Handle to a tween for later control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Manages all active tweens, advanced in registration order.
#[derive(Default)]
pub struct TweenState {
    tweens: Vec<(TweenId, EntityId, Tween)>,
    next_id: u32,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for an entity. Returns a handle for later control.
    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push((id, entity, tween));
        id
    }

    /// Remove a tween by handle. Safe to call with a stale handle.
    pub fn remove(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|(tid, _, _)| *tid != id);
        self.tweens.len() != before
    }

    /// Rewind a tween to before its delay and start it playing.
    /// The latest restart always wins; prior progress is discarded.
    pub fn restart(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.elapsed = 0.0;
            tween.forward = true;
            tween.playing = true;
        }
    }

    /// Pause a tween in place.
    pub fn pause(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.playing = false;
        }
    }

    /// Resume a paused tween from where it stopped.
    pub fn resume(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.playing = true;
        }
    }

    /// Get a tween by handle.
    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens
            .iter()
            .find(|(tid, _, _)| *tid == id)
            .map(|(_, _, t)| t)
    }

    fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens
            .iter_mut()
            .find(|(tid, _, _)| *tid == id)
            .map(|(_, _, t)| t)
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether there are no active tweens.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Clear all tweens.
    pub fn clear(&mut self) {
        self.tweens.clear();
    }

    /// Advance all playing tweens and apply them to scene entities.
    /// Tweens whose entity was despawned are skipped, not faulted.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        for (_, entity_id, tween) in self.tweens.iter_mut() {
            if !tween.playing {
                continue;
            }

            tween.elapsed += dt;
            if tween.elapsed < tween.delay {
                continue;
            }

            let raw_t = if tween.duration > 0.0 {
                (tween.elapsed - tween.delay) / tween.duration
            } else {
                1.0
            };
            let t = if tween.forward {
                raw_t.clamp(0.0, 1.0)
            } else {
                (1.0 - raw_t).clamp(0.0, 1.0)
            };

            if let Some(entity) = scene.get_mut(*entity_id) {
                match tween.target {
                    TweenTarget::PositionY { from, to } => {
                        entity.pos.y = ease(from, to, t, tween.easing);
                    }
                    TweenTarget::Rotation { from, to } => {
                        entity.rotation = ease(from, to, t, tween.easing);
                    }
                }
            }

            if tween.elapsed - tween.delay >= tween.duration {
                match tween.loop_mode {
                    TweenLoop::Once => {
                        tween.playing = false;
                    }
                    TweenLoop::PingPong => {
                        tween.elapsed = tween.delay;
                        tween.forward = !tween.forward;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;

    fn scene_with(id: EntityId) -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(id));
        scene
    }

    #[test]
    fn tween_rotation_to_completion() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        let mut tweens = TweenState::new();
        let tid = tweens.add(id, Tween::rotation(0.0, 1.0, 1.0, Easing::Linear));

        tweens.tick(0.5, &mut scene);
        let r = scene.get(id).unwrap().rotation;
        assert!((r - 0.5).abs() < 0.01, "rotation={}", r);

        tweens.tick(0.5, &mut scene);
        let r = scene.get(id).unwrap().rotation;
        assert!((r - 1.0).abs() < 0.01, "rotation={}", r);
        assert!(!tweens.get(tid).unwrap().playing);
    }

    #[test]
    fn delay_holds_the_value() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        scene.get_mut(id).unwrap().rotation = -0.4;
        let mut tweens = TweenState::new();
        tweens.add(
            id,
            Tween::rotation(-0.4, 1.5, 0.5, Easing::QuadOut).with_delay(0.3),
        );

        tweens.tick(0.2, &mut scene);
        let r = scene.get(id).unwrap().rotation;
        assert!((r + 0.4).abs() < 0.001, "value must not move during delay");

        tweens.tick(0.7, &mut scene);
        let r = scene.get(id).unwrap().rotation;
        assert!((r - 1.5).abs() < 0.01, "rotation={}", r);
    }

    #[test]
    fn restart_discards_progress() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        let mut tweens = TweenState::new();
        let tid = tweens.add(id, Tween::rotation(0.0, 1.0, 1.0, Easing::Linear));

        tweens.tick(0.9, &mut scene);
        tweens.restart(tid);
        tweens.tick(0.5, &mut scene);
        let r = scene.get(id).unwrap().rotation;
        assert!((r - 0.5).abs() < 0.01, "restart must rewind: rotation={}", r);
    }

    #[test]
    fn ping_pong_returns_to_start() {
        let id = EntityId(1);
        let mut scene = scene_with(id);
        let mut tweens = TweenState::new();
        tweens.add(
            id,
            Tween::position_y(0.0, 10.0, 1.0, Easing::Linear).with_loop(TweenLoop::PingPong),
        );

        tweens.tick(1.0, &mut scene);
        assert!((scene.get(id).unwrap().pos.y - 10.0).abs() < 0.01);
        tweens.tick(1.0, &mut scene);
        assert!(scene.get(id).unwrap().pos.y.abs() < 0.01);
        assert_eq!(tweens.len(), 1, "ping-pong tween persists");
    }

    #[test]
    fn missing_entity_is_skipped() {
        let mut scene = Scene::new();
        let mut tweens = TweenState::new();
        tweens.add(EntityId(9), Tween::rotation(0.0, 1.0, 1.0, Easing::Linear));
        tweens.tick(0.5, &mut scene);
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut tweens = TweenState::new();
        let tid = tweens.add(EntityId(1), Tween::rotation(0.0, 1.0, 1.0, Easing::Linear));
        assert!(tweens.remove(tid));
        assert!(!tweens.remove(tid));
        assert!(tweens.is_empty());
    }
}
