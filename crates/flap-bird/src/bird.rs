use flap_engine::{Easing, Entity, EntityId, Scene, Tween, TweenId, TweenLoop, TweenState};
use glam::Vec2;

use crate::config::Tuning;

/// Owns the player entity's motion state: the idle float before play,
/// the flap impulse and rotation ease in flight, and the death pose.
/// The two tween intents are mutually exclusive: floating belongs to
/// Ready, the rotation ease to Playing.
pub struct BirdController {
    id: EntityId,
    float_tween: TweenId,
    rotation_tween: TweenId,
    wings_animating: bool,
}

impl BirdController {
    /// Spawn the bird entity and register its two tweens (both held
    /// paused until the matching phase begins). The bird is created
    /// once per session and only repositioned afterwards.
    pub fn spawn(
        id: EntityId,
        scene: &mut Scene,
        tweens: &mut TweenState,
        tuning: &Tuning,
    ) -> Self {
        let spawn = Vec2::new(tuning.bird_spawn_x, tuning.bird_spawn_y);
        scene.spawn(
            Entity::new(id)
                .with_tag("bird")
                .with_pos(spawn)
                .with_size(Vec2::new(tuning.bird_width, tuning.bird_height)),
        );

        let float_tween = tweens.add(
            id,
            Tween::position_y(
                spawn.y,
                spawn.y - tuning.float_amplitude,
                tuning.float_half_period,
                Easing::SineInOut,
            )
            .with_loop(TweenLoop::PingPong)
            .paused(),
        );
        let rotation_tween = tweens.add(
            id,
            Tween::rotation(
                tuning.ascend_angle,
                tuning.descend_angle,
                tuning.rotation_ease_duration,
                Easing::QuadOut,
            )
            .with_delay(tuning.rotation_ease_delay)
            .paused(),
        );

        Self {
            id,
            float_tween,
            rotation_tween,
            wings_animating: true,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Whether the wing-flap animation is running (frozen on death).
    pub fn wings_animating(&self) -> bool {
        self.wings_animating
    }

    /// Back to the spawn point: zero velocity, neutral angle, gravity
    /// off, idle float restarted from its top.
    pub fn reset(&mut self, scene: &mut Scene, tweens: &mut TweenState, tuning: &Tuning) {
        if let Some(bird) = scene.get_mut(self.id) {
            bird.pos = Vec2::new(tuning.bird_spawn_x, tuning.bird_spawn_y);
            bird.vel = Vec2::ZERO;
            bird.rotation = 0.0;
            bird.gravity_enabled = false;
        }
        self.wings_animating = true;
        tweens.pause(self.rotation_tween);
        tweens.restart(self.float_tween);
    }

    /// Play begins: the idle float stops immediately and gravity takes
    /// over.
    pub fn take_flight(&mut self, scene: &mut Scene, tweens: &mut TweenState) {
        tweens.pause(self.float_tween);
        if let Some(bird) = scene.get_mut(self.id) {
            bird.gravity_enabled = true;
        }
    }

    /// One flap: snap nose-up, restart the ease back toward nose-down,
    /// kick upward. Restarting from scratch on every call means the
    /// latest input always wins.
    pub fn fly(&self, scene: &mut Scene, tweens: &mut TweenState, tuning: &Tuning) {
        if let Some(bird) = scene.get_mut(self.id) {
            bird.rotation = tuning.ascend_angle;
            bird.vel.y = tuning.flap_impulse;
        }
        tweens.restart(self.rotation_tween);
    }

    /// Death pose: angle pinned forward-tilted, wings frozen, both
    /// tweens halted. Gravity stays on so the body falls away.
    pub fn death_pose(&mut self, scene: &mut Scene, tweens: &mut TweenState, tuning: &Tuning) {
        tweens.pause(self.float_tween);
        tweens.pause(self.rotation_tween);
        self.wings_animating = false;
        if let Some(bird) = scene.get_mut(self.id) {
            bird.rotation = tuning.death_angle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Scene, TweenState, Tuning, BirdController) {
        let mut scene = Scene::new();
        let mut tweens = TweenState::new();
        let tuning = Tuning::default();
        let bird = BirdController::spawn(EntityId(0), &mut scene, &mut tweens, &tuning);
        (scene, tweens, tuning, bird)
    }

    #[test]
    fn spawn_places_bird_at_rest() {
        let (scene, tweens, tuning, bird) = setup();
        let e = scene.get(bird.id()).unwrap();
        assert_eq!(e.pos, Vec2::new(tuning.bird_spawn_x, tuning.bird_spawn_y));
        assert!(!e.gravity_enabled);
        assert_eq!(tweens.len(), 2);
        assert!(bird.wings_animating());
    }

    #[test]
    fn fly_applies_impulse_and_ascend_angle() {
        let (mut scene, mut tweens, tuning, mut bird) = setup();
        bird.take_flight(&mut scene, &mut tweens);
        bird.fly(&mut scene, &mut tweens, &tuning);
        let e = scene.get(bird.id()).unwrap();
        assert_eq!(e.vel.y, tuning.flap_impulse);
        assert!((e.rotation - tuning.ascend_angle).abs() < 0.001);
        assert!(e.gravity_enabled);
    }

    #[test]
    fn rotation_ease_waits_out_its_delay() {
        let (mut scene, mut tweens, tuning, mut bird) = setup();
        bird.take_flight(&mut scene, &mut tweens);
        bird.fly(&mut scene, &mut tweens, &tuning);

        // During the delay the angle holds at ascend
        tweens.tick(tuning.rotation_ease_delay * 0.5, &mut scene);
        let r = scene.get(bird.id()).unwrap().rotation;
        assert!((r - tuning.ascend_angle).abs() < 0.001, "rotation={}", r);

        // Past delay + duration it has settled at descend
        tweens.tick(tuning.rotation_ease_delay + tuning.rotation_ease_duration, &mut scene);
        let r = scene.get(bird.id()).unwrap().rotation;
        assert!((r - tuning.descend_angle).abs() < 0.01, "rotation={}", r);
    }

    #[test]
    fn repeated_fly_restarts_the_ease() {
        let (mut scene, mut tweens, tuning, mut bird) = setup();
        bird.take_flight(&mut scene, &mut tweens);
        bird.fly(&mut scene, &mut tweens, &tuning);
        tweens.tick(tuning.rotation_ease_delay + tuning.rotation_ease_duration, &mut scene);

        // Second flap rewinds the ease; angle snaps back to ascend
        bird.fly(&mut scene, &mut tweens, &tuning);
        tweens.tick(0.01, &mut scene);
        let r = scene.get(bird.id()).unwrap().rotation;
        assert!((r - tuning.ascend_angle).abs() < 0.001, "rotation={}", r);
    }

    #[test]
    fn death_pose_freezes_wings_and_angle() {
        let (mut scene, mut tweens, tuning, mut bird) = setup();
        bird.take_flight(&mut scene, &mut tweens);
        bird.fly(&mut scene, &mut tweens, &tuning);
        bird.death_pose(&mut scene, &mut tweens, &tuning);

        let r = scene.get(bird.id()).unwrap().rotation;
        assert!((r - tuning.death_angle).abs() < 0.001);
        assert!(!bird.wings_animating());

        // The halted ease must not move the angle any more
        tweens.tick(2.0, &mut scene);
        let r = scene.get(bird.id()).unwrap().rotation;
        assert!((r - tuning.death_angle).abs() < 0.001, "rotation={}", r);
    }

    #[test]
    fn reset_after_death_restores_idle_state() {
        let (mut scene, mut tweens, tuning, mut bird) = setup();
        bird.take_flight(&mut scene, &mut tweens);
        bird.fly(&mut scene, &mut tweens, &tuning);
        bird.death_pose(&mut scene, &mut tweens, &tuning);
        bird.reset(&mut scene, &mut tweens, &tuning);

        let e = scene.get(bird.id()).unwrap();
        assert_eq!(e.pos.y, tuning.bird_spawn_y);
        assert_eq!(e.vel, Vec2::ZERO);
        assert_eq!(e.rotation, 0.0);
        assert!(!e.gravity_enabled);
        assert!(bird.wings_animating());

        // Idle float oscillates again
        tweens.tick(tuning.float_half_period * 0.5, &mut scene);
        let y = scene.get(bird.id()).unwrap().pos.y;
        assert!(y < tuning.bird_spawn_y, "float should lift the bird: y={}", y);
    }
}
