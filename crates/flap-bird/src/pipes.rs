use flap_engine::{Entity, EntityId, Physics, Scene, Scheduler, TimerId, WatchId};
use glam::Vec2;
use rand::Rng;

use crate::config::Tuning;
use crate::session::TimerAction;

/// One obstacle unit: an upper and a lower barrier with a fixed
/// vertical gap between them, plus the pair-local resources that must
/// die with it (off-screen recheck timer, bird collision watch).
/// Keyed by the upper entity's ID.
#[derive(Debug, Clone, Copy)]
pub struct PipePair {
    pub upper: EntityId,
    pub lower: EntityId,
    pub expiry_timer: TimerId,
    pub watch: WatchId,
}

/// The live set of obstacle pairs, in spawn order, plus the single
/// tracked candidate the pass scan is currently waiting on.
#[derive(Default)]
pub struct ObstacleField {
    pairs: Vec<PipePair>,
    tracked: Option<EntityId>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[PipePair] {
        &self.pairs
    }

    /// The obstacle the pass scan is currently waiting on, if any.
    pub fn tracked(&self) -> Option<EntityId> {
        self.tracked
    }

    /// Create one pair at the right edge of the field.
    ///
    /// The vertical placement formula is inherited policy: it keeps the
    /// gap inside a visible band while allowing some overshoot past the
    /// edges. The clamp only catches values that would push the gap
    /// fully off screen.
    pub fn spawn_pair<R: Rng>(
        &mut self,
        ids: (EntityId, EntityId),
        bird: EntityId,
        scene: &mut Scene,
        physics: &mut Physics,
        clock: &mut Scheduler<TimerAction>,
        rng: &mut R,
        tuning: &Tuning,
    ) -> PipePair {
        let (upper_id, lower_id) = ids;
        let half_pipe = tuning.pipe_height * 0.5;

        let band = tuning.field_height - 300.0 - tuning.gap;
        let raw = (rng.gen::<f32>() * band).ceil() - 700.0 + half_pipe;
        let min_y = -half_pipe;
        let max_y = tuning.field_height - tuning.gap - half_pipe;
        let upper_y = raw.clamp(min_y, max_y);

        let x = tuning.pipe_spawn_x();
        let size = Vec2::new(tuning.pipe_width, tuning.pipe_height);
        let vel = Vec2::new(-tuning.scroll_speed, 0.0);

        scene.spawn(
            Entity::new(upper_id)
                .with_tag("pipe_upper")
                .with_pos(Vec2::new(x, upper_y))
                .with_vel(vel)
                .with_size(size)
                .with_immovable(true)
                .with_rotation(std::f32::consts::PI),
        );
        // The one hard geometric invariant of the field:
        // lower.y = upper.y + GAP + pipe height.
        scene.spawn(
            Entity::new(lower_id)
                .with_tag("pipe_lower")
                .with_pos(Vec2::new(x, upper_y + tuning.gap + tuning.pipe_height))
                .with_vel(vel)
                .with_size(size)
                .with_immovable(true),
        );

        let watch = physics.watch(bird, &[upper_id, lower_id]);
        let expiry_timer = clock.schedule_every(
            tuning.expiry_check_interval(),
            TimerAction::ExpiryCheck(upper_id),
        );

        let pair = PipePair {
            upper: upper_id,
            lower: lower_id,
            expiry_timer,
            watch,
        };
        self.pairs.push(pair);
        log::debug!(
            "pipe pair {:?} spawned, gap top at {:.0}",
            upper_id,
            upper_y + half_pipe
        );
        pair
    }

    /// Look a pair up by its key (the upper entity's ID).
    pub fn pair(&self, key: EntityId) -> Option<PipePair> {
        self.pairs.iter().copied().find(|p| p.upper == key)
    }

    /// The pair one of whose halves is `id`, if any.
    pub fn pair_containing(&self, id: EntityId) -> Option<PipePair> {
        self.pairs
            .iter()
            .copied()
            .find(|p| p.upper == id || p.lower == id)
    }

    /// Detach a pair from the field, releasing its entities, timer and
    /// watch. The pass scan forgets the pair if it was watching it.
    pub fn remove_pair(
        &mut self,
        key: EntityId,
        scene: &mut Scene,
        physics: &mut Physics,
        clock: &mut Scheduler<TimerAction>,
    ) -> Option<PipePair> {
        let idx = self.pairs.iter().position(|p| p.upper == key)?;
        let pair = self.pairs.remove(idx);
        scene.despawn(pair.upper);
        scene.despawn(pair.lower);
        clock.cancel(pair.expiry_timer);
        physics.unwatch(pair.watch);
        if self.tracked == Some(pair.upper) || self.tracked == Some(pair.lower) {
            self.tracked = None;
        }
        Some(pair)
    }

    /// Zero the horizontal velocity of every live obstacle, freezing
    /// the field in place.
    pub fn freeze(&mut self, scene: &mut Scene) {
        for pair in &self.pairs {
            for id in [pair.upper, pair.lower] {
                if let Some(e) = scene.get_mut(id) {
                    e.vel.x = 0.0;
                }
            }
        }
    }

    /// Cancel every pair-local expiry timer (game over: a frozen field
    /// never scrolls off screen, so the rechecks must not keep firing).
    pub fn cancel_timers(&mut self, clock: &mut Scheduler<TimerAction>) {
        for pair in &self.pairs {
            clock.cancel(pair.expiry_timer);
        }
    }

    /// Remove every pair and its resources.
    pub fn clear(
        &mut self,
        scene: &mut Scene,
        physics: &mut Physics,
        clock: &mut Scheduler<TimerAction>,
    ) {
        for pair in self.pairs.drain(..) {
            scene.despawn(pair.upper);
            scene.despawn(pair.lower);
            clock.cancel(pair.expiry_timer);
            physics.unwatch(pair.watch);
        }
        self.tracked = None;
    }

    /// One pass-detection step. Returns true when a pair just earned
    /// the pass bonus.
    ///
    /// Only one half of each pair may ever score: when the scan lands
    /// on a lower half whose upper was already retired, the lower is
    /// spent without scoring so the pair cannot award twice. A tracked
    /// candidate that disappears before crossing the line (retired by
    /// an expiry recheck) is simply dropped; the next scan re-acquires.
    pub fn scan_pass(&mut self, scene: &mut Scene, threshold_x: f32) -> bool {
        if self.pairs.is_empty() {
            return false;
        }

        if self.tracked.is_none() {
            let mut first_alive = None;
            'pairs: for pair in &self.pairs {
                for (id, is_lower) in [(pair.upper, false), (pair.lower, true)] {
                    if scene.get(id).map(|e| e.active).unwrap_or(false) {
                        first_alive = Some((id, is_lower));
                        break 'pairs;
                    }
                }
            }
            match first_alive {
                None => return false,
                Some((id, true)) => {
                    if let Some(e) = scene.get_mut(id) {
                        e.active = false;
                    }
                    return false;
                }
                Some((id, false)) => self.tracked = Some(id),
            }
        }

        let Some(candidate) = self.tracked else {
            return false;
        };
        let Some(e) = scene.get_mut(candidate) else {
            self.tracked = None;
            return false;
        };
        if e.pos.x > threshold_x {
            return false;
        }
        e.active = false;
        self.tracked = None;
        log::debug!("pipe pair passed at x {:.0}", threshold_x);
        true
    }
}
