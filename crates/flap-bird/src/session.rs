use flap_engine::{
    CollisionPair, Entity, EntityId, FixedTimestep, InputQueue, Physics, Scene, Scheduler,
    TimerId, TweenState,
};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::bird::BirdController;
use crate::config::Tuning;
use crate::pipes::ObstacleField;
use crate::score::ScoreKeeper;

/// Session phase. Ready is the idle attract state, Playing runs the
/// full simulation, Ended freezes the world until `ready` is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Playing,
    Ended,
}

/// Everything the clock can ask the session to do. Timers carry plain
/// data rather than callbacks so firing order stays inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    SpawnPipe,
    SurvivalScore,
    PassCheck,
    ClearScoreDelta,
    ExpiryCheck(EntityId),
}

const GROUND_ID: EntityId = EntityId(0);
const BIRD_ID: EntityId = EntityId(1);
const GROUND_THICKNESS: f32 = 96.0;

/// One complete game: scene, physics, clock, tweens, score and the two
/// domain controllers, advanced on a fixed timestep.
pub struct GameSession {
    tuning: Tuning,
    status: Status,
    scene: Scene,
    physics: Physics,
    clock: Scheduler<TimerAction>,
    tweens: TweenState,
    score: ScoreKeeper,
    bird: BirdController,
    field: ObstacleField,
    rng: SmallRng,
    timestep: FixedTimestep,
    next_entity: u32,
    spawn_timer: Option<TimerId>,
    survival_timer: Option<TimerId>,
    pass_timer: Option<TimerId>,
    delta_clear_timer: Option<TimerId>,
    fired: Vec<TimerAction>,
    collisions: Vec<CollisionPair>,
}

impl GameSession {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut scene = Scene::new();
        let mut physics = Physics::new(Vec2::new(0.0, tuning.gravity));
        let mut tweens = TweenState::new();

        scene.spawn(
            Entity::new(GROUND_ID)
                .with_tag("ground")
                .with_pos(Vec2::new(
                    tuning.field_width * 0.5,
                    tuning.ground_top + GROUND_THICKNESS * 0.5,
                ))
                .with_size(Vec2::new(tuning.field_width, GROUND_THICKNESS))
                .with_immovable(true),
        );
        let bird = BirdController::spawn(BIRD_ID, &mut scene, &mut tweens, &tuning);
        physics.watch(BIRD_ID, &[GROUND_ID]);

        let timestep = FixedTimestep::new(tuning.fixed_dt);
        let mut session = Self {
            tuning,
            status: Status::Ready,
            scene,
            physics,
            clock: Scheduler::new(),
            tweens,
            score: ScoreKeeper::new(),
            bird,
            field: ObstacleField::new(),
            rng: SmallRng::seed_from_u64(seed),
            timestep,
            next_entity: 2,
            spawn_timer: None,
            survival_timer: None,
            pass_timer: None,
            delta_clear_timer: None,
            fired: Vec::new(),
            collisions: Vec::new(),
        };
        session.ready();
        session
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> &ScoreKeeper {
        &self.score
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bird(&self) -> &BirdController {
        &self.bird
    }

    /// Return to the idle attract state from any phase. Safe to call
    /// repeatedly; a fresh session is already in this state.
    pub fn ready(&mut self) {
        self.field
            .clear(&mut self.scene, &mut self.physics, &mut self.clock);
        for slot in [
            &mut self.spawn_timer,
            &mut self.survival_timer,
            &mut self.pass_timer,
            &mut self.delta_clear_timer,
        ] {
            if let Some(id) = slot.take() {
                self.clock.cancel(id);
            }
        }
        self.score.set_score(0);
        self.bird
            .reset(&mut self.scene, &mut self.tweens, &self.tuning);
        self.timestep.reset();
        self.status = Status::Ready;
        log::info!("session ready");
    }

    /// Begin play: drop the bird into gravity, arm the recurring
    /// timers, and put the first obstacle on screen right away.
    pub fn start(&mut self) {
        if self.status != Status::Ready {
            return;
        }
        self.status = Status::Playing;
        self.bird.take_flight(&mut self.scene, &mut self.tweens);
        self.spawn_timer = Some(
            self.clock
                .schedule_every(self.tuning.spawn_interval, TimerAction::SpawnPipe),
        );
        self.survival_timer = Some(
            self.clock
                .schedule_every(self.tuning.survival_interval, TimerAction::SurvivalScore),
        );
        self.pass_timer = Some(
            self.clock
                .schedule_every(self.tuning.pass_interval, TimerAction::PassCheck),
        );
        self.spawn_pipe();
        self.fly();
        log::info!("session started");
    }

    /// One flap. Only meaningful in flight.
    pub fn fly(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        self.bird.fly(&mut self.scene, &mut self.tweens, &self.tuning);
    }

    /// A tap or key press: starts play from Ready, flaps in Playing,
    /// does nothing once the run has ended.
    pub fn on_tap(&mut self) {
        match self.status {
            Status::Ready => self.start(),
            Status::Playing => self.fly(),
            Status::Ended => {}
        }
    }

    /// Drain pending input events into taps.
    pub fn pump_input(&mut self, input: &mut InputQueue) {
        for _event in input.drain() {
            self.on_tap();
        }
    }

    /// Advance by a raw frame time, running as many fixed steps as the
    /// accumulator allows.
    pub fn advance(&mut self, frame_dt: f32) {
        let steps = self.timestep.accumulate(frame_dt);
        let dt = self.timestep.dt();
        for _ in 0..steps {
            self.step(dt);
        }
    }

    /// One fixed simulation step: timers fire first, then tweens, then
    /// physics and its collision fallout.
    pub fn step(&mut self, dt: f32) {
        let mut fired = std::mem::take(&mut self.fired);
        fired.clear();
        self.clock.tick(dt, &mut fired);
        for action in fired.drain(..) {
            self.dispatch(action);
        }
        self.fired = fired;

        self.tweens.tick(dt, &mut self.scene);

        let mut collisions = std::mem::take(&mut self.collisions);
        collisions.clear();
        self.physics.step(dt, &mut self.scene, &mut collisions);
        for pair in collisions.drain(..) {
            self.on_collision(pair);
        }
        self.collisions = collisions;
    }

    fn dispatch(&mut self, action: TimerAction) {
        // The score popup clears even after death; everything else is
        // a Playing-only concern.
        match action {
            TimerAction::ClearScoreDelta => {
                self.score.clear_delta_display();
                self.delta_clear_timer = None;
            }
            _ if self.status != Status::Playing => {}
            TimerAction::SpawnPipe => self.spawn_pipe(),
            TimerAction::SurvivalScore => self.score.add(self.tuning.alive_score, false),
            TimerAction::PassCheck => {
                if self
                    .field
                    .scan_pass(&mut self.scene, self.tuning.pass_threshold_x())
                {
                    self.score.add(self.tuning.pass_score, true);
                    if let Some(id) = self.delta_clear_timer.take() {
                        self.clock.cancel(id);
                    }
                    self.delta_clear_timer = Some(self.clock.schedule_once(
                        self.tuning.delta_clear_delay,
                        TimerAction::ClearScoreDelta,
                    ));
                }
            }
            TimerAction::ExpiryCheck(key) => self.check_expiry(key),
        }
    }

    fn spawn_pipe(&mut self) {
        let ids = (EntityId(self.next_entity), EntityId(self.next_entity + 1));
        self.next_entity += 2;
        self.field.spawn_pair(
            ids,
            self.bird.id(),
            &mut self.scene,
            &mut self.physics,
            &mut self.clock,
            &mut self.rng,
            &self.tuning,
        );
    }

    fn check_expiry(&mut self, key: EntityId) {
        let Some(pair) = self.field.pair(key) else {
            return;
        };
        let off_screen = self
            .scene
            .get(pair.upper)
            .map(|e| e.pos.x < self.tuning.expiry_threshold_x)
            .unwrap_or(true);
        if off_screen {
            self.field
                .remove_pair(key, &mut self.scene, &mut self.physics, &mut self.clock);
            log::debug!("pipe pair {:?} retired off screen", key);
        }
    }

    fn on_collision(&mut self, pair: CollisionPair) {
        if self.status == Status::Ended {
            return;
        }
        // Any watched contact is lethal: pipes and ground alike.
        log::debug!("lethal contact with {:?}", pair.entity_b);
        self.die();
    }

    fn die(&mut self) {
        if self.status == Status::Ended {
            return;
        }
        self.status = Status::Ended;
        for slot in [
            &mut self.spawn_timer,
            &mut self.survival_timer,
            &mut self.pass_timer,
        ] {
            if let Some(id) = slot.take() {
                self.clock.cancel(id);
            }
        }
        self.field.cancel_timers(&mut self.clock);
        self.field.freeze(&mut self.scene);
        self.bird
            .death_pose(&mut self.scene, &mut self.tweens, &self.tuning);
        log::info!("session ended, score {}", self.score.score());
    }
}
