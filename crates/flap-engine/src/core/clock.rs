// core/clock.rs
//
// Cooperative timer scheduler, the simulation's clock source.
// Timers carry a plain action value instead of a closure; the owner
// dispatches fired actions itself, so no callback captures state.

use crate::api::types::TimerId;

enum Repeat {
    Once,
    Every,
}

struct Timer<A> {
    id: TimerId,
    period: f32,
    elapsed: f32,
    repeat: Repeat,
    spent: bool,
    action: A,
}

/// Schedules delayed and periodic actions against simulated time.
/// Firing order within one tick is registration order; a `tick` that
/// spans several periods of one timer fires it once per period.
pub struct Scheduler<A> {
    timers: Vec<Timer<A>>,
    next_id: u32,
}

impl<A: Copy> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `action` to fire every `period` seconds.
    pub fn schedule_every(&mut self, period: f32, action: A) -> TimerId {
        self.push(period, Repeat::Every, action)
    }

    /// Schedule `action` to fire once after `delay` seconds.
    pub fn schedule_once(&mut self, delay: f32, action: A) -> TimerId {
        self.push(delay, Repeat::Once, action)
    }

    fn push(&mut self, period: f32, repeat: Repeat, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            period: period.max(0.0),
            elapsed: 0.0,
            repeat,
            spent: false,
            action,
        });
        id
    }

    /// Cancel a timer so it never fires again. Safe to call twice.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Whether a timer is still pending.
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Cancel every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Advance simulated time by `dt` seconds, collecting every due
    /// action into `fired`.
    pub fn tick(&mut self, dt: f32, fired: &mut Vec<A>) {
        for timer in &mut self.timers {
            timer.elapsed += dt;
            while timer.elapsed >= timer.period {
                fired.push(timer.action);
                match timer.repeat {
                    Repeat::Once => {
                        timer.spent = true;
                        break;
                    }
                    Repeat::Every => {
                        if timer.period <= 0.0 {
                            break;
                        }
                        timer.elapsed -= timer.period;
                    }
                }
            }
        }
        self.timers.retain(|t| !t.spent);
    }
}

impl<A: Copy> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}
