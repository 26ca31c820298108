//! Execution guards and timer bookkeeping for the rule engine.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

/// One guarded execution slot: a rule bound to a subject instance.
///
/// Different subject instances of the same rule run independently.
pub type GuardKey = (String, Option<Entity>);

/// Extra quiet period after a VAR_CHECK execution completes, in seconds.
pub const VAR_CHECK_COOLDOWN: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RuleRunState {
    #[default]
    Idle,
    /// An execution started during `epoch` is in flight.
    Running { epoch: u64 },
    Cooldown { until: f32 },
}

/// Re-entrancy guards for rule executions.
///
/// The epoch is bumped on every scene reset. An execution that started in an
/// older epoch may still complete, but it does not touch guards acquired
/// after the reset.
#[derive(Resource, Debug, Default)]
pub struct RuleGuards {
    states: FxHashMap<GuardKey, RuleRunState>,
    epoch: u64,
}

impl RuleGuards {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self, key: &GuardKey) -> RuleRunState {
        self.states.get(key).copied().unwrap_or_default()
    }

    /// Whether a new execution may start for `key` at time `now`.
    pub fn is_free(&self, key: &GuardKey, now: f32) -> bool {
        match self.state(key) {
            RuleRunState::Idle => true,
            RuleRunState::Running { .. } => false,
            RuleRunState::Cooldown { until } => now >= until,
        }
    }

    /// Try to acquire the guard. Returns the epoch to release it with.
    pub fn acquire(&mut self, key: GuardKey, now: f32) -> Option<u64> {
        if !self.is_free(&key, now) {
            return None;
        }
        let epoch = self.epoch;
        self.states.insert(key, RuleRunState::Running { epoch });
        Some(epoch)
    }

    /// Release a guard acquired in `epoch`, optionally entering a cooldown.
    pub fn release(&mut self, key: &GuardKey, epoch: u64, cooldown_until: Option<f32>) {
        let Some(state) = self.states.get_mut(key) else {
            return;
        };
        if *state != (RuleRunState::Running { epoch }) {
            return;
        }
        match cooldown_until {
            Some(until) => *state = RuleRunState::Cooldown { until },
            None => {
                self.states.remove(key);
            }
        }
    }

    pub fn running_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| matches!(s, RuleRunState::Running { .. }))
            .count()
    }

    /// Forget every guard and start a new epoch.
    pub fn reset(&mut self) {
        self.states.clear();
        self.epoch += 1;
    }
}

/// Last time each TIMER rule fired, by rule id.
#[derive(Resource, Debug, Default)]
pub struct RuleTimers {
    last_fired: FxHashMap<String, f32>,
}

impl RuleTimers {
    /// Whether a timer with `interval` seconds is due at `now`.
    ///
    /// The first check arms the timer, so it fires one interval later.
    pub fn poll(&mut self, rule_id: &str, interval: f32, now: f32) -> bool {
        let last = *self.last_fired.entry(rule_id.to_string()).or_insert(now);
        if now - last >= interval {
            self.last_fired.insert(rule_id.to_string(), now);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.last_fired.clear();
    }
}
