//! Suspended rule executions.
//!
//! Every fired rule becomes a [`RuleTask`]: a cursor into the rule's effect
//! list plus the time at which it may continue. WAIT/THEN and the scene
//! change delay park the task; the effect interpreter resumes it once the
//! session clock reaches `resume_at`, reading current world state afresh.

use bevy_ecs::prelude::{Entity, Resource};

use super::rulestate::GuardKey;

#[derive(Debug, Clone, PartialEq)]
pub struct RuleTask {
    /// Index into `GameData::rules`.
    pub rule_index: usize,
    pub subject: Option<Entity>,
    pub object: Option<Entity>,
    /// Next effect to execute.
    pub cursor: usize,
    /// Session time before which the task stays parked.
    pub resume_at: f32,
    /// Pacing delay accumulated since the last suspension, in seconds.
    pub pending_delay: f32,
    /// Scene to reset into once the task resumes.
    pub scene_change: Option<usize>,
    pub guard: GuardKey,
    pub epoch: u64,
    /// Cooldown applied to the guard when the task completes.
    pub cooldown: Option<f32>,
}

impl RuleTask {
    pub fn is_due(&self, now: f32) -> bool {
        now >= self.resume_at
    }
}

#[derive(Resource, Debug, Default)]
pub struct RuleTasks {
    pub tasks: Vec<RuleTask>,
}

impl RuleTasks {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
