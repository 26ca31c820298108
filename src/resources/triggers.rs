use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};

/// Something that may fire rules, waiting for the next dispatch pass.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerEvent {
    /// The active scene entered PLAYING.
    Start,
    Key(String),
    Click(Entity),
    /// Two objects started overlapping.
    Contact { a: Entity, b: Entity },
    /// Two touching objects separated.
    Separation { a: Entity, b: Entity },
    /// A runtime variable changed.
    VariableChanged,
}

/// FIFO of trigger events, drained by the rule dispatcher.
#[derive(Resource, Debug, Default)]
pub struct PendingTriggers {
    queue: VecDeque<TriggerEvent>,
}

impl PendingTriggers {
    pub fn push(&mut self, event: TriggerEvent) {
        // Repeated variable changes in one frame need only one evaluation.
        if event == TriggerEvent::VariableChanged
            && self.queue.back() == Some(&TriggerEvent::VariableChanged)
        {
            return;
        }
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<TriggerEvent> {
        self.queue.pop_front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
