use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashSet;

/// Unordered pairs of objects currently in contact.
///
/// A pair is inserted on the enter edge and removed on the exit edge, so
/// contact rules fire once per episode.
#[derive(Resource, Debug, Default)]
pub struct TouchingPairs {
    pairs: FxHashSet<(Entity, Entity)>,
}

fn ordered(a: Entity, b: Entity) -> (Entity, Entity) {
    if a <= b { (a, b) } else { (b, a) }
}

impl TouchingPairs {
    pub fn contains(&self, a: Entity, b: Entity) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// Returns true when the pair was not touching before.
    pub fn insert(&mut self, a: Entity, b: Entity) -> bool {
        self.pairs.insert(ordered(a, b))
    }

    pub fn remove(&mut self, a: Entity, b: Entity) -> bool {
        self.pairs.remove(&ordered(a, b))
    }

    /// Drop pairs for which `alive` is false on either side.
    pub fn retain_alive(&mut self, alive: impl Fn(Entity) -> bool) {
        self.pairs.retain(|(a, b)| alive(*a) && alive(*b));
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
