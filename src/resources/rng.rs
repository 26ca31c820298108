use bevy_ecs::prelude::Resource;

/// Random source for chance gating, PUSH directions and particle spread.
///
/// Seeded from [`GameConfig::seed`](super::gameconfig::GameConfig) when set,
/// which makes headless runs reproducible.
#[derive(Resource, Debug, Clone)]
pub struct SessionRng(pub fastrand::Rng);

impl SessionRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(fastrand::Rng::with_seed(seed)),
            None => Self(fastrand::Rng::new()),
        }
    }
}

impl Default for SessionRng {
    fn default() -> Self {
        Self::new(None)
    }
}
