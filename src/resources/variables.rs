//! Runtime variable store.
//!
//! Values are kept by variable id. GLOBAL variables are initialised once and
//! survive scene resets; scene-scoped variables go back to their initial
//! value every time their scene is entered.

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashMap;

use crate::gamedata::{GameData, Scope};

#[derive(Debug, Clone, Default, Resource)]
pub struct RuntimeVariables {
    values: FxHashMap<String, f64>,
}

impl RuntimeVariables {
    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    /// Set a value. Returns true when it actually changed.
    pub fn set(&mut self, id: impl Into<String>, value: f64) -> bool {
        let id = id.into();
        match self.values.insert(id, value) {
            Some(old) => old != value,
            None => true,
        }
    }

    /// Read-only view of all values.
    pub fn values(&self) -> &FxHashMap<String, f64> {
        &self.values
    }

    /// Prepare the store for entering `scene_id`.
    ///
    /// Missing GLOBAL variables get their initial value, existing ones are
    /// kept. Variables scoped to `scene_id` are always reset.
    pub fn enter_scene(&mut self, data: &GameData, scene_id: &str) {
        for var in &data.variables {
            match &var.scope {
                Scope::Global => {
                    self.values.entry(var.id.clone()).or_insert(var.initial);
                }
                Scope::Scene(id) if id == scene_id => {
                    self.values.insert(var.id.clone(), var.initial);
                }
                Scope::Scene(_) => {}
            }
        }
    }

    /// Apply `op` to a variable, treating an unknown id as zero.
    pub fn modify(
        &mut self,
        id: &str,
        op: crate::gamedata::VarOp,
        operand: f64,
    ) -> bool {
        let current = self.get(id).unwrap_or_else(|| {
            warn!("Variable '{}' not initialised, assuming 0", id);
            0.0
        });
        self.set(id, op.apply(current, operand))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamedata::{Variable, VarOp};

    fn data() -> GameData {
        let var = |id: &str, scope: Scope, initial: f64| Variable {
            id: id.into(),
            name: id.into(),
            scope,
            initial,
            display: Default::default(),
        };
        GameData {
            variables: vec![
                var("score", Scope::Global, 0.0),
                var("lives", Scope::Scene("s1".into()), 3.0),
                var("keys", Scope::Scene("s2".into()), 1.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn global_survives_scene_entry_and_scoped_resets() {
        let data = data();
        let mut vars = RuntimeVariables::default();
        vars.enter_scene(&data, "s1");
        assert_eq!(vars.get("lives"), Some(3.0));
        assert_eq!(vars.get("keys"), None);

        vars.modify("score", VarOp::Add, 5.0);
        vars.modify("lives", VarOp::Sub, 1.0);
        vars.enter_scene(&data, "s1");
        assert_eq!(vars.get("score"), Some(5.0));
        assert_eq!(vars.get("lives"), Some(3.0));
    }

    #[test]
    fn set_reports_changes_only() {
        let mut vars = RuntimeVariables::default();
        assert!(vars.set("a", 1.0));
        assert!(!vars.set("a", 1.0));
        assert!(vars.modify("a", VarOp::Set, 2.0));
        assert!(!vars.modify("a", VarOp::Set, 2.0));
    }
}
