//! Rules: a trigger, subject/object actor types, and an ordered effect list.
//!
//! Effects are a closed sum type; the interpreter in
//! [`crate::systems::effects`] matches on it exhaustively.

use serde::{Deserialize, Serialize};

use super::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparison {
    Equals,
    Greater,
    Less,
}

impl Comparison {
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Equals => (value - threshold).abs() < f64::EPSILON,
            Comparison::Greater => value > threshold,
            Comparison::Less => value < threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Trigger {
    Start,
    Timer {
        #[serde(default = "default_interval_ms")]
        interval_ms: u32,
    },
    KeyPress {
        key: String,
    },
    Click,
    Collision,
    Hit,
    VarCheck {
        variable_id: String,
        comparison: Comparison,
        value: f64,
    },
}

/// Who an effect applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Target {
    #[default]
    Subject,
    Object,
    /// Every live instance of the given actor.
    Actor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarOp {
    Add,
    Sub,
    Set,
}

impl VarOp {
    pub fn apply(self, current: f64, operand: f64) -> f64 {
        match self {
            VarOp::Add => current + operand,
            VarOp::Sub => current - operand,
            VarOp::Set => operand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in screen space (y grows downwards).
    pub fn unit(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticleKind {
    #[default]
    Confetti,
    Explosion,
    Smoke,
    Rain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Effect {
    Say {
        text: String,
        #[serde(default)]
        target: Target,
    },
    Wait {
        #[serde(default)]
        duration_ms: Option<u32>,
    },
    Then,
    ModifyVar {
        variable_id: String,
        op: VarOp,
        value: f64,
    },
    Spawn {
        actor_id: String,
        x: f32,
        y: f32,
    },
    Win,
    DestroySubject,
    DestroyObject,
    ChangeScene {
        #[serde(default)]
        scene_id: Option<String>,
    },
    Jump {
        #[serde(default)]
        strength: Option<f32>,
        #[serde(default)]
        target: Target,
    },
    Swap {
        actor_id: String,
        #[serde(default)]
        target: Target,
    },
    PlayAnim {
        actor_id: String,
        #[serde(default, rename = "loop")]
        looped: bool,
        #[serde(default)]
        target: Target,
    },
    Push {
        #[serde(default)]
        target: Target,
    },
    Step {
        direction: Direction,
        #[serde(default)]
        target: Target,
    },
    Shake {
        #[serde(default)]
        intensity: Option<f32>,
    },
    Chase {
        /// Actor to chase; the player role when absent.
        #[serde(default)]
        target_actor_id: Option<String>,
        #[serde(default)]
        target: Target,
    },
    Move {
        waypoints: Vec<Point>,
        #[serde(default)]
        speed: Option<f32>,
        #[serde(default, rename = "loop")]
        looped: Option<bool>,
        #[serde(default)]
        target: Target,
    },
    Shoot {
        actor_id: String,
        #[serde(default)]
        offset_x: f32,
        #[serde(default)]
        offset_y: f32,
        #[serde(default)]
        speed: Option<f32>,
        #[serde(default)]
        target: Target,
    },
    Hold {
        #[serde(default)]
        holder: Option<Target>,
        #[serde(default)]
        target: Option<Target>,
        #[serde(default)]
        offset_x: f32,
        #[serde(default)]
        offset_y: f32,
    },
    Drop {
        #[serde(default)]
        target: Option<Target>,
    },
    Particles {
        #[serde(default)]
        kind: ParticleKind,
        #[serde(default)]
        count: Option<u32>,
        #[serde(default)]
        target: Target,
    },
    PlayMusic {
        music_id: String,
    },
    /// Only meaningful to the drag pass: vetoes dragging the subject into the object.
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub scope: Scope,
    pub trigger: Trigger,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default = "default_chance")]
    pub chance: f32,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub sound_id: Option<String>,
}

impl Rule {
    pub fn is_var_check(&self) -> bool {
        matches!(self.trigger, Trigger::VarCheck { .. })
    }

    pub fn has_effect(&self, pred: impl Fn(&Effect) -> bool) -> bool {
        self.effects.iter().any(pred)
    }
}

fn default_chance() -> f32 {
    1.0
}

fn default_interval_ms() -> u32 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_deserialize_from_tagged_json() {
        let json = r#"[
            { "type": "SAY", "text": "hi" },
            { "type": "WAIT" },
            { "type": "MODIFY_VAR", "variableId": "score", "op": "ADD", "value": 5 },
            { "type": "HOLD", "offsetX": 4 },
            { "type": "STEP", "direction": "LEFT", "target": { "ACTOR": "crate" } },
            { "type": "PLAY_ANIM", "actorId": "hero-walk", "loop": true }
        ]"#;
        let effects: Vec<Effect> = serde_json::from_str(json).unwrap();
        assert_eq!(
            effects[0],
            Effect::Say {
                text: "hi".into(),
                target: Target::Subject
            }
        );
        assert_eq!(effects[1], Effect::Wait { duration_ms: None });
        assert!(matches!(
            effects[2],
            Effect::ModifyVar { op: VarOp::Add, .. }
        ));
        assert!(matches!(
            effects[3],
            Effect::Hold { holder: None, target: None, .. }
        ));
        assert_eq!(
            effects[4],
            Effect::Step {
                direction: Direction::Left,
                target: Target::Actor("crate".into())
            }
        );
        assert!(matches!(effects[5], Effect::PlayAnim { looped: true, .. }));
    }

    #[test]
    fn rule_defaults() {
        let json = r#"{ "id": "r1", "trigger": { "type": "TIMER", "intervalMs": 2000 } }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.chance, 1.0);
        assert!(!rule.invert);
        assert_eq!(rule.scope, Scope::Global);
        assert_eq!(rule.trigger, Trigger::Timer { interval_ms: 2000 });
    }

    #[test]
    fn var_op_set_is_not_cumulative() {
        let once = VarOp::Set.apply(3.0, 10.0);
        let twice = VarOp::Set.apply(once, 10.0);
        assert_eq!(twice, 10.0);
        assert_eq!(VarOp::Add.apply(3.0, 2.0), 5.0);
        assert_eq!(VarOp::Sub.apply(3.0, 2.0), 1.0);
    }

    #[test]
    fn comparisons() {
        assert!(Comparison::Equals.holds(3.0, 3.0));
        assert!(Comparison::Greater.holds(4.0, 3.0));
        assert!(!Comparison::Less.holds(4.0, 3.0));
    }
}
