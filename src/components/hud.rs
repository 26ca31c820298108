use bevy_ecs::prelude::Component;

use crate::gamedata::{DisplayMode, HudData};

/// Variable readout drawn next to a level object.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct HudOverlay {
    pub variable_id: String,
    pub mode: DisplayMode,
    pub label: Option<String>,
    pub max: Option<f64>,
}

impl From<&HudData> for HudOverlay {
    fn from(data: &HudData) -> Self {
        Self {
            variable_id: data.variable_id.clone(),
            mode: data.mode,
            label: data.label.clone(),
            max: data.max,
        }
    }
}
