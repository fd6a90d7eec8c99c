use serde::Serialize;
use zonewatch_types::Rgba;

use crate::entity::{EntityId, Vec3};

/// A circle for the renderer, in world coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DrawCommand {
    FilledCircle {
        center: Vec3,
        radius: f32,
        color: Rgba,
    },
    Circle {
        center: Vec3,
        radius: f32,
        color: Rgba,
        thickness: f32,
    },
}

impl DrawCommand {
    pub fn radius(&self) -> f32 {
        match self {
            Self::FilledCircle { radius, .. } | Self::Circle { radius, .. } => *radius,
        }
    }
}

/// Request to play an alert sound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRequest {
    pub entity_id: EntityId,
    pub group: String,
    pub sound: String,
}

/// Debug label drawn at an entity's position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugText {
    pub text: String,
    pub position: Vec3,
}

/// Everything one tick produced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickOutput {
    /// The tick was skipped because a panel covers the world
    pub skipped: bool,
    pub draws: Vec<DrawCommand>,
    pub alerts: Vec<AlertRequest>,
    pub debug_texts: Vec<DebugText>,
    /// Lethal paths recorded this tick
    pub new_lethal: Vec<String>,
}

impl TickOutput {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
            && self.alerts.is_empty()
            && self.debug_texts.is_empty()
            && self.new_lethal.is_empty()
    }
}
