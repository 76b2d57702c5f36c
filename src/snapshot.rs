//! Render snapshot
//!
//! Owned copy of everything a view layer draws: entity circles, the hurt
//! flash, HUD numbers, the pending choice labels and the events raised by the
//! last tick. Built from `&GameState` so the renderer never touches
//! simulation internals.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{ChoiceMode, GameEvent, GameState, ModifierKind, MonsterKind};

#[derive(Debug, Clone, Serialize)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonsterView {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: MonsterKind,
    /// Health bar fill (0-1)
    pub hp_fraction: f32,
    pub burning: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub radius: f32,
    pub modifier: ModifierKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    /// Whole hit points, floored and never negative
    pub hp: u32,
    pub max_hp: u32,
    pub kills: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_level: u32,
    pub modifier: ModifierKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    /// Run seed, shown so a run can be replayed
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    /// World point at the center of the view
    pub camera: Vec2,
    pub player: Circle,
    /// 0-1 intensity
    pub hurt_flash: f32,
    pub monsters: Vec<MonsterView>,
    pub bullets: Vec<BulletView>,
    pub orbs: Vec<Circle>,
    pub hud: Hud,
    pub choice_mode: Option<ChoiceMode>,
    pub choices: Vec<String>,
    /// Raised by the last tick (sounds, popups)
    pub events: Vec<GameEvent>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            seed: state.seed,
            width: state.width,
            height: state.height,
            camera: player.pos,
            player: Circle {
                pos: player.pos,
                radius: player.radius,
            },
            hurt_flash: state.timers.hurt_flash,
            monsters: state
                .monsters
                .iter()
                .map(|m| MonsterView {
                    pos: m.pos,
                    radius: m.radius,
                    kind: m.kind,
                    hp_fraction: if m.max_hp > 0.0 {
                        (m.hp / m.max_hp).clamp(0.0, 1.0)
                    } else {
                        0.0
                    },
                    burning: m.burn.is_active(),
                })
                .collect(),
            bullets: state
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    radius: b.radius,
                    modifier: b.modifier,
                })
                .collect(),
            orbs: state
                .orbs
                .iter()
                .map(|o| Circle {
                    pos: o.pos,
                    radius: o.radius,
                })
                .collect(),
            hud: Hud {
                hp: player.hp.max(0.0).floor() as u32,
                max_hp: player.max_hp.max(0.0).floor() as u32,
                kills: state.kills,
                level: state.level,
                xp: state.xp,
                xp_to_level: state.xp_to_level,
                modifier: state.modifier,
            },
            choice_mode: state.choice_mode,
            choices: state.choices.iter().map(|c| c.label()).collect(),
            events: state.events.clone(),
        }
    }

    /// World to screen coordinates (view centered on the camera)
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.camera + Vec2::new(self.width, self.height) * 0.5
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
