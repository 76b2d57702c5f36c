//! Events raised during a tick
//!
//! Collected in `GameState::events` for the view layer (sounds, flashes,
//! popups). Cleared at the start of every tick; the simulation itself never
//! reads them back.

use glam::Vec2;
use serde::Serialize;

use super::state::{ChoiceMode, MonsterKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    MonsterSpawned { id: u32, kind: MonsterKind },
    MonsterKilled { id: u32, kind: MonsterKind, pos: Vec2 },
    LevelUp { new_level: u32 },
    ChoiceOpened { mode: ChoiceMode },
    SwarmReleased { count: u32 },
    PlayerHurt { damage: f32 },
    /// Player hp reached zero (raised once per run)
    PlayerDowned,
}
