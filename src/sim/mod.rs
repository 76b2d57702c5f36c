//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (insertion order, filtered with `retain`)
//! - No rendering or platform dependencies

pub mod combat;
pub mod events;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;

pub use events::GameEvent;
pub use progression::choose_powerup;
pub use state::{
    Bonuses, Bullet, Burn, Choice, ChoiceMode, ExpOrb, GameState, ModifierKind, Monster,
    MonsterKind, Player, StatKind, Timers,
};
pub use tick::{TickInput, tick};
