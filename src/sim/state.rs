//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`, including the timers and
//! the seeded RNG, so two states built from the same seed evolve identically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::tuning::Tuning;

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Base movement speed before bonuses
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            radius: tuning.player_radius,
            speed: tuning.player_speed,
            hp: tuning.player_hp,
            max_hp: tuning.player_hp,
        }
    }
}

/// Monster types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonsterKind {
    #[default]
    Grunt,
    /// Larger, slower, tougher; dropping one opens a modifier choice
    Brute,
}

/// Damage-over-time state, shared by burning monsters and burn bullets
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Burn {
    /// Seconds left
    pub remaining: f32,
    /// Damage per second
    pub dps: f32,
}

impl Burn {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0 && self.dps > 0.0
    }

    /// Non-stacking refresh: each component keeps the larger value
    pub fn refresh(&mut self, other: Burn) {
        self.remaining = self.remaining.max(other.remaining);
        self.dps = self.dps.max(other.dps);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub kind: MonsterKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub burn: Burn,
    pub xp: u32,
}

impl Monster {
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Subtract damage, clamping at zero. Returns true when this call killed it.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = (self.hp - amount).max(0.0);
        self.hp <= 0.0
    }
}

/// Bullet behaviours the player can equip (one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModifierKind {
    #[default]
    None,
    Piercing,
    Burn,
    Split,
    Chain,
}

impl ModifierKind {
    /// Pool offered by modifier choices
    pub const POOL: [ModifierKind; 4] = [
        ModifierKind::Piercing,
        ModifierKind::Burn,
        ModifierKind::Split,
        ModifierKind::Chain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModifierKind::None => "None",
            ModifierKind::Piercing => "Piercing",
            ModifierKind::Burn => "Burn",
            ModifierKind::Split => "Split",
            ModifierKind::Chain => "Chain",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Seconds until the bullet expires; retired bullets are set to 0
    pub life: f32,
    pub modifier: ModifierKind,
    pub pierce: u32,
    pub chain_hops: u32,
    /// Burn payload (zero unless the modifier is `Burn`)
    pub burn: Burn,
    /// Monsters this bullet already struck; never hit twice
    #[serde(default)]
    pub hit_ids: Vec<u32>,
}

impl Bullet {
    pub fn is_live(&self) -> bool {
        self.life > 0.0
    }

    pub fn retire(&mut self) {
        self.life = 0.0;
    }

    pub fn has_hit(&self, monster_id: u32) -> bool {
        self.hit_ids.contains(&monster_id)
    }
}

/// Experience orb dropped by a dead monster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpOrb {
    pub pos: Vec2,
    pub radius: f32,
    pub xp: u32,
}

/// Stat raised by a level choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatKind {
    Damage,
    AttackSpeed,
    MoveSpeed,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Damage, StatKind::AttackSpeed, StatKind::MoveSpeed];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Damage => "Damage",
            StatKind::AttackSpeed => "Attack Speed",
            StatKind::MoveSpeed => "Move Speed",
        }
    }
}

/// One pending option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Choice {
    /// Percentage bonus to a stat (0.15 = +15%)
    Level { stat: StatKind, value: f32 },
    /// Replace the equipped bullet modifier
    Modifier(ModifierKind),
}

impl Choice {
    pub fn label(&self) -> String {
        match self {
            Choice::Level { stat, value } => {
                format!("{} +{}%", stat.as_str(), (value * 100.0).round())
            }
            Choice::Modifier(kind) => kind.as_str().to_string(),
        }
    }
}

/// Which kind of choice is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceMode {
    Level,
    Modifier,
}

/// Cumulative stat bonuses (fractions, only ever grow)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bonuses {
    pub damage: f32,
    pub attack_speed: f32,
    pub move_speed: f32,
}

impl Bonuses {
    pub fn add(&mut self, stat: StatKind, value: f32) {
        let value = value.max(0.0);
        match stat {
            StatKind::Damage => self.damage += value,
            StatKind::AttackSpeed => self.attack_speed += value,
            StatKind::MoveSpeed => self.move_speed += value,
        }
    }
}

/// Countdowns driving the spawner, the gun and the hurt flash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timers {
    pub spawn: f32,
    pub fire: f32,
    pub brute: f32,
    /// Hurt flash intensity (1 on contact, decays to 0)
    pub hurt_flash: f32,
    pub swarm_released: bool,
}

impl Timers {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            spawn: 0.0,
            fire: 0.0,
            brute: tuning.brute_period,
            hurt_flash: 0.0,
            swarm_released: false,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// View bounds (camera framing only)
    pub width: f32,
    pub height: f32,
    /// Elapsed simulated seconds (frozen time excluded)
    pub time: f32,
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub bullets: Vec<Bullet>,
    pub orbs: Vec<ExpOrb>,
    pub choice_mode: Option<ChoiceMode>,
    pub choices: Vec<Choice>,
    pub kills: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_level: u32,
    pub bonuses: Bonuses,
    pub modifier: ModifierKind,
    pub timers: Timers,
    /// Events raised during the last unfrozen tick
    pub events: Vec<GameEvent>,
    /// Whether `PlayerDowned` has been raised
    pub downed: bool,
    next_monster_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and stock tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            width: 0.0,
            height: 0.0,
            time: 0.0,
            player: Player::new(&tuning),
            monsters: Vec::new(),
            bullets: Vec::new(),
            orbs: Vec::new(),
            choice_mode: None,
            choices: Vec::new(),
            kills: 0,
            level: 1,
            xp: 0,
            xp_to_level: tuning.xp_to_level,
            bonuses: Bonuses::default(),
            modifier: ModifierKind::None,
            timers: Timers::new(&tuning),
            events: Vec::new(),
            downed: false,
            next_monster_id: 0,
            tuning,
        }
    }

    /// Store view bounds; no simulation effect
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Allocate a monster id (monotonic, never reused)
    pub fn next_monster_id(&mut self) -> u32 {
        let id = self.next_monster_id;
        self.next_monster_id += 1;
        id
    }

    /// True while a level or modifier choice freezes the simulation
    pub fn is_frozen(&self) -> bool {
        self.choice_mode.is_some()
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.hp <= 0.0
    }

    /// Player speed including the move-speed bonus
    pub fn effective_speed(&self) -> f32 {
        self.player.speed * (1.0 + self.bonuses.move_speed)
    }
}
