//! Game balance tuning
//!
//! Every numeric constant the simulation reads lives here so a run can be
//! re-balanced from a JSON file without recompiling. Missing fields fall back
//! to the stock values.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Inclusive-exclusive sampling range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Per-kind monster template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterTuning {
    pub radius: Range,
    pub speed: Range,
    /// Hp at level 0, time 0
    pub base_hp: f32,
    pub hp_per_level: f32,
    /// Experience carried by the dropped orb
    pub xp: u32,
    pub orb_radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_hp: f32,

    // === Spawning ===
    /// Distance from the player at which monsters appear
    pub spawn_distance: Range,
    /// Grunt spawn countdown before difficulty ramp
    pub spawn_interval: Range,
    /// Ramp reduction per level
    pub spawn_level_ramp: f32,
    /// Ramp reduction per elapsed second
    pub spawn_time_ramp: f32,
    /// Lowest ramp multiplier (caps the spawn rate)
    pub spawn_ramp_floor: f32,
    pub brute_period: f32,
    pub swarm_time: f32,
    pub swarm_count: u32,

    // === Monster scaling ===
    pub grunt: MonsterTuning,
    pub brute: MonsterTuning,
    /// Hp multiplier growth per elapsed second
    pub hp_time_growth: f32,
    /// Speed multiplier growth per elapsed second
    pub speed_time_growth: f32,
    /// Speed multiplier growth per level
    pub speed_level_growth: f32,
    pub max_speed_scale: f32,

    // === Firing ===
    pub fire_base: f32,
    pub fire_level_step: f32,
    pub fire_floor: f32,
    pub fire_cap: f32,
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub bullet_life: f32,
    pub bullet_damage: f32,
    pub bullet_damage_per_level: f32,

    // === Modifiers ===
    pub pierce_charges: u32,
    pub burn_duration: f32,
    pub burn_dps: f32,
    pub burn_dps_per_level: f32,
    /// Angle between the center split shot and each side shot (radians)
    pub split_angle: f32,
    /// Damage fraction carried by each split shot
    pub split_damage: f32,
    pub chain_hops: u32,
    pub chain_radius: f32,
    /// Damage multiplier applied per chain hop
    pub chain_falloff: f32,

    // === Contact ===
    pub contact_dps: f32,
    /// Hurt flash decay per second
    pub hurt_flash_decay: f32,

    // === Orbs ===
    pub pickup_margin: f32,
    pub magnet_radius: f32,
    pub magnet_speed: f32,
    pub magnet_speed_boost: f32,

    // === Progression ===
    pub xp_to_level: u32,
    pub xp_growth: f32,
    pub xp_growth_add: u32,
    pub level_max_hp: f32,
    pub level_heal: f32,
    pub bonus_damage: f32,
    pub bonus_attack_speed: f32,
    pub bonus_move_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_radius: 18.0,
            player_speed: 230.0,
            player_hp: 100.0,

            spawn_distance: Range::new(360.0, 520.0),
            spawn_interval: Range::new(0.35, 0.75),
            spawn_level_ramp: 0.05,
            spawn_time_ramp: 0.002,
            spawn_ramp_floor: 0.2,
            brute_period: 30.0,
            swarm_time: 90.0,
            swarm_count: 24,

            grunt: MonsterTuning {
                radius: Range::new(14.0, 22.0),
                speed: Range::new(70.0, 110.0),
                base_hp: 16.0,
                hp_per_level: 2.0,
                xp: 1,
                orb_radius: 5.0,
            },
            brute: MonsterTuning {
                radius: Range::new(30.0, 38.0),
                speed: Range::new(45.0, 60.0),
                base_hp: 120.0,
                hp_per_level: 12.0,
                xp: 6,
                orb_radius: 9.0,
            },
            hp_time_growth: 0.01,
            speed_time_growth: 0.002,
            speed_level_growth: 0.02,
            max_speed_scale: 1.8,

            fire_base: 0.25,
            fire_level_step: 0.01,
            fire_floor: 0.12,
            fire_cap: 0.3,
            bullet_speed: 420.0,
            bullet_radius: 4.0,
            bullet_life: 1.8,
            bullet_damage: 10.0,
            bullet_damage_per_level: 2.0,

            pierce_charges: 1,
            burn_duration: 3.0,
            burn_dps: 6.0,
            burn_dps_per_level: 1.0,
            split_angle: 0.2,
            split_damage: 0.6,
            chain_hops: 2,
            chain_radius: 220.0,
            chain_falloff: 0.7,

            contact_dps: 18.0,
            hurt_flash_decay: 3.0,

            pickup_margin: 6.0,
            magnet_radius: 140.0,
            magnet_speed: 120.0,
            magnet_speed_boost: 420.0,

            xp_to_level: 8,
            xp_growth: 1.3,
            xp_growth_add: 3,
            level_max_hp: 6.0,
            level_heal: 8.0,
            bonus_damage: 0.15,
            bonus_attack_speed: 0.12,
            bonus_move_speed: 0.08,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their stock values.
    /// Values that would break the simulation are rejected.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), String> {
        let ranges = [
            ("spawn_distance", self.spawn_distance),
            ("spawn_interval", self.spawn_interval),
            ("grunt.radius", self.grunt.radius),
            ("grunt.speed", self.grunt.speed),
            ("brute.radius", self.brute.radius),
            ("brute.speed", self.brute.speed),
        ];
        for (name, range) in ranges {
            if !range.is_valid() {
                return Err(format!("{name}: min {} exceeds max {}", range.min, range.max));
            }
        }
        if self.fire_cap.is_nan() || self.fire_floor > self.fire_cap {
            return Err(format!(
                "fire_floor {} exceeds fire_cap {}",
                self.fire_floor, self.fire_cap
            ));
        }

        let non_negative = [
            ("spawn_level_ramp", self.spawn_level_ramp),
            ("spawn_time_ramp", self.spawn_time_ramp),
            ("spawn_ramp_floor", self.spawn_ramp_floor),
            ("brute_period", self.brute_period),
            ("hp_time_growth", self.hp_time_growth),
            ("speed_time_growth", self.speed_time_growth),
            ("speed_level_growth", self.speed_level_growth),
            ("fire_level_step", self.fire_level_step),
            ("bullet_life", self.bullet_life),
            ("burn_duration", self.burn_duration),
            ("burn_dps", self.burn_dps),
            ("chain_radius", self.chain_radius),
            ("contact_dps", self.contact_dps),
            ("hurt_flash_decay", self.hurt_flash_decay),
            ("pickup_margin", self.pickup_margin),
            ("magnet_radius", self.magnet_radius),
            ("magnet_speed", self.magnet_speed),
            ("magnet_speed_boost", self.magnet_speed_boost),
            ("xp_growth", self.xp_growth),
            ("bonus_damage", self.bonus_damage),
            ("bonus_attack_speed", self.bonus_attack_speed),
            ("bonus_move_speed", self.bonus_move_speed),
        ];
        for (name, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(format!("{name} must be non-negative, got {value}"));
            }
        }
        if self.fire_floor.is_nan() || self.fire_floor <= 0.0 {
            return Err(format!("fire_floor must be positive, got {}", self.fire_floor));
        }
        if self.xp_to_level == 0 {
            return Err("xp_to_level must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load a tuning file, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Threshold after `current` on the xp curve
    pub fn next_xp_threshold(&self, current: u32) -> u32 {
        (current as f32 * self.xp_growth).floor() as u32 + self.xp_growth_add
    }
}
