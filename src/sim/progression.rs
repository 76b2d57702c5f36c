//! Experience, leveling and choices
//!
//! Orbs are magnet-pulled and picked up here; crossing the xp threshold opens
//! a level choice, and brute kills open a modifier choice (see `combat`).
//! Either choice freezes the simulation until `choose_powerup` resolves it.

use rand::seq::SliceRandom;

use super::events::GameEvent;
use super::state::{Choice, ChoiceMode, GameState, ModifierKind, StatKind};
use crate::direction_to;

/// Pick up orbs in reach, pull nearby ones in and check for level-up
pub fn update_orbs(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let reach = state.player.radius + state.tuning.pickup_margin;
    let magnet_radius = state.tuning.magnet_radius;
    let (base_speed, boost_speed) = (state.tuning.magnet_speed, state.tuning.magnet_speed_boost);

    let mut i = 0;
    while i < state.orbs.len() {
        let orb = &mut state.orbs[i];
        let dist = orb.pos.distance(player_pos);

        if dist <= reach + orb.radius {
            let xp = orb.xp;
            state.orbs.remove(i);
            state.xp += xp;
            check_level_up(state);
            continue;
        }

        if dist <= magnet_radius {
            // Linear from base speed at the magnet edge to boost at the player
            let closeness = 1.0 - dist / magnet_radius;
            let speed = base_speed + (boost_speed - base_speed) * closeness;
            let step = (speed * dt).min(dist);
            orb.pos += direction_to(orb.pos, player_pos) * step;
        }
        i += 1;
    }

    // Surplus xp from earlier ticks (e.g. banked while frozen)
    check_level_up(state);
}

/// Level up once if xp has reached the threshold and no choice is pending.
/// Returns true when a level was gained.
pub fn check_level_up(state: &mut GameState) -> bool {
    if state.is_frozen() || state.xp < state.xp_to_level {
        return false;
    }

    let threshold = state.xp_to_level;
    state.level += 1;
    state.xp -= threshold;
    state.xp_to_level = state.tuning.next_xp_threshold(threshold);

    let player = &mut state.player;
    player.max_hp += state.tuning.level_max_hp;
    player.hp = (player.hp + state.tuning.level_heal).min(player.max_hp);

    state.events.push(GameEvent::LevelUp { new_level: state.level });
    log::info!(
        "Level {} reached (next at {} xp, hp {:.0}/{:.0})",
        state.level,
        state.xp_to_level,
        state.player.hp,
        state.player.max_hp
    );
    open_level_choice(state);
    true
}

/// Offer the three fixed stat bonuses
pub fn open_level_choice(state: &mut GameState) {
    let t = &state.tuning;
    state.choices = StatKind::ALL
        .iter()
        .map(|&stat| Choice::Level {
            stat,
            value: match stat {
                StatKind::Damage => t.bonus_damage,
                StatKind::AttackSpeed => t.bonus_attack_speed,
                StatKind::MoveSpeed => t.bonus_move_speed,
            },
        })
        .collect();
    open(state, ChoiceMode::Level);
}

/// Offer three distinct modifiers drawn from the pool in random order
pub fn open_modifier_choice(state: &mut GameState) {
    let mut pool = ModifierKind::POOL.to_vec();
    pool.shuffle(&mut state.rng);
    pool.truncate(3);
    state.choices = pool.into_iter().map(Choice::Modifier).collect();
    open(state, ChoiceMode::Modifier);
}

fn open(state: &mut GameState, mode: ChoiceMode) {
    state.choice_mode = Some(mode);
    state.events.push(GameEvent::ChoiceOpened { mode });
    log::info!(
        "{:?} choice opened: [{}]",
        mode,
        state.choices.iter().map(Choice::label).collect::<Vec<_>>().join(", ")
    );
}

/// Resolve the pending choice with option `index`.
///
/// Returns false (and changes nothing) when no choice is pending or the index
/// is out of range.
pub fn choose_powerup(state: &mut GameState, index: usize) -> bool {
    if state.choice_mode.is_none() {
        log::debug!("Ignoring pick {}: no choice pending", index);
        return false;
    }
    let Some(&choice) = state.choices.get(index) else {
        log::debug!("Ignoring pick {}: only {} options", index, state.choices.len());
        return false;
    };

    match choice {
        Choice::Level { stat, value } => state.bonuses.add(stat, value),
        Choice::Modifier(kind) => state.modifier = kind,
    }
    log::info!("Picked {}", choice.label());

    state.choices.clear();
    state.choice_mode = None;
    true
}
