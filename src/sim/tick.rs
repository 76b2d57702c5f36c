//! Simulation tick
//!
//! Core game loop that advances the simulation one step in a fixed order.

use glam::Vec2;

use super::combat::{apply_contact_damage, move_entities, remove_dead, resolve_collisions, update_firing};
use super::progression::update_orbs;
use super::spawner::update_spawner;
use super::state::GameState;
use crate::normalize_or_zero;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Desired movement direction (any length; normalized by the tick)
    pub movement: Vec2,
}

impl TickInput {
    pub fn new(x: f32, y: f32) -> Self {
        Self { movement: Vec2::new(x, y) }
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Frozen while a level or modifier choice is pending; input is dropped
    if state.is_frozen() {
        return;
    }
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    state.time += dt;
    if state.timers.hurt_flash > 0.0 {
        state.timers.hurt_flash = (state.timers.hurt_flash - dt * state.tuning.hurt_flash_decay).max(0.0);
    }

    let dir = normalize_or_zero(input.movement);
    state.player.pos += dir * state.effective_speed() * dt;

    update_spawner(state, dt);
    update_firing(state, dt);
    move_entities(state, dt);
    apply_contact_damage(state, dt);
    resolve_collisions(state, dt);
    remove_dead(state);
    update_orbs(state, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::progression::{choose_powerup, open_level_choice};
    use crate::sim::state::{Burn, ChoiceMode, ExpOrb, ModifierKind, Monster, MonsterKind};
    use crate::sim::GameEvent;
    use proptest::prelude::*;

    /// State with the spawner parked so tests control every monster
    fn quiet_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.timers.spawn = f32::MAX;
        state.timers.brute = f32::MAX;
        state.tuning.swarm_time = f32::MAX;
        state
    }

    fn add_monster(state: &mut GameState, pos: Vec2, hp: f32, kind: MonsterKind) -> u32 {
        let id = state.next_monster_id();
        state.monsters.push(Monster {
            id,
            kind,
            pos,
            radius: 16.0,
            speed: 0.0,
            hp,
            max_hp: hp,
            burn: Burn::default(),
            xp: 1,
        });
        id
    }

    #[test]
    fn test_player_moves_with_normalized_input() {
        let mut state = quiet_state(1);
        tick(&mut state, &TickInput::new(3.0, 4.0), 0.5);
        let expected = Vec2::new(0.6, 0.8) * state.tuning.player_speed * 0.5;
        assert!((state.player.pos - expected).length() < 1e-3);
    }

    #[test]
    fn test_move_speed_bonus() {
        let mut state = quiet_state(1);
        state.bonuses.move_speed = 0.5;
        tick(&mut state, &TickInput::new(1.0, 0.0), 1.0);
        assert!((state.player.pos.x - state.tuning.player_speed * 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_bad_dt_and_input_are_ignored() {
        let mut state = quiet_state(1);
        tick(&mut state, &TickInput::new(f32::NAN, 1.0), f32::NAN);
        assert_eq!(state.player.pos, Vec2::ZERO);
        assert_eq!(state.time, 0.0);
        tick(&mut state, &TickInput::new(1.0, 0.0), -1.0);
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_hurt_flash_decays() {
        let mut state = quiet_state(1);
        state.timers.hurt_flash = 1.0;
        tick(&mut state, &TickInput::default(), 0.1);
        assert!((state.timers.hurt_flash - 0.7).abs() < 1e-5);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.timers.hurt_flash, 0.0);
    }

    #[test]
    fn test_frozen_tick_changes_nothing() {
        let mut state = quiet_state(1);
        add_monster(&mut state, Vec2::new(100.0, 0.0), 50.0, MonsterKind::Grunt);
        state.orbs.push(ExpOrb { pos: Vec2::new(30.0, 0.0), radius: 5.0, xp: 1 });
        open_level_choice(&mut state);

        let time = state.time;
        tick(&mut state, &TickInput::new(1.0, 1.0), 0.5);
        assert_eq!(state.time, time);
        assert_eq!(state.player.pos, Vec2::ZERO);
        assert_eq!(state.monsters[0].pos, Vec2::new(100.0, 0.0));
        assert!(state.bullets.is_empty());
        assert_eq!(state.orbs.len(), 1);
        assert_eq!(state.xp, 0);

        assert!(choose_powerup(&mut state, 0));
        tick(&mut state, &TickInput::new(1.0, 0.0), 0.1);
        assert!(state.time > time);
        assert!(state.player.pos.x > 0.0);
    }

    #[test]
    fn test_grunt_in_firing_line_dies_after_expected_shots() {
        let mut state = quiet_state(7);
        let hp = 30.0;
        let death_pos = Vec2::new(400.0, 0.0);
        add_monster(&mut state, death_pos, hp, MonsterKind::Grunt);
        let per_shot = crate::sim::combat::shot_damage(&state);
        let shots_needed = (hp / per_shot).ceil() as u32;

        let mut hits = 0;
        let mut last_hp = hp;
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            match state.monsters.first() {
                Some(m) if m.hp < last_hp => {
                    hits += 1;
                    last_hp = m.hp;
                }
                Some(_) => {}
                None => {
                    hits += 1;
                    break;
                }
            }
        }

        assert!(state.monsters.is_empty());
        assert_eq!(hits, shots_needed);
        assert_eq!(state.kills, 1);
        assert_eq!(state.orbs.len(), 1);
        assert_eq!(state.orbs[0].pos, death_pos);
    }

    #[test]
    fn test_brute_kill_freezes_with_modifier_choice() {
        let mut state = quiet_state(3);
        add_monster(&mut state, Vec2::new(120.0, 0.0), 1.0, MonsterKind::Brute);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.is_frozen() {
                break;
            }
        }
        assert_eq!(state.kills, 1);
        assert_eq!(state.choice_mode, Some(ChoiceMode::Modifier));
        assert_eq!(state.choices.len(), 3);

        let frozen_bullets = state.bullets.len();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.bullets.len(), frozen_bullets);

        assert!(choose_powerup(&mut state, 0));
        assert_ne!(state.modifier, ModifierKind::None);
    }

    #[test]
    fn test_dead_monsters_removed_same_tick() {
        let mut state = quiet_state(5);
        for i in 0..5 {
            add_monster(&mut state, Vec2::new(60.0 + i as f32 * 40.0, 0.0), 1.0, MonsterKind::Grunt);
        }
        state.modifier = ModifierKind::Piercing;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(state.monsters.iter().all(|m| m.hp > 0.0));
            assert!(state.bullets.iter().all(|b| b.life > 0.0));
            if state.is_frozen() {
                choose_powerup(&mut state, 0);
            }
        }
        assert_eq!(state.kills, 5);
    }

    #[test]
    fn test_events_describe_latest_tick() {
        let mut state = GameState::new(12);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::MonsterSpawned { .. })));
        state.timers.spawn = f32::MAX;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::MonsterSpawned { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let inputs = [
            TickInput::new(1.0, 0.0),
            TickInput::new(0.0, -1.0),
            TickInput::new(-0.5, 0.5),
            TickInput::default(),
        ];

        for step in 0..600 {
            let input = &inputs[step % inputs.len()];
            tick(&mut state1, input, SIM_DT);
            tick(&mut state2, input, SIM_DT);
            if state1.is_frozen() {
                choose_powerup(&mut state1, 0);
                choose_powerup(&mut state2, 0);
            }
        }

        assert_eq!(state1.kills, state2.kills);
        assert_eq!(state1.monsters.len(), state2.monsters.len());
        assert_eq!(state1.level, state2.level);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.player.hp, state2.player.hp);
    }

    #[test]
    fn test_player_hp_never_negative_and_sim_keeps_running() {
        let mut state = quiet_state(2);
        for i in 0..8 {
            let angle = i as f32 * std::f32::consts::FRAC_PI_4;
            add_monster(&mut state, Vec2::new(angle.cos(), angle.sin()) * 10.0, 1e6, MonsterKind::Grunt);
        }
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert!(state.player.hp >= 0.0);
            if state.is_frozen() {
                choose_powerup(&mut state, 0);
            }
        }
        assert!(state.is_player_dead());
        assert!(state.time > 9.0);
    }

    proptest! {
        #[test]
        fn prop_frozen_state_is_untouched(
            seed in any::<u64>(),
            x in -5.0f32..5.0,
            y in -5.0f32..5.0,
            dt in 0.0f32..0.1,
        ) {
            let mut state = GameState::new(seed);
            for _ in 0..30 {
                tick(&mut state, &TickInput::default(), 1.0 / 60.0);
            }
            open_level_choice(&mut state);
            let before = state.clone();

            tick(&mut state, &TickInput::new(x, y), dt);

            prop_assert_eq!(state.time, before.time);
            prop_assert_eq!(state.player.pos, before.player.pos);
            prop_assert_eq!(state.monsters.len(), before.monsters.len());
            for (a, b) in state.monsters.iter().zip(&before.monsters) {
                prop_assert_eq!(a.pos, b.pos);
                prop_assert_eq!(a.hp, b.hp);
            }
            prop_assert_eq!(state.bullets.len(), before.bullets.len());
            prop_assert_eq!(state.orbs.len(), before.orbs.len());
            prop_assert_eq!(state.kills, before.kills);
            prop_assert_eq!(state.level, before.level);
            prop_assert_eq!(state.xp, before.xp);
        }

        #[test]
        fn prop_player_step_bounded_by_speed(
            x in -10.0f32..10.0,
            y in -10.0f32..10.0,
            dt in 0.0f32..0.05,
        ) {
            let mut state = quiet_state(1);
            tick(&mut state, &TickInput::new(x, y), dt);
            let moved = state.player.pos.length();
            prop_assert!(moved <= state.tuning.player_speed * dt + 1e-3);
        }

        #[test]
        fn prop_orb_on_player_always_collected(
            px in -1000.0f32..1000.0,
            py in -1000.0f32..1000.0,
            magnet in 0.0f32..500.0,
        ) {
            let mut state = quiet_state(1);
            state.tuning.magnet_radius = magnet;
            state.player.pos = Vec2::new(px, py);
            state.orbs.push(ExpOrb { pos: state.player.pos, radius: 5.0, xp: 1 });
            tick(&mut state, &TickInput::default(), 1.0 / 60.0);
            prop_assert!(state.orbs.is_empty());
            prop_assert_eq!(state.xp, 1);
        }
    }
}
