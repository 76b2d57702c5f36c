//! Monster spawning
//!
//! Three independent sources: a ramping grunt timer, a fixed-period brute
//! timer and a one-shot swarm once the run has lasted long enough.

use std::f32::consts::TAU;

use super::events::GameEvent;
use super::state::{Burn, GameState, Monster, MonsterKind};
use crate::{polar_offset, rand_range};

/// Advance spawn timers and create any monsters that are due
pub fn update_spawner(state: &mut GameState, dt: f32) {
    state.timers.spawn -= dt;
    if state.timers.spawn <= 0.0 {
        let interval = rand_range(
            &mut state.rng,
            state.tuning.spawn_interval.min,
            state.tuning.spawn_interval.max,
        );
        state.timers.spawn = interval * spawn_ramp(state);
        spawn_monster(state, MonsterKind::Grunt);
    }

    state.timers.brute -= dt;
    if state.timers.brute <= 0.0 {
        state.timers.brute = state.tuning.brute_period;
        let id = spawn_monster(state, MonsterKind::Brute);
        log::info!("Brute {} spawned at t={:.1}s", id, state.time);
    }

    if !state.timers.swarm_released && state.time >= state.tuning.swarm_time {
        state.timers.swarm_released = true;
        let count = state.tuning.swarm_count;
        for _ in 0..count {
            spawn_monster(state, MonsterKind::Grunt);
        }
        state.events.push(GameEvent::SwarmReleased { count });
        log::info!("Swarm of {} released at t={:.1}s", count, state.time);
    }
}

/// Multiplier applied to the grunt spawn countdown; shrinks with level and
/// time down to the configured floor
pub fn spawn_ramp(state: &GameState) -> f32 {
    let t = &state.tuning;
    (1.0 - state.level as f32 * t.spawn_level_ramp - state.time * t.spawn_time_ramp)
        .max(t.spawn_ramp_floor)
}

/// Hp multiplier from elapsed time
pub fn hp_scale(state: &GameState) -> f32 {
    1.0 + state.time * state.tuning.hp_time_growth
}

/// Speed multiplier from elapsed time and level
pub fn speed_scale(state: &GameState) -> f32 {
    let t = &state.tuning;
    let time_scale = 1.0 + state.time * t.speed_time_growth;
    let level_scale = 1.0 + state.level as f32 * t.speed_level_growth;
    (time_scale * level_scale).min(t.max_speed_scale)
}

/// Spawn one monster of `kind` on a ring around the player. Returns its id.
pub fn spawn_monster(state: &mut GameState, kind: MonsterKind) -> u32 {
    let template = match kind {
        MonsterKind::Grunt => state.tuning.grunt.clone(),
        MonsterKind::Brute => state.tuning.brute.clone(),
    };

    let angle = rand_range(&mut state.rng, 0.0, TAU);
    let distance = rand_range(
        &mut state.rng,
        state.tuning.spawn_distance.min,
        state.tuning.spawn_distance.max,
    );
    let pos = polar_offset(state.player.pos, distance, angle);
    let radius = rand_range(&mut state.rng, template.radius.min, template.radius.max);
    let speed = rand_range(&mut state.rng, template.speed.min, template.speed.max) * speed_scale(state);
    let hp = (template.base_hp + template.hp_per_level * state.level as f32) * hp_scale(state);

    let id = state.next_monster_id();
    state.monsters.push(Monster {
        id,
        kind,
        pos,
        radius,
        speed,
        hp,
        max_hp: hp,
        burn: Burn::default(),
        xp: template.xp,
    });
    state.events.push(GameEvent::MonsterSpawned { id, kind });
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_spawns_a_grunt() {
        let mut state = GameState::new(42);
        update_spawner(&mut state, 1.0 / 60.0);
        assert_eq!(state.monsters.len(), 1);
        assert_eq!(state.monsters[0].kind, MonsterKind::Grunt);
        assert!(state.timers.spawn > 0.0);
    }

    #[test]
    fn test_spawn_distance_within_range() {
        let mut state = GameState::new(5);
        state.player.pos = glam::Vec2::new(100.0, -50.0);
        for _ in 0..200 {
            spawn_monster(&mut state, MonsterKind::Grunt);
        }
        let range = state.tuning.spawn_distance;
        for m in &state.monsters {
            let d = m.pos.distance(state.player.pos);
            assert!(d >= range.min - 0.01 && d <= range.max + 0.01, "distance {d}");
        }
    }

    #[test]
    fn test_brute_is_tougher_bigger_slower() {
        let mut state = GameState::new(9);
        for _ in 0..50 {
            spawn_monster(&mut state, MonsterKind::Grunt);
            spawn_monster(&mut state, MonsterKind::Brute);
        }
        let (grunts, brutes): (Vec<_>, Vec<_>) =
            state.monsters.iter().partition(|m| m.kind == MonsterKind::Grunt);
        let max_grunt_hp = grunts.iter().map(|m| m.hp).fold(0.0, f32::max);
        let min_brute_hp = brutes.iter().map(|m| m.hp).fold(f32::MAX, f32::min);
        let max_grunt_r = grunts.iter().map(|m| m.radius).fold(0.0, f32::max);
        let min_brute_r = brutes.iter().map(|m| m.radius).fold(f32::MAX, f32::min);
        let min_grunt_speed = grunts.iter().map(|m| m.speed).fold(f32::MAX, f32::min);
        let max_brute_speed = brutes.iter().map(|m| m.speed).fold(0.0, f32::max);
        assert!(min_brute_hp > max_grunt_hp);
        assert!(min_brute_r > max_grunt_r);
        assert!(max_brute_speed < min_grunt_speed);
    }

    #[test]
    fn test_ids_unique_across_spawns() {
        let mut state = GameState::new(11);
        for _ in 0..100 {
            spawn_monster(&mut state, MonsterKind::Grunt);
        }
        let mut ids: Vec<u32> = state.monsters.iter().map(|m| m.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_ramp_decreases_and_is_floored() {
        let mut state = GameState::new(1);
        let early = spawn_ramp(&state);
        state.level = 8;
        state.time = 120.0;
        let later = spawn_ramp(&state);
        assert!(later < early);
        state.level = 500;
        assert_eq!(spawn_ramp(&state), state.tuning.spawn_ramp_floor);
    }

    #[test]
    fn test_monster_stats_scale_with_time_and_level() {
        let mut state = GameState::new(2);
        let base_hp = state.tuning.grunt.base_hp + state.tuning.grunt.hp_per_level;
        spawn_monster(&mut state, MonsterKind::Grunt);
        assert!((state.monsters[0].hp - base_hp).abs() < 1e-4);

        state.time = 100.0;
        state.level = 4;
        spawn_monster(&mut state, MonsterKind::Grunt);
        assert!(state.monsters[1].hp > base_hp * 2.0);
        assert!(speed_scale(&state) > 1.0);
    }

    #[test]
    fn test_brute_timer_resets_to_period() {
        let mut state = GameState::new(4);
        state.timers.spawn = 100.0;
        state.timers.brute = 0.01;
        update_spawner(&mut state, 0.02);
        assert_eq!(state.monsters.len(), 1);
        assert_eq!(state.monsters[0].kind, MonsterKind::Brute);
        assert_eq!(state.timers.brute, state.tuning.brute_period);
    }

    #[test]
    fn test_swarm_fires_exactly_once() {
        let mut state = GameState::new(8);
        state.timers.spawn = 1000.0;
        state.timers.brute = 1000.0;
        state.time = state.tuning.swarm_time;
        update_spawner(&mut state, 0.01);
        let swarm = state.tuning.swarm_count as usize;
        assert_eq!(state.monsters.len(), swarm);
        assert!(state.timers.swarm_released);

        state.time += 10.0;
        update_spawner(&mut state, 0.01);
        assert_eq!(state.monsters.len(), swarm);
        let released = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::SwarmReleased { .. }))
            .count();
        assert_eq!(released, 1);
    }
}
