//! Combat resolution
//!
//! Auto-targeting, bullet generation per equipped modifier, movement, contact
//! damage and the per-monster collision pass (burn, pierce, chain, death).

use glam::Vec2;

use super::events::GameEvent;
use super::progression::open_modifier_choice;
use super::state::{Bullet, Burn, ExpOrb, GameState, ModifierKind, Monster, MonsterKind};
use crate::tuning::Tuning;
use crate::{circles_overlap, direction_to, rotate};

/// Index of the live monster closest to `pos`. Ties go to the first one.
pub fn find_nearest_monster(monsters: &[Monster], pos: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, monster) in monsters.iter().enumerate() {
        if !monster.is_alive() {
            continue;
        }
        let d = monster.pos.distance_squared(pos);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Nearest live monster within `radius` of `pos`, skipping `exclude` and any
/// monster id in `already_hit`
fn find_chain_target(
    monsters: &[Monster],
    exclude: usize,
    pos: Vec2,
    radius: f32,
    already_hit: &[u32],
) -> Option<usize> {
    let radius_sq = radius * radius;
    let mut best: Option<(usize, f32)> = None;
    for (i, monster) in monsters.iter().enumerate() {
        if i == exclude || !monster.is_alive() || already_hit.contains(&monster.id) {
            continue;
        }
        let d = monster.pos.distance_squared(pos);
        if d <= radius_sq && best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Seconds between shots at the current level and attack-speed bonus
pub fn fire_cooldown(state: &GameState) -> f32 {
    let t = &state.tuning;
    // A floor above the cap resolves to the cap
    let base = (t.fire_base - state.level as f32 * t.fire_level_step)
        .max(t.fire_floor)
        .min(t.fire_cap);
    base / (1.0 + state.bonuses.attack_speed)
}

/// Damage of a single unmodified shot
pub fn shot_damage(state: &GameState) -> f32 {
    let t = &state.tuning;
    (t.bullet_damage + state.level as f32 * t.bullet_damage_per_level) * (1.0 + state.bonuses.damage)
}

fn new_bullet(tuning: &Tuning, pos: Vec2, dir: Vec2, damage: f32, modifier: ModifierKind) -> Bullet {
    Bullet {
        pos,
        vel: dir * tuning.bullet_speed,
        radius: tuning.bullet_radius,
        damage,
        life: tuning.bullet_life,
        modifier,
        pierce: 0,
        chain_hops: 0,
        burn: Burn::default(),
        hit_ids: Vec::new(),
    }
}

/// Tick the gun and shoot at the nearest monster when ready
pub fn update_firing(state: &mut GameState, dt: f32) {
    state.timers.fire -= dt;
    if state.timers.fire > 0.0 {
        return;
    }
    let Some(target) = find_nearest_monster(&state.monsters, state.player.pos) else {
        return;
    };
    let target_pos = state.monsters[target].pos;
    fire_at(state, target_pos);
    state.timers.fire = fire_cooldown(state);
}

/// Fire one shot from the player toward `target` using the equipped modifier.
/// Returns the number of bullets created.
pub fn fire_at(state: &mut GameState, target: Vec2) -> usize {
    let origin = state.player.pos;
    let dir = direction_to(origin, target);
    let damage = shot_damage(state);
    let t = &state.tuning;
    let modifier = state.modifier;

    match modifier {
        ModifierKind::Split => {
            let side = damage * t.split_damage;
            for angle in [0.0, t.split_angle, -t.split_angle] {
                let bullet = new_bullet(t, origin, rotate(dir, angle), side, modifier);
                state.bullets.push(bullet);
            }
            3
        }
        _ => {
            let mut bullet = new_bullet(t, origin, dir, damage, modifier);
            match modifier {
                ModifierKind::Piercing => bullet.pierce = t.pierce_charges,
                ModifierKind::Burn => {
                    bullet.burn = Burn {
                        remaining: t.burn_duration,
                        dps: t.burn_dps + state.level as f32 * t.burn_dps_per_level,
                    };
                }
                ModifierKind::Chain => bullet.chain_hops = t.chain_hops,
                _ => {}
            }
            state.bullets.push(bullet);
            1
        }
    }
}

/// Monsters walk toward the player; bullets fly and age
pub fn move_entities(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    for monster in &mut state.monsters {
        monster.pos += direction_to(monster.pos, player_pos) * monster.speed * dt;
    }
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
        bullet.life -= dt;
    }
}

/// Continuous drain from every monster overlapping the player
pub fn apply_contact_damage(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    let drain = state.tuning.contact_dps * dt;
    let before = player.hp;
    let mut touched = false;

    for monster in &state.monsters {
        if monster.is_alive() && circles_overlap(monster.pos, monster.radius, player.pos, player.radius) {
            player.hp = (player.hp - drain).max(0.0);
            touched = true;
        }
    }

    if touched {
        state.timers.hurt_flash = 1.0;
        let damage = before - player.hp;
        if damage > 0.0 {
            state.events.push(GameEvent::PlayerHurt { damage });
        }
        if player.hp <= 0.0 && !state.downed {
            state.downed = true;
            state.events.push(GameEvent::PlayerDowned);
            log::info!("Player downed at t={:.1}s (level {}, {} kills)", state.time, state.level, state.kills);
        }
    }
}

/// Burn ticks, bullet hits and deaths. Each monster takes at most one bullet
/// hit per tick.
pub fn resolve_collisions(state: &mut GameState, dt: f32) {
    for i in 0..state.monsters.len() {
        if !state.monsters[i].is_alive() {
            continue;
        }

        let monster = &mut state.monsters[i];
        if monster.burn.is_active() {
            let damage = monster.burn.dps * dt;
            monster.burn.remaining = (monster.burn.remaining - dt).max(0.0);
            if monster.burn.remaining <= 0.0 {
                monster.burn = Burn::default();
            }
            if monster.take_damage(damage) {
                resolve_death(state, i);
                continue;
            }
        }

        let monster = &state.monsters[i];
        let hit = state.bullets.iter().position(|b| {
            b.is_live()
                && !b.has_hit(monster.id)
                && circles_overlap(monster.pos, monster.radius, b.pos, b.radius)
        });
        if let Some(b) = hit {
            apply_bullet_hit(state, i, b);
        }
    }
}

fn apply_bullet_hit(state: &mut GameState, mi: usize, bi: usize) {
    let (monster_id, monster_pos) = {
        let m = &state.monsters[mi];
        (m.id, m.pos)
    };
    let bullet = &mut state.bullets[bi];
    bullet.hit_ids.push(monster_id);
    let damage = bullet.damage;
    let modifier = bullet.modifier;
    let burn = bullet.burn;
    let chain_hops = bullet.chain_hops;

    let killed = state.monsters[mi].take_damage(damage);
    if modifier == ModifierKind::Burn {
        state.monsters[mi].burn.refresh(burn);
    }

    if modifier == ModifierKind::Chain && chain_hops > 0 {
        let radius = state.tuning.chain_radius;
        let target = find_chain_target(&state.monsters, mi, monster_pos, radius, &state.bullets[bi].hit_ids);
        if let Some(ti) = target {
            let dir = direction_to(monster_pos, state.monsters[ti].pos);
            let mut chained = new_bullet(
                &state.tuning,
                monster_pos,
                dir,
                damage * state.tuning.chain_falloff,
                ModifierKind::Chain,
            );
            chained.chain_hops = chain_hops - 1;
            chained.hit_ids = state.bullets[bi].hit_ids.clone();
            state.bullets.push(chained);
        }
    }

    let bullet = &mut state.bullets[bi];
    if bullet.pierce > 0 {
        bullet.pierce -= 1;
    } else {
        bullet.retire();
    }

    if killed {
        resolve_death(state, mi);
    }
}

/// Count the kill, drop an orb and open a modifier choice for brutes
fn resolve_death(state: &mut GameState, idx: usize) {
    let (id, kind, pos, xp) = {
        let m = &state.monsters[idx];
        (m.id, m.kind, m.pos, m.xp)
    };
    state.kills += 1;
    let radius = match kind {
        MonsterKind::Grunt => state.tuning.grunt.orb_radius,
        MonsterKind::Brute => state.tuning.brute.orb_radius,
    };
    state.orbs.push(ExpOrb { pos, radius, xp });
    state.events.push(GameEvent::MonsterKilled { id, kind, pos });

    if kind == MonsterKind::Brute && !state.is_frozen() {
        open_modifier_choice(state);
    }
}

/// Drop dead monsters and expired or spent bullets, keeping order
pub fn remove_dead(state: &mut GameState) {
    state.monsters.retain(Monster::is_alive);
    state.bullets.retain(Bullet::is_live);
}
