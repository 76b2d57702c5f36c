//! Horde Survivor entry point
//!
//! The browser build is driven from JavaScript through `horde_survivor::web`.
//! Natively this runs a headless session with a simple kiting autopilot,
//! which is handy for balance passes: `horde-survivor [seed] [tuning.json]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use horde_survivor::consts::{MAX_FRAME_DT, SIM_DT};
    use horde_survivor::sim::{GameEvent, GameState, MonsterKind, TickInput, choose_powerup, tick};
    use horde_survivor::{RenderSnapshot, Tuning};

    /// Stop after this many simulated seconds if the player is still alive
    const TIME_CAP: f32 = 600.0;

    env_logger::init();
    log::info!("Horde Survivor (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Seed '{}' is not a number, using 1", arg);
            1
        }),
        None => 1,
    };
    let tuning = args.next().map(Tuning::load_or_default).unwrap_or_default();

    let mut state = GameState::with_tuning(seed, tuning);
    state.resize(1280.0, 720.0);
    log::info!("Game initialized with seed: {}", seed);

    let dt = SIM_DT.min(MAX_FRAME_DT);
    let mut brutes_killed = 0u32;
    let mut next_report = 10.0;

    while !state.is_player_dead() && state.time < TIME_CAP {
        let input = autopilot(&state);
        tick(&mut state, &input, dt);

        for event in &state.events {
            if let GameEvent::MonsterKilled { kind: MonsterKind::Brute, .. } = event {
                brutes_killed += 1;
            }
        }

        if state.is_frozen() {
            // Always take the first offer
            choose_powerup(&mut state, 0);
        }

        if state.time >= next_report {
            next_report += 10.0;
            let snap = RenderSnapshot::capture(&state);
            log::info!(
                "t={:.0}s hp={}/{} level={} kills={} monsters={} bullets={} orbs={} modifier={:?}",
                state.time,
                snap.hud.hp,
                snap.hud.max_hp,
                snap.hud.level,
                snap.hud.kills,
                snap.monsters.len(),
                snap.bullets.len(),
                snap.orbs.len(),
                snap.hud.modifier
            );
        }
    }

    println!(
        "Run {} over after {:.1}s: level {}, {} kills ({} brutes), {:?} equipped, bonuses {:?}",
        state.seed, state.time, state.level, state.kills, brutes_killed, state.modifier, state.bonuses
    );

    /// Run from the nearest monster while circling so the gun keeps working
    fn autopilot(state: &GameState) -> TickInput {
        use horde_survivor::sim::combat::find_nearest_monster;

        let Some(i) = find_nearest_monster(&state.monsters, state.player.pos) else {
            return TickInput::default();
        };
        let away = state.player.pos - state.monsters[i].pos;
        let tangent = away.perp();
        TickInput {
            movement: away.normalize_or_zero() + tangent.normalize_or_zero() * 0.6,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::wasm_start`, this is just to satisfy the compiler
}
