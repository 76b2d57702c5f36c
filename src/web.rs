//! Browser bindings
//!
//! Thin wrapper the page script drives once per animation frame: it feeds the
//! keyboard/touch vector into `update`, draws from `snapshot_json` and forwards
//! choice clicks to `choose_powerup`.

use wasm_bindgen::prelude::*;

use crate::consts::MAX_FRAME_DT;
use crate::sim::{self, GameState, TickInput};
use crate::snapshot::RenderSnapshot;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        // Already set (hot reload); the existing logger still works
        log::warn!("Logger init failed: {}", e);
    }
    log::info!("Horde Survivor starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
}

#[wasm_bindgen]
impl WebGame {
    /// New run; a zero seed picks one from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        let seed = if seed > 0.0 { seed as u64 } else { js_sys::Date::now() as u64 };
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            state: GameState::new(seed),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Advance one frame; long frame gaps are clamped
    pub fn update(&mut self, dt: f32, x: f32, y: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        sim::tick(&mut self.state, &TickInput::new(x, y), dt);
    }

    pub fn choose_powerup(&mut self, index: usize) -> bool {
        sim::choose_powerup(&mut self.state, index)
    }

    pub fn snapshot_json(&self) -> String {
        match RenderSnapshot::capture(&self.state).to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                String::from("{}")
            }
        }
    }

    pub fn hp(&self) -> f32 {
        self.state.player.hp.max(0.0).floor()
    }

    pub fn kills(&self) -> u32 {
        self.state.kills
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn is_choosing(&self) -> bool {
        self.state.is_frozen()
    }

    pub fn is_player_dead(&self) -> bool {
        self.state.is_player_dead()
    }
}
