//! Horde Survivor - simulation core of a top-down auto-shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, combat, progression, tick loop)
//! - `tuning`: Data-driven game balance
//! - `snapshot`: Read-only view of the state for renderers and HUDs

pub mod sim;
pub mod snapshot;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use snapshot::RenderSnapshot;
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Driver configuration constants
pub mod consts {
    /// Nominal simulation timestep for headless drivers (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest frame gap a driver should feed into a single tick
    pub const MAX_FRAME_DT: f32 = 0.033;
}

/// Unit vector toward `v`, or zero for zero-length and non-finite input
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    if !v.is_finite() {
        return Vec2::ZERO;
    }
    v.normalize_or_zero()
}

/// Unit direction from `from` toward `to` (zero when they coincide)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    normalize_or_zero(to - from)
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Convert polar (r, theta) around `center` to cartesian
#[inline]
pub fn polar_offset(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Uniform sample in `[min, max)`; degenerate ranges return `min`
#[inline]
pub fn rand_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    min + rng.random::<f32>() * (max - min)
}

/// Two circles overlap (strictly closer than the sum of radii)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}
