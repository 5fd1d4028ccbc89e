//! Neon Coil - simulation core for a grid-stepping serpent arcade shooter
//!
//! Core modules:
//! - `sim`: Per-tick simulation (movement, weapons, collisions, damage, camera)
//! - `settings`: User-facing configuration (difficulty, camera feel)
//!
//! Rendering, audio playback, input capture and HUD layouts live outside this
//! crate. They read snapshots of [`sim::WorldState`], drain its sound/event
//! queues, and push intents through [`sim::TickInput`].

pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Projectile velocities are expressed per frame at this rate
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Arena dimensions in grid cells
    pub const ARENA_WIDTH: i32 = 48;
    pub const ARENA_HEIGHT: i32 = 32;

    /// Player body defaults
    pub const START_LENGTH: usize = 4;
    pub const BASE_MOVE_INTERVAL: f32 = 0.12; // seconds per grid step
    pub const DIRECTION_BUFFER_CAPACITY: usize = 3;
    pub const SPEED_BOOST_DURATION: f32 = 5.0;
    /// Move interval shrink per speed-boost level while boosted
    pub const SPEED_BOOST_PER_LEVEL: f32 = 0.15;

    /// Invulnerability granted when a shield breaks
    pub const SHIELD_BREAK_INVULNERABILITY: f32 = 1.5;

    /// Abilities
    pub const PHASE_DURATION: f32 = 1.0;
    pub const PHASE_COOLDOWN: f32 = 8.0;
    pub const EMP_COOLDOWN: f32 = 12.0;
    pub const EMP_RADIUS: f32 = 10.0;
    pub const EMP_STUN: f32 = 2.0;
    pub const COMPRESS_COOLDOWN: f32 = 15.0;
    pub const COMPRESS_MIN_LENGTH: usize = 3;
    pub const COMPRESS_DAMAGE_PER_SEGMENT: f32 = 6.0;

    /// Enemies (speeds in cells/second)
    pub const ENEMY_BASE_SPEED: f32 = 3.0;
    pub const SLOW_MULTIPLIER: f32 = 0.5;
    pub const ENEMY_CONTACT_RADIUS: f32 = 0.7;
    pub const TAIL_CONTACT_RADIUS: f32 = 0.6;
    pub const TAIL_BOSS_DAMAGE: f32 = 40.0;
    pub const TAIL_HIT_COOLDOWN: f32 = 0.5;
    pub const DAMAGE_FLASH: f32 = 0.1;

    /// Projectiles (velocities in cells/frame)
    pub const PROJECTILE_HIT_BOX: f32 = 0.6;
    pub const HOSTILE_HIT_BOX: f32 = 0.5;
    pub const BOUNDS_MARGIN: f32 = 4.0;
    pub const HOMING_BLEND: f32 = 0.1;
    pub const GRAVITY: f32 = 0.02;
    pub const SHOCKWAVE_BAND: f32 = 1.0;
    pub const LIGHTNING_LIFETIME: f32 = 0.25;

    /// Loot
    pub const XP_MAGNET_RADIUS: f32 = 3.0;
    pub const MAGNET_EFFECT_RADIUS: f32 = 14.0;
    pub const MAGNET_DURATION: f32 = 8.0;
    pub const LOOT_CHASE_MULTIPLIER: f32 = 1.5;
    pub const LOOT_SNAP_DISTANCE: f32 = 0.5;
    pub const XP_BASE_THRESHOLD: u32 = 10;

    /// Damage pipeline
    pub const CHAIN_RANGE_SQ: f32 = 36.0;
    pub const ECHO_BURST_RADIUS: f32 = 6.0;
    pub const ECHO_BURST_RATIO: f32 = 0.5;
    pub const NEURAL_MAGNET_RADIUS: f32 = 4.0;

    /// Terminals
    pub const TERMINAL_SIGNAL_MIN_PROGRESS: f32 = 0.15; // fraction of total time
    pub const TERMINAL_SIGNAL_GAP: f32 = 1.5;
    pub const TERMINAL_PAYOUT_ORBS: u32 = 12;
    pub const TERMINAL_PAYOUT_VALUE: u32 = 5;
    pub const TERMINAL_REMOVE_DELAY: f32 = 0.75;

    /// Camera
    pub const MIN_ZOOM: f32 = 0.2;
    pub const MAX_ZOOM: f32 = 4.0;
    pub const CAMERA_TRANSITION: f32 = 0.6;
    pub const CAMERA_FOLLOW_RATE: f32 = 6.0;
    pub const SIDE_SCROLL_LEAD: f32 = 4.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// World-space position of a grid cell
#[inline]
pub fn cell_to_world(cell: IVec2) -> Vec2 {
    cell.as_vec2()
}

/// Grid cell containing a world-space position
#[inline]
pub fn world_to_cell(pos: Vec2) -> IVec2 {
    pos.round().as_ivec2()
}

/// Exponential smoothing factor for a rate and timestep (frame-rate independent)
#[inline]
pub fn smoothing(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}
