//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only (owned by the world state)
//! - Stable iteration order (collection order, removal deferred to cleanup)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod camera;
pub mod collision;
pub mod damage;
pub mod events;
pub mod hud;
pub mod movement;
pub mod projectiles;
pub mod state;
pub mod stats;
pub mod tick;
pub mod weapons;

pub use boss::{BossAi, BossPhase};
pub use camera::{CameraBehavior, CameraController, CameraIntent, CameraMode, CameraTransform};
pub use collision::{StepResult, resolve_step};
pub use damage::{apply_damage, damage_enemy};
pub use events::{GameEvent, SoundTag};
pub use hud::{HudView, ThreatLabel};
pub use state::{
    DeferredAction, Direction, Enemy, EnemyKind, FailureReason, GamePhase, LootKind, Owner,
    Projectile, RunToken, WorldState,
};
pub use stats::{CharacterProfile, Stats, Upgrade, WeaponKind};
pub use tick::{TickInput, tick};
pub use weapons::{Ability, Arsenal};
