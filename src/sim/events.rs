//! Outbound signals from the simulation
//!
//! Sound tags are drained by the audio collaborator each frame; gameplay
//! events feed floating text, link visuals and run-flow UI. Neither queue is
//! ever read back by the simulation.

use glam::Vec2;

use super::state::{EnemyKind, FailureReason};

/// Short audio cue tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundTag {
    Hit,
    Shoot,
    ShieldHit,
    GameOver,
    PowerUp,
    Emp,
    EnemyDestroyed,
    BossDefeated,
    BossPhase,
    Compress,
    Phase,
    Reflect,
    Pickup,
    TerminalComplete,
    TerminalLost,
    Burst,
}

impl SoundTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundTag::Hit => "hit",
            SoundTag::Shoot => "shoot",
            SoundTag::ShieldHit => "shield-hit",
            SoundTag::GameOver => "game-over",
            SoundTag::PowerUp => "power-up",
            SoundTag::Emp => "emp",
            SoundTag::EnemyDestroyed => "enemy-destroyed",
            SoundTag::BossDefeated => "boss-defeated",
            SoundTag::BossPhase => "boss-phase",
            SoundTag::Compress => "compress",
            SoundTag::Phase => "phase",
            SoundTag::Reflect => "reflect",
            SoundTag::Pickup => "pickup",
            SoundTag::TerminalComplete => "terminal-complete",
            SoundTag::TerminalLost => "terminal-lost",
            SoundTag::Burst => "burst",
        }
    }
}

/// Gameplay feedback events
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Floating damage number
    DamageNumber { pos: Vec2, amount: f32, crit: bool },
    /// Chain lightning jumped between two points
    ChainLink { from: Vec2, to: Vec2 },
    EnemyKilled { kind: EnemyKind, pos: Vec2 },
    BossDefeated { pos: Vec2 },
    BossPhaseChanged { phase: u8 },
    /// Echo cache released its stored charge
    EchoBurst { pos: Vec2, damage: f32 },
    ShieldBroken,
    Reflected { pos: Vec2 },
    LevelUp { level: u32 },
    TerminalCompleted { id: u32 },
    TerminalDisconnected { id: u32 },
    GameOver { reason: FailureReason },
}
