//! Read-only HUD projection
//!
//! Recomputed from the world state each frame. Presentation layers only read
//! it; nothing here writes back.

use super::movement::progress;
use super::state::{GamePhase, WorldState};
use super::stats::WeaponKind;
use crate::consts::*;

/// Living enemies at which the label escalates
const SWARMING_AT: usize = 12;
const OVERRUN_AT: usize = 30;

/// Coarse danger level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatLabel {
    Calm,
    Swarming,
    Overrun,
    Boss,
}

impl ThreatLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatLabel::Calm => "calm",
            ThreatLabel::Swarming => "swarming",
            ThreatLabel::Overrun => "overrun",
            ThreatLabel::Boss => "boss",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    pub level: u32,
    /// 1.0 = just fired, 0.0 = ready
    pub cooldown: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossBar {
    pub health_ratio: f32,
    pub phase: u8,
}

/// Normalized snapshot for HUD layouts
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub score: u64,
    pub level: u32,
    pub xp_fraction: f32,
    pub stage: u32,
    pub kills: u32,
    pub length: usize,
    pub shield: u32,
    pub invulnerable: bool,
    pub threat: ThreatLabel,
    pub weapons: Vec<WeaponSlot>,
    /// Remaining fraction of each ability cooldown (0 = ready)
    pub phase_cooldown: f32,
    pub emp_cooldown: f32,
    pub compress_cooldown: f32,
    pub pending_upgrades: u32,
    /// Step animation fraction
    pub step_progress: f32,
    pub boss: Option<BossBar>,
    pub paused: bool,
    pub game_over: bool,
}

fn fraction(remaining: f32, total: f32) -> f32 {
    if total <= 0.0 {
        0.0
    } else {
        (remaining / total).clamp(0.0, 1.0)
    }
}

impl HudView {
    pub fn from_state(state: &WorldState) -> Self {
        let living = state.enemies.iter().filter(|e| e.alive()).count();
        let boss = state.boss().map(|b| BossBar {
            health_ratio: b.health_ratio(),
            phase: match &b.ai {
                super::state::EnemyAi::Boss(ai) => ai.phase.number(),
                super::state::EnemyAi::Chase => 1,
            },
        });
        let threat = if boss.is_some() {
            ThreatLabel::Boss
        } else if living >= OVERRUN_AT {
            ThreatLabel::Overrun
        } else if living >= SWARMING_AT {
            ThreatLabel::Swarming
        } else {
            ThreatLabel::Calm
        };

        let weapons = state
            .stats
            .owned_weapons()
            .map(|(kind, w)| WeaponSlot {
                kind,
                level: w.level,
                cooldown: state.arsenal.cooldown_fraction(&state.stats, kind),
            })
            .collect();

        Self {
            score: state.score,
            level: state.level,
            xp_fraction: fraction(state.xp as f32, state.xp_threshold as f32),
            stage: state.stage,
            kills: state.kills,
            length: state.player.len(),
            shield: state.effects.shield,
            invulnerable: state.effects.is_invulnerable(),
            threat,
            weapons,
            phase_cooldown: fraction(state.cooldowns.phase, PHASE_COOLDOWN),
            emp_cooldown: fraction(state.cooldowns.emp, EMP_COOLDOWN),
            compress_cooldown: fraction(state.cooldowns.compress, COMPRESS_COOLDOWN),
            pending_upgrades: state.pending_upgrades,
            step_progress: progress(state),
            boss,
            paused: state.phase == GamePhase::Paused,
            game_over: state.phase == GamePhase::GameOver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::EnemyKind;
    use crate::sim::stats::CharacterProfile;
    use glam::Vec2;

    fn world() -> WorldState {
        WorldState::new(4, Settings::default(), CharacterProfile::default())
    }

    #[test]
    fn test_fresh_run_projection() {
        let state = world();
        let hud = HudView::from_state(&state);
        assert_eq!(hud.score, 0);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.threat, ThreatLabel::Calm);
        assert_eq!(hud.length, START_LENGTH);
        assert_eq!(hud.weapons.len(), 1);
        assert_eq!(hud.weapons[0].kind, WeaponKind::Cannon);
        assert!(hud.boss.is_none());
        assert!(!hud.game_over);
    }

    #[test]
    fn test_threat_escalates() {
        let mut state = world();
        for i in 0..SWARMING_AT {
            state.spawn_enemy(EnemyKind::Drone, Vec2::new(i as f32, 1.0));
        }
        assert_eq!(HudView::from_state(&state).threat, ThreatLabel::Swarming);
        for i in 0..OVERRUN_AT {
            state.spawn_enemy(EnemyKind::Drone, Vec2::new(i as f32, 2.0));
        }
        assert_eq!(HudView::from_state(&state).threat, ThreatLabel::Overrun);
        state.spawn_boss(Vec2::new(5.0, 5.0));
        let hud = HudView::from_state(&state);
        assert_eq!(hud.threat, ThreatLabel::Boss);
        assert_eq!(hud.boss.map(|b| b.phase), Some(1));
    }

    #[test]
    fn test_ability_cooldown_fractions() {
        let mut state = world();
        state.cooldowns.emp = EMP_COOLDOWN / 2.0;
        let hud = HudView::from_state(&state);
        assert!((hud.emp_cooldown - 0.5).abs() < 1e-6);
        assert_eq!(hud.phase_cooldown, 0.0);
    }

    #[test]
    fn test_xp_fraction() {
        let mut state = world();
        state.gain_xp(XP_BASE_THRESHOLD / 2);
        let hud = HudView::from_state(&state);
        assert!((hud.xp_fraction - 0.5).abs() < 1e-6);
    }
}
