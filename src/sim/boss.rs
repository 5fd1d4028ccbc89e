//! Boss behaviour
//!
//! Three phases keyed by health ratio:
//! - Kite (>= 60%): hold range from the head, strafe, fire narrow bursts
//! - Orbit (30-60%): circle the arena center, summon drones, radial bursts
//! - Frenzy (< 30%): idle -> charge -> dash loop with a dual spiral barrage
//!
//! Phases only move forward. Entering a phase resets its summon budget.

use glam::Vec2;
use rand::Rng;

use super::events::{GameEvent, SoundTag};
use super::state::{EnemyAi, EnemyKind, Owner, Projectile, WorldState};
use crate::{polar_to_cartesian, world_to_cell};

const SPEED: f32 = 4.0;
const KITE_DISTANCE: f32 = 8.0;
const KITE_SLACK: f32 = 1.0;
const STRAFE_FREQ: f32 = 0.8;
const STRAFE_WEIGHT: f32 = 0.6;
const BURST_INTERVAL: f32 = 2.0;
const BURST_SPREAD: f32 = 0.12;
const ORBIT_RADIUS: f32 = 5.0;
const ORBIT_SPEED: f32 = 0.6;
const SUMMON_INTERVAL: f32 = 5.0;
const SUMMON_CAP: u32 = 4;
const RADIAL_INTERVAL: f32 = 3.0;
const RADIAL_COUNT: u32 = 12;
const IDLE_TIME: (f32, f32) = (1.0, 1.6);
const JITTER: f32 = 3.0;
const CHARGE_TIME: f32 = 0.8;
const DASH_SPEED: f32 = 18.0;
const DASH_MAX_TIME: f32 = 1.0;
const TRAIL_INTERVAL: f32 = 0.06;
const TRAIL_LIFETIME: f32 = 2.5;
const SPIRAL_INTERVAL: f32 = 0.12;
const SPIRAL_STEP: f32 = 0.35;
const BULLET_SPEED: f32 = 0.25;
const BULLET_DAMAGE: f32 = 10.0;
const BULLET_LIFETIME: f32 = 4.0;

/// Health-keyed boss phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum BossPhase {
    #[default]
    Kite,
    Orbit,
    Frenzy,
}

impl BossPhase {
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio >= 0.6 {
            BossPhase::Kite
        } else if ratio >= 0.3 {
            BossPhase::Orbit
        } else {
            BossPhase::Frenzy
        }
    }

    /// 1-based phase number for display
    pub fn number(&self) -> u8 {
        match self {
            BossPhase::Kite => 1,
            BossPhase::Orbit => 2,
            BossPhase::Frenzy => 3,
        }
    }
}

/// Frenzy sub-states
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrenzyState {
    Idle { timer: f32 },
    /// Telegraph before a dash
    Charge { timer: f32 },
    Dash { timer: f32, dir: Vec2 },
}

impl Default for FrenzyState {
    fn default() -> Self {
        FrenzyState::Idle { timer: IDLE_TIME.0 }
    }
}

/// Boss-only AI record
#[derive(Debug, Clone)]
pub struct BossAi {
    pub phase: BossPhase,
    pub burst_timer: f32,
    pub strafe_clock: f32,
    pub orbit_angle: f32,
    pub summon_timer: f32,
    /// Summons this phase
    pub summon_count: u32,
    pub radial_timer: f32,
    pub frenzy: FrenzyState,
    pub spiral_angle: f32,
    pub spiral_timer: f32,
    pub trail_timer: f32,
    /// Player position locked in when the charge ends
    pub last_seen: Vec2,
}

impl Default for BossAi {
    fn default() -> Self {
        Self {
            phase: BossPhase::Kite,
            burst_timer: BURST_INTERVAL,
            strafe_clock: 0.0,
            orbit_angle: 0.0,
            summon_timer: SUMMON_INTERVAL,
            summon_count: 0,
            radial_timer: RADIAL_INTERVAL,
            frenzy: FrenzyState::default(),
            spiral_angle: 0.0,
            spiral_timer: SPIRAL_INTERVAL,
            trail_timer: 0.0,
            last_seen: Vec2::ZERO,
        }
    }
}

impl BossAi {
    fn enter(&mut self, phase: BossPhase) {
        self.phase = phase;
        self.summon_count = 0;
        self.summon_timer = SUMMON_INTERVAL;
        self.radial_timer = RADIAL_INTERVAL;
        self.burst_timer = BURST_INTERVAL;
        self.frenzy = FrenzyState::default();
        self.spiral_timer = SPIRAL_INTERVAL;
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self.frenzy, FrenzyState::Dash { .. })
    }
}

/// What one boss update wants spawned
#[derive(Default)]
struct BossOutput {
    /// (position, velocity, lifetime)
    bullets: Vec<(Vec2, Vec2, f32)>,
    summons: Vec<Vec2>,
    phase_changed: Option<BossPhase>,
}

impl BossOutput {
    fn bullet(&mut self, pos: Vec2, angle: f32) {
        self.bullets
            .push((pos, polar_to_cartesian(BULLET_SPEED, angle), BULLET_LIFETIME));
    }
}

/// Advance the boss at `idx` by one tick
pub fn update_boss(state: &mut WorldState, idx: usize, dt: f32) {
    let target = state.player.head_pos();
    let center = state.arena_center();
    let max = (state.arena - 2).as_vec2();
    let walls = &state.walls;
    let arena = state.arena;
    let rng = &mut state.rng;
    let Some(enemy) = state.enemies.get_mut(idx) else {
        return;
    };
    if !enemy.alive() {
        return;
    }
    let ratio = enemy.health_ratio();
    let stunned = enemy.stun > 0.0;
    let EnemyAi::Boss(ai) = &mut enemy.ai else {
        return;
    };

    let mut out = BossOutput::default();

    let wanted = BossPhase::from_ratio(ratio);
    if wanted > ai.phase {
        ai.enter(wanted);
        out.phase_changed = Some(wanted);
    }

    let mut pos = enemy.pos;
    if !stunned {
        match ai.phase {
            BossPhase::Kite => {
                let to_player = target - pos;
                let dist = to_player.length();
                let dir = to_player.normalize_or_zero();
                let mut steer = Vec2::ZERO;
                if dist < KITE_DISTANCE - KITE_SLACK {
                    steer -= dir;
                } else if dist > KITE_DISTANCE + KITE_SLACK {
                    steer += dir;
                }
                ai.strafe_clock += dt;
                steer += dir.perp() * (ai.strafe_clock * STRAFE_FREQ).sin() * STRAFE_WEIGHT;
                pos += steer * SPEED * dt;

                ai.burst_timer -= dt;
                if ai.burst_timer <= 0.0 {
                    ai.burst_timer = BURST_INTERVAL;
                    let aim = to_player.y.atan2(to_player.x);
                    for i in -1..=1 {
                        out.bullet(pos, aim + i as f32 * BURST_SPREAD);
                    }
                }
            }

            BossPhase::Orbit => {
                ai.orbit_angle = crate::normalize_angle(ai.orbit_angle + ORBIT_SPEED * dt);
                let slot = center + polar_to_cartesian(ORBIT_RADIUS, ai.orbit_angle);
                let to_slot = slot - pos;
                let step = SPEED * 1.2 * dt;
                if to_slot.length() <= step {
                    pos = slot;
                } else {
                    pos += to_slot.normalize_or_zero() * step;
                }

                ai.summon_timer -= dt;
                if ai.summon_timer <= 0.0 {
                    ai.summon_timer = SUMMON_INTERVAL;
                    if ai.summon_count < SUMMON_CAP {
                        ai.summon_count += 1;
                        let angle = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
                        out.summons.push(pos + polar_to_cartesian(1.5, angle));
                    }
                }

                ai.radial_timer -= dt;
                if ai.radial_timer <= 0.0 {
                    ai.radial_timer = RADIAL_INTERVAL;
                    for i in 0..RADIAL_COUNT {
                        let angle = i as f32 * std::f32::consts::TAU / RADIAL_COUNT as f32;
                        out.bullet(pos, angle);
                    }
                }
            }

            BossPhase::Frenzy => {
                ai.frenzy = match ai.frenzy {
                    FrenzyState::Idle { timer } => {
                        let jitter =
                            Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
                        pos += jitter * JITTER * dt;
                        let timer = timer - dt;
                        if timer <= 0.0 {
                            FrenzyState::Charge { timer: CHARGE_TIME }
                        } else {
                            FrenzyState::Idle { timer }
                        }
                    }
                    FrenzyState::Charge { timer } => {
                        ai.last_seen = target;
                        let timer = timer - dt;
                        if timer <= 0.0 {
                            let dir = (ai.last_seen - pos).normalize_or(Vec2::X);
                            ai.trail_timer = 0.0;
                            FrenzyState::Dash { timer: DASH_MAX_TIME, dir }
                        } else {
                            FrenzyState::Charge { timer }
                        }
                    }
                    FrenzyState::Dash { timer, dir } => {
                        let next = pos + dir * DASH_SPEED * dt;
                        let probe = world_to_cell(next + dir);
                        let near_wall = walls.contains(&probe)
                            || probe.x < 1
                            || probe.y < 1
                            || probe.x > arena.x - 2
                            || probe.y > arena.y - 2;
                        let idle = FrenzyState::Idle {
                            timer: rng.random_range(IDLE_TIME.0..IDLE_TIME.1),
                        };
                        if near_wall {
                            idle
                        } else {
                            pos = next;
                            ai.trail_timer -= dt;
                            if ai.trail_timer <= 0.0 {
                                ai.trail_timer = TRAIL_INTERVAL;
                                out.bullets.push((pos, Vec2::ZERO, TRAIL_LIFETIME));
                            }
                            let timer = timer - dt;
                            if timer <= 0.0 || pos.distance(ai.last_seen) < 0.5 {
                                idle
                            } else {
                                FrenzyState::Dash { timer, dir }
                            }
                        }
                    }
                };

                if !ai.is_dashing() {
                    ai.spiral_timer -= dt;
                    if ai.spiral_timer <= 0.0 {
                        ai.spiral_timer = SPIRAL_INTERVAL;
                        ai.spiral_angle = crate::normalize_angle(ai.spiral_angle + SPIRAL_STEP);
                        out.bullet(pos, ai.spiral_angle);
                        out.bullet(pos, -ai.spiral_angle);
                    }
                }
            }
        }
    }

    enemy.pos = pos.clamp(Vec2::ONE, max);

    for (pos, vel, lifetime) in out.bullets {
        state.spawn_projectile(Projectile::new(0, pos, vel, BULLET_DAMAGE, Owner::Enemy, lifetime));
    }
    for pos in out.summons {
        state.spawn_enemy(EnemyKind::Drone, pos);
    }
    if let Some(phase) = out.phase_changed {
        log::info!("Boss entered phase {}", phase.number());
        state.emit_sound(SoundTag::BossPhase);
        state.emit(GameEvent::BossPhaseChanged { phase: phase.number() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::damage::apply_damage;
    use crate::sim::stats::CharacterProfile;

    fn world_with_boss() -> (WorldState, usize) {
        let mut state = WorldState::new(3, Settings::default(), CharacterProfile::default());
        let center = state.arena_center();
        state.spawn_boss(center + Vec2::new(6.0, 0.0));
        (state, 0)
    }

    fn ai(state: &WorldState, idx: usize) -> &BossAi {
        match &state.enemies[idx].ai {
            EnemyAi::Boss(ai) => ai,
            EnemyAi::Chase => panic!("not a boss"),
        }
    }

    #[test]
    fn test_phase_from_ratio() {
        assert_eq!(BossPhase::from_ratio(1.0), BossPhase::Kite);
        assert_eq!(BossPhase::from_ratio(0.6), BossPhase::Kite);
        assert_eq!(BossPhase::from_ratio(0.59), BossPhase::Orbit);
        assert_eq!(BossPhase::from_ratio(0.3), BossPhase::Orbit);
        assert_eq!(BossPhase::from_ratio(0.29), BossPhase::Frenzy);
    }

    #[test]
    fn test_damage_crossing_threshold_enters_orbit() {
        let (mut state, idx) = world_with_boss();
        let max = state.enemies[idx].max_health;
        state.enemies[idx].health = max * 0.65;
        update_boss(&mut state, idx, 1.0 / 60.0);
        assert_eq!(ai(&state, idx).phase, BossPhase::Kite);

        apply_damage(&mut state.enemies[idx], max * 0.10);
        update_boss(&mut state, idx, 1.0 / 60.0);
        assert_eq!(ai(&state, idx).phase, BossPhase::Orbit);
        assert_eq!(ai(&state, idx).summon_count, 0);
        assert!(state.sounds().contains(&SoundTag::BossPhase));
    }

    #[test]
    fn test_summon_cap_resets_on_phase_entry() {
        let (mut state, idx) = world_with_boss();
        let max = state.enemies[idx].max_health;
        state.enemies[idx].health = max * 0.5;
        // Long enough for many summon intervals
        for _ in 0..(SUMMON_INTERVAL as usize * 60 * 6) {
            update_boss(&mut state, idx, 1.0 / 60.0);
        }
        assert_eq!(ai(&state, idx).summon_count, SUMMON_CAP);
        let summoned = state
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Drone)
            .count();
        assert_eq!(summoned as u32, SUMMON_CAP);

        state.enemies[idx].health = max * 0.2;
        update_boss(&mut state, idx, 1.0 / 60.0);
        assert_eq!(ai(&state, idx).phase, BossPhase::Frenzy);
        assert_eq!(ai(&state, idx).summon_count, 0);
    }

    #[test]
    fn test_phases_never_regress() {
        let (mut state, idx) = world_with_boss();
        let max = state.enemies[idx].max_health;
        state.enemies[idx].health = max * 0.2;
        update_boss(&mut state, idx, 1.0 / 60.0);
        state.enemies[idx].health = max;
        update_boss(&mut state, idx, 1.0 / 60.0);
        assert_eq!(ai(&state, idx).phase, BossPhase::Frenzy);
    }

    #[test]
    fn test_boss_stays_inside_margin() {
        let (mut state, idx) = world_with_boss();
        state.enemies[idx].pos = Vec2::new(-5.0, 100.0);
        update_boss(&mut state, idx, 1.0 / 60.0);
        let pos = state.enemies[idx].pos;
        assert!(pos.x >= 1.0 && pos.y >= 1.0);
        assert!(pos.x <= (state.arena.x - 2) as f32 && pos.y <= (state.arena.y - 2) as f32);
    }

    #[test]
    fn test_frenzy_dash_drops_trail_and_no_spiral() {
        let (mut state, idx) = world_with_boss();
        let max = state.enemies[idx].max_health;
        state.enemies[idx].health = max * 0.1;
        state.player.body.clear();
        state.player.body.push_back(glam::IVec2::new(4, 16));
        state.enemies[idx].pos = Vec2::new(30.0, 16.0);
        update_boss(&mut state, idx, 1.0 / 60.0);
        if let EnemyAi::Boss(ai) = &mut state.enemies[idx].ai {
            ai.frenzy = FrenzyState::Dash { timer: DASH_MAX_TIME, dir: Vec2::NEG_X };
            ai.last_seen = Vec2::new(4.0, 16.0);
        }
        state.projectiles.clear();
        for _ in 0..10 {
            update_boss(&mut state, idx, 1.0 / 60.0);
        }
        assert!(ai(&state, idx).is_dashing());
        // Every projectile spawned while dashing is a stationary hazard
        assert!(!state.projectiles.is_empty());
        assert!(state.projectiles.iter().all(|p| p.vel == Vec2::ZERO));
    }
}
