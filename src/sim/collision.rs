//! Collision detection and response
//!
//! The candidate head is checked inside the movement step via
//! [`resolve_step`]. Everything dynamic (enemy contact, tail defense, hostile
//! fire, pickups and terminals) runs once per tick in
//! [`update_collisions`], after weapons and projectiles have moved.

use glam::{IVec2, Vec2};
use rand::Rng;

use super::damage::damage_enemy;
use super::events::{GameEvent, SoundTag};
use super::state::{
    DeferredAction, EnemyKind, FailureReason, GamePhase, HitTag, LootKind, Owner, WorldState,
};
use super::weapons::activate_phase;
use crate::consts::*;
use crate::{cell_to_world, polar_to_cartesian, world_to_cell};

/// Extra contact reach for the boss hull
const BOSS_REACH: f32 = 0.9;

/// Result of checking a candidate head cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Nothing in the way
    Clear,
    /// Blocked but survived; the head goes to this cell instead
    Held(IVec2),
    /// Blocked but survived with nowhere legal to go; the head stays put
    Blocked,
    /// The run ended
    Fatal,
}

fn reach(kind: EnemyKind) -> f32 {
    if kind == EnemyKind::Boss { BOSS_REACH } else { 0.0 }
}

/// Consume a shield charge. The invulnerability window is granted in the
/// same call so there is no shieldless, unprotected gap.
fn break_shield(state: &mut WorldState) -> bool {
    if state.effects.shield == 0 {
        return false;
    }
    state.effects.shield -= 1;
    state.effects.invulnerable = state.effects.invulnerable.max(SHIELD_BREAK_INVULNERABILITY);
    state.emit_sound(SoundTag::ShieldHit);
    state.emit(GameEvent::ShieldBroken);
    log::debug!("Shield broken, {} left", state.effects.shield);
    true
}

/// Check the next head cell against bounds, walls and the body
///
/// Resolution order: invulnerable survives, then a shield is spent, then the
/// run ends. A survived wall hit holds the head at the nearest legal cell, or
/// [`StepResult::Blocked`] when that is the current head; a survived
/// self-overlap passes through.
pub fn resolve_step(state: &mut WorldState, candidate: IVec2) -> StepResult {
    let wall = state.blocked(candidate);
    // The tail cell is vacated this step unless the body is growing
    let len = state.player.len();
    let checked = if state.player.pending_growth == 0 {
        len.saturating_sub(1)
    } else {
        len
    };
    let self_hit = !wall
        && state
            .player
            .body
            .iter()
            .take(checked)
            .any(|&c| c == candidate);
    if !wall && !self_hit {
        return StepResult::Clear;
    }

    if state.effects.is_invulnerable() || break_shield(state) {
        if self_hit {
            return StepResult::Clear;
        }
        let clamped = candidate.clamp(IVec2::ZERO, state.arena - IVec2::ONE);
        if clamped == state.player.head() || state.walls.contains(&clamped) {
            return StepResult::Blocked;
        }
        return StepResult::Held(clamped);
    }

    let reason = if wall {
        FailureReason::Wall
    } else {
        FailureReason::SelfCollision
    };
    state.game_over(reason);
    StepResult::Fatal
}

/// All per-tick dynamic collision passes
pub fn update_collisions(state: &mut WorldState, dt: f32) {
    if state.phase != GamePhase::GameOver {
        enemy_contact(state);
    }
    if state.phase != GamePhase::GameOver {
        tail_defense(state);
    }
    if state.phase != GamePhase::GameOver {
        hostile_fire(state);
    }
    if state.phase != GamePhase::GameOver {
        collect_loot(state);
        update_terminals(state, dt);
    }
}

/// Enemy touching the head
fn enemy_contact(state: &mut WorldState) {
    if state.effects.is_invulnerable() {
        return;
    }
    let head = state.player.head_pos();
    let touching = state.enemies.iter().any(|e| {
        let r = ENEMY_CONTACT_RADIUS + reach(e.kind);
        e.alive() && e.pos.distance_squared(head) <= r * r
    });
    if !touching {
        return;
    }
    // Phase saves before the shield is touched
    if state.stats.phase_level > 0 && state.cooldowns.phase <= 0.0 {
        activate_phase(state);
        return;
    }
    if break_shield(state) {
        return;
    }
    state.game_over(FailureReason::Enemy);
}

/// Enemies touching any non-head segment
fn tail_defense(state: &mut WorldState) {
    if state.effects.is_invulnerable() || state.player.len() < 2 {
        return;
    }
    let segments: Vec<Vec2> = state
        .player
        .body
        .iter()
        .skip(1)
        .map(|&c| cell_to_world(c))
        .collect();

    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if !enemy.alive() {
            continue;
        }
        let r = TAIL_CONTACT_RADIUS + reach(enemy.kind);
        let pos = enemy.pos;
        if !segments.iter().any(|s| s.distance_squared(pos) <= r * r) {
            continue;
        }
        if enemy.kind == EnemyKind::Boss {
            if enemy.is_cooling(HitTag::Tail) {
                continue;
            }
            state.enemies[i].set_cooldown(HitTag::Tail, TAIL_HIT_COOLDOWN);
            damage_enemy(state, i, TAIL_BOSS_DAMAGE, false, false);
        } else {
            let health = enemy.health;
            damage_enemy(state, i, health, false, false);
        }
    }
}

/// Enemy projectiles against the head
fn hostile_fire(state: &mut WorldState) {
    let head = state.player.head_pos();
    for pi in 0..state.projectiles.len() {
        if state.effects.is_invulnerable() {
            return;
        }
        let p = &state.projectiles[pi];
        if p.dead || p.owner != Owner::Enemy {
            continue;
        }
        let d = (p.pos - head).abs();
        if d.x > HOSTILE_HIT_BOX || d.y > HOSTILE_HIT_BOX {
            continue;
        }

        let reflect_chance = state.stats.reflect_chance();
        if reflect_chance > 0.0 && state.rng.random::<f32>() < reflect_chance {
            let p = &mut state.projectiles[pi];
            p.owner = Owner::Player;
            p.vel = -p.vel;
            p.hit_ids.clear();
            let pos = p.pos;
            state.emit_sound(SoundTag::Reflect);
            state.emit(GameEvent::Reflected { pos });
            continue;
        }

        state.projectiles[pi].dead = true;
        if break_shield(state) {
            continue;
        }
        state.game_over(FailureReason::Projectile);
        return;
    }
}

/// Consume pickups on the head cell or snapped onto it
fn collect_loot(state: &mut WorldState) {
    let head_cell = state.player.head();
    let head = cell_to_world(head_cell);
    let mut taken = Vec::new();
    state.loot.retain(|l| {
        let hit = world_to_cell(l.pos) == head_cell || l.pos.distance(head) <= LOOT_SNAP_DISTANCE;
        if hit {
            taken.push(l.kind);
        }
        !hit
    });
    for kind in taken {
        apply_pickup(state, kind);
    }
}

fn apply_pickup(state: &mut WorldState, kind: LootKind) {
    match kind {
        LootKind::Xp(value) => state.gain_xp(value),
        LootKind::Food => state.player.pending_growth += 1,
        LootKind::Magnet => state.effects.magnet = MAGNET_DURATION,
        LootKind::Shield => state.effects.shield += 1,
        LootKind::SpeedBoost => state.effects.speed_boost = SPEED_BOOST_DURATION,
    }
    state.emit_sound(SoundTag::Pickup);
}

/// Reset the one-tick terminal signals
pub fn clear_terminal_signals(state: &mut WorldState) {
    for t in &mut state.terminals {
        t.just_completed = false;
        t.just_disconnected = false;
    }
}

/// Hack progress, decay, disconnect signal and completion payout
pub fn update_terminals(state: &mut WorldState, dt: f32) {
    clear_terminal_signals(state);

    let head = state.player.head_pos();
    let rate = state.stats.hack_speed;
    let mut lost = Vec::new();
    let mut completed = Vec::new();

    for t in state.terminals.iter_mut().filter(|t| !t.completed) {
        t.since_signal += dt;
        let inside = t.pos.distance_squared(head) <= t.radius * t.radius;
        if inside {
            t.progress += dt * rate;
        } else {
            if t.player_inside
                && t.fraction() >= TERMINAL_SIGNAL_MIN_PROGRESS
                && t.since_signal >= TERMINAL_SIGNAL_GAP
            {
                t.just_disconnected = true;
                t.since_signal = 0.0;
                lost.push(t.id);
            }
            t.progress = (t.progress - t.decay_rate * dt).max(0.0);
        }
        t.player_inside = inside;

        if t.progress >= t.total_time {
            t.progress = t.total_time;
            t.completed = true;
            t.just_completed = true;
            completed.push((t.id, t.pos));
        }
    }

    for id in lost {
        log::debug!("Terminal {} disconnected", id);
        state.emit_sound(SoundTag::TerminalLost);
        state.emit(GameEvent::TerminalDisconnected { id });
    }

    for (id, pos) in completed {
        log::debug!("Terminal {} completed", id);
        state.emit_sound(SoundTag::TerminalComplete);
        state.emit(GameEvent::TerminalCompleted { id });
        let max = (state.arena - IVec2::ONE).as_vec2();
        for i in 0..TERMINAL_PAYOUT_ORBS {
            let angle = i as f32 / TERMINAL_PAYOUT_ORBS as f32 * std::f32::consts::TAU;
            let r = 1.0 + state.rng.random::<f32>() * 1.5;
            let drop = (pos + polar_to_cartesian(r, angle)).clamp(Vec2::ZERO, max);
            state.spawn_loot(LootKind::Xp(TERMINAL_PAYOUT_VALUE), drop);
        }
        state.schedule(TERMINAL_REMOVE_DELAY, DeferredAction::RemoveTerminal(id));
    }
}
