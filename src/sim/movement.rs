//! Entity movement
//!
//! The player advances one grid cell whenever its accumulator passes the move
//! interval. Enemies move continuously toward the head; the boss runs its own
//! state machine. Loot drifts toward the head when magnetised.

use glam::Vec2;

use super::boss::update_boss;
use super::collision::{StepResult, resolve_step};
use super::state::{EnemyAi, GamePhase, LootKind, WorldState};
use crate::consts::*;
use crate::world_to_cell;

/// Advance the player by as many grid steps as the accumulator allows
pub fn update_player(state: &mut WorldState, dt: f32) {
    if state.player.is_empty() {
        return;
    }
    state.player.move_accumulator += dt;
    loop {
        let interval = state.move_interval();
        if state.phase != GamePhase::Playing || state.player.move_accumulator < interval {
            break;
        }
        state.player.move_accumulator -= interval;
        step_player(state);
    }
}

/// Progress toward the next step: 0 just arrived, approaching 1 about to move.
/// Only meant for animation.
pub fn progress(state: &WorldState) -> f32 {
    let interval = state.move_interval();
    if interval <= 0.0 {
        return 0.0;
    }
    (state.player.move_accumulator / interval).clamp(0.0, 1.0)
}

fn step_player(state: &mut WorldState) {
    let current = state.player.head();
    let dir = state.player.take_direction();
    let candidate = current + dir.delta();

    let next = match resolve_step(state, candidate) {
        StepResult::Clear => candidate,
        StepResult::Held(cell) => cell,
        StepResult::Blocked | StepResult::Fatal => return,
    };
    if next == current {
        log::warn!(
            "Skipped zero-distance step at ({}, {}) heading {:?}",
            current.x,
            current.y,
            dir
        );
        return;
    }

    let player = &mut state.player;
    player.body.push_front(next);
    if player.pending_growth > 0 {
        player.pending_growth -= 1;
    } else {
        player.body.pop_back();
    }
}

/// Move every living enemy for one tick
pub fn update_enemies(state: &mut WorldState, dt: f32) {
    let target = state.player.head_pos();
    // Summons spawned mid-loop start moving next tick
    let count = state.enemies.len();
    for i in 0..count {
        if !state.enemies[i].alive() {
            continue;
        }
        match state.enemies[i].ai {
            EnemyAi::Boss(_) => update_boss(state, i, dt),
            EnemyAi::Chase => chase(state, i, target, dt),
        }
    }
}

/// Straight-line pursuit, one axis at a time so walls can be slid along
fn chase(state: &mut WorldState, idx: usize, target: Vec2, dt: f32) {
    let speed_mod = state.settings.difficulty.enemy_speed_modifier();
    let max = (state.arena - glam::IVec2::ONE).as_vec2();
    let enemy = &state.enemies[idx];
    if enemy.stun > 0.0 {
        return;
    }
    let slow = if enemy.slow > 0.0 { SLOW_MULTIPLIER } else { 1.0 };
    let speed = ENEMY_BASE_SPEED * enemy.kind.speed_factor() * slow * speed_mod;

    let to_target = target - enemy.pos;
    let dist = to_target.length();
    if dist <= f32::EPSILON {
        return;
    }
    let step = to_target / dist * (speed * dt).min(dist);

    let mut pos = enemy.pos;
    let along_x = Vec2::new(pos.x + step.x, pos.y);
    if !state.walls.contains(&world_to_cell(along_x)) {
        pos = along_x;
    }
    let along_y = Vec2::new(pos.x, pos.y + step.y);
    if !state.walls.contains(&world_to_cell(along_y)) {
        pos = along_y;
    }
    state.enemies[idx].pos = pos.clamp(Vec2::ZERO, max);
}

/// Pull magnetised loot toward the head
///
/// Xp is always attracted inside the base radius plus the magnet upgrade
/// bonus. Every pickup (xp included) uses the larger effect radius while a
/// magnet pickup is active. Loot chases faster than the player moves and
/// snaps onto the head once close enough.
pub fn update_loot(state: &mut WorldState, dt: f32) {
    let head = state.player.head_pos();
    let chase = state.player_speed() * LOOT_CHASE_MULTIPLIER * dt;
    let xp_radius = XP_MAGNET_RADIUS + state.stats.magnet_bonus();
    let magnet_active = state.effects.magnet > 0.0;

    for loot in &mut state.loot {
        let radius = if magnet_active {
            MAGNET_EFFECT_RADIUS.max(xp_radius)
        } else if matches!(loot.kind, LootKind::Xp(_)) {
            xp_radius
        } else {
            continue;
        };
        let dist = loot.pos.distance(head);
        if dist > radius {
            continue;
        }
        if dist <= LOOT_SNAP_DISTANCE || dist <= chase {
            loot.pos = head;
        } else {
            loot.pos += (head - loot.pos) / dist * chase;
        }
    }
}
