//! Projectile integration, mines and shockwaves
//!
//! Velocities are in cells per reference frame, so motion scales with
//! `dt * REFERENCE_FPS`. Entities are only flagged here; removal happens in
//! [`WorldState::cleanup`] at the end of the tick.

use glam::Vec2;

use super::damage::{area_damage, damage_enemy};
use super::events::SoundTag;
use super::state::{Enemy, HitTag, Owner, WorldState};
use crate::consts::*;

/// Extra cooldown past a pulse's remaining life so a hit never repeats
const PULSE_COOLDOWN_SLACK: f32 = 0.25;

fn nearest_alive(enemies: &[Enemy], pos: Vec2) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive())
        .map(|(i, e)| (i, e.pos.distance_squared(pos)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// Steer, move, expire and resolve player-owned projectile hits
pub fn update_projectiles(state: &mut WorldState, dt: f32) {
    let frames = dt * REFERENCE_FPS;
    let min = Vec2::splat(-BOUNDS_MARGIN);
    let max = state.arena.as_vec2() + Vec2::splat(BOUNDS_MARGIN);
    let mut detonations = Vec::new();

    let enemies = &state.enemies;
    for p in state.projectiles.iter_mut().filter(|p| !p.dead) {
        if p.homing {
            let locked = p
                .target
                .and_then(|id| enemies.iter().position(|e| e.id == id))
                .filter(|&i| enemies[i].alive());
            let target = locked.or_else(|| nearest_alive(enemies, p.pos));
            match target {
                Some(i) => {
                    p.target = Some(enemies[i].id);
                    let speed = p.vel.length();
                    let desired = (enemies[i].pos - p.pos).normalize_or_zero() * speed;
                    let blended = p.vel * (1.0 - HOMING_BLEND) + desired * HOMING_BLEND;
                    p.vel = blended.normalize_or_zero() * speed;
                }
                None => {
                    // Nothing left to chase
                    p.dead = true;
                    continue;
                }
            }
        }

        if p.gravity {
            p.vel.y += GRAVITY * frames;
        }
        p.pos += p.vel * frames;
        p.lifetime -= dt;

        if p.lifetime <= 0.0 {
            p.dead = true;
            if let Some(radius) = p.splash {
                detonations.push((p.pos, radius, p.damage));
            }
        } else if p.pos.cmplt(min).any() || p.pos.cmpgt(max).any() {
            p.dead = true;
        }
    }

    for (pos, radius, damage) in detonations {
        area_damage(state, pos, radius, damage);
        state.spawn_shockwave(pos, radius, radius * 6.0, None, None);
    }

    resolve_projectile_hits(state);
}

/// Player projectiles vs enemies (axis-aligned proximity box)
fn resolve_projectile_hits(state: &mut WorldState) {
    for pi in 0..state.projectiles.len() {
        let p = &state.projectiles[pi];
        // Lobbed shells are airborne until they land
        if p.dead || p.owner != Owner::Player || p.gravity {
            continue;
        }
        let pos = p.pos;
        let damage = p.damage;
        let piercing = p.piercing;

        let hit_box = |e: &Enemy| {
            let d = (e.pos - pos).abs();
            d.x <= PROJECTILE_HIT_BOX && d.y <= PROJECTILE_HIT_BOX
        };

        let hits: Vec<usize> = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive() && hit_box(e) && !p.hit_ids.contains(&e.id))
            .map(|(i, _)| i)
            .take(if piercing { usize::MAX } else { 1 })
            .collect();
        if hits.is_empty() {
            continue;
        }

        for &ei in &hits {
            let id = state.enemies[ei].id;
            let p = &mut state.projectiles[pi];
            if piercing {
                p.hit_ids.push(id);
            } else {
                p.dead = true;
            }
            damage_enemy(state, ei, damage, false, true);
        }
    }
}

/// Detonate mines with an enemy inside their trigger radius
pub fn update_mines(state: &mut WorldState) {
    let mut blasts = Vec::new();
    for mine in state.mines.iter_mut().filter(|m| !m.detonated) {
        let trigger_sq = mine.trigger_radius * mine.trigger_radius;
        let tripped = state
            .enemies
            .iter()
            .any(|e| e.alive() && e.pos.distance_squared(mine.pos) <= trigger_sq);
        if tripped {
            mine.detonated = true;
            blasts.push((mine.pos, mine.blast_radius, mine.damage));
        }
    }
    for (pos, radius, damage) in blasts {
        state.spawn_shockwave(pos, radius, radius * 4.0, Some(damage), None);
        state.emit_sound(SoundTag::Hit);
    }
}

/// Grow, fade and apply shockwaves
///
/// An enemy is hit only while it sits in the band the ring swept this tick,
/// and a per-pulse cooldown keeps it from being hit again by the same ring.
pub fn update_shockwaves(state: &mut WorldState, dt: f32) {
    for wi in 0..state.shockwaves.len() {
        let wave = &mut state.shockwaves[wi];
        let prev = wave.radius;
        wave.radius = (wave.radius + wave.growth * dt).min(wave.max_radius);
        wave.opacity = if wave.max_radius > 0.0 {
            (1.0 - wave.radius / wave.max_radius).max(0.0)
        } else {
            0.0
        };
        if wave.damage.is_none() && wave.stun.is_none() {
            continue;
        }

        let wave = wave.clone();
        let inner = (wave.radius - SHOCKWAVE_BAND).min(prev).max(0.0);
        let tag = HitTag::Shockwave(wave.id);
        let hold = wave.remaining_secs() + PULSE_COOLDOWN_SLACK;

        let mut hits = Vec::new();
        for (i, enemy) in state.enemies.iter_mut().enumerate() {
            if !enemy.alive() || enemy.is_cooling(tag) {
                continue;
            }
            let d = enemy.pos.distance(wave.origin);
            if d < inner || d > wave.radius {
                continue;
            }
            enemy.set_cooldown(tag, hold);
            if let Some(stun) = wave.stun {
                enemy.stun = enemy.stun.max(stun);
            }
            hits.push(i);
        }
        if let Some(damage) = wave.damage {
            for i in hits {
                damage_enemy(state, i, damage, false, false);
            }
        }
    }
}
