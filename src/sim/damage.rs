//! Damage pipeline
//!
//! Every weapon hit funnels through [`damage_enemy`]: crit roll, health
//! loss, echo cache charge, feedback, one optional chain bounce, and death
//! processing. Enemies are only flagged dead here; they leave the world in
//! [`WorldState::cleanup`] so indices stay valid for the rest of the tick.

use glam::Vec2;
use rand::Rng;

use super::events::{GameEvent, SoundTag};
use super::state::{Enemy, EnemyKind, LightningArc, LootKind, WorldState};
use crate::consts::*;

/// Raw health loss plus hit flash
pub fn apply_damage(enemy: &mut Enemy, amount: f32) {
    enemy.health -= amount;
    enemy.flash = DAMAGE_FLASH;
}

/// Full weapon hit on the enemy at `idx`. Returns the damage dealt.
///
/// A chained bounce is itself never chainable, so one originating hit
/// reaches at most one extra enemy.
pub fn damage_enemy(
    state: &mut WorldState,
    idx: usize,
    base_damage: f32,
    force_crit: bool,
    allow_chain: bool,
) -> f32 {
    let Some(enemy) = state.enemies.get(idx) else {
        return 0.0;
    };
    if !enemy.alive() {
        return 0.0;
    }

    let crit = force_crit || state.rng.random::<f32>() < state.stats.crit_chance;
    let amount = if crit {
        base_damage * state.stats.crit_multiplier
    } else {
        base_damage
    };

    let enemy = &mut state.enemies[idx];
    apply_damage(enemy, amount);
    let pos = enemy.pos;
    let id = enemy.id;
    let lethal = enemy.health <= 0.0;

    if state.stats.echo_level > 0 {
        state.echo_charge += amount;
        if state.echo_charge >= state.stats.echo_threshold() {
            // Reset before the blast so its own hits can't re-trigger it
            let charge = std::mem::take(&mut state.echo_charge);
            echo_burst(state, charge);
        }
    }

    if state.settings.show_damage_numbers {
        state.emit(GameEvent::DamageNumber { pos, amount, crit });
    }
    state.emit_sound(SoundTag::Hit);

    if lethal {
        kill_enemy(state, idx);
    }

    if allow_chain && state.stats.chain_level > 0 {
        let next = state
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.id != id && e.alive())
            .map(|(i, e)| (i, e.pos.distance_squared(pos)))
            .filter(|&(_, d)| d <= CHAIN_RANGE_SQ)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i);
        if let Some(j) = next {
            let to = state.enemies[j].pos;
            let chained = amount * state.stats.chain_damage_ratio();
            state.arcs.push(LightningArc {
                from: pos,
                to,
                life: LIGHTNING_LIFETIME,
            });
            state.emit(GameEvent::ChainLink { from: pos, to });
            damage_enemy(state, j, chained, false, false);
        }
    }

    amount
}

/// Weapon hit on every living enemy within `radius` of `center`
pub fn area_damage(state: &mut WorldState, center: Vec2, radius: f32, damage: f32) -> usize {
    let radius_sq = radius * radius;
    let targets: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive() && e.pos.distance_squared(center) <= radius_sq)
        .map(|(i, _)| i)
        .collect();
    for &i in &targets {
        damage_enemy(state, i, damage, false, false);
    }
    targets.len()
}

/// Echo cache release: blast around the head scaled by the stored charge
fn echo_burst(state: &mut WorldState, charge: f32) {
    let center = state.player.head_pos();
    let damage = charge * ECHO_BURST_RATIO;
    let radius_sq = ECHO_BURST_RADIUS * ECHO_BURST_RADIUS;
    log::debug!("Echo burst: {:.1} damage", damage);

    let mut killed = Vec::new();
    for (i, enemy) in state.enemies.iter_mut().enumerate() {
        if enemy.alive() && enemy.pos.distance_squared(center) <= radius_sq {
            apply_damage(enemy, damage);
            if enemy.health <= 0.0 {
                killed.push(i);
            }
        }
    }
    state.spawn_shockwave(center, ECHO_BURST_RADIUS, ECHO_BURST_RADIUS * 4.0, None, None);
    state.emit_sound(SoundTag::Burst);
    state.emit(GameEvent::EchoBurst { pos: center, damage });
    for i in killed {
        kill_enemy(state, i);
    }
}

/// Death processing. Runs at most once per enemy.
pub fn kill_enemy(state: &mut WorldState, idx: usize) {
    let Some(enemy) = state.enemies.get_mut(idx) else {
        return;
    };
    if enemy.dead {
        return;
    }
    enemy.dead = true;
    let kind = enemy.kind;
    let pos = enemy.pos;

    state.kills += 1;
    // Score arrives through the dropped xp, not the kill itself
    state.spawn_loot(LootKind::Xp(kind.xp_reward()), pos);

    let magnet_level = state.stats.neural_magnet_level;
    if magnet_level > 0 {
        let head = state.player.head_pos();
        let radius_sq = (NEURAL_MAGNET_RADIUS * magnet_level as f32).powi(2);
        for loot in &mut state.loot {
            if loot.pos.distance_squared(pos) <= radius_sq {
                loot.pos = loot.pos.lerp(head, 0.8);
            }
        }
    }

    if kind == EnemyKind::Boss {
        log::info!("Boss defeated after {:.1}s", state.elapsed);
        state.boss_defeated = true;
        state.emit_sound(SoundTag::BossDefeated);
        state.emit(GameEvent::BossDefeated { pos });
    } else {
        state.emit_sound(SoundTag::EnemyDestroyed);
        state.emit(GameEvent::EnemyKilled { kind, pos });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::stats::CharacterProfile;

    fn world() -> WorldState {
        let mut state = WorldState::new(11, Settings::default(), CharacterProfile::default());
        state.stats.crit_chance = 0.0;
        state
    }

    fn spawn(state: &mut WorldState, kind: EnemyKind, pos: Vec2, health: f32) -> usize {
        state.spawn_enemy(kind, pos);
        let idx = state.enemies.len() - 1;
        state.enemies[idx].health = health;
        state.enemies[idx].max_health = health;
        idx
    }

    #[test]
    fn test_apply_damage_sets_flash() {
        let mut enemy = Enemy::new(1, EnemyKind::Drone, Vec2::ZERO, 20.0);
        apply_damage(&mut enemy, 5.0);
        assert_eq!(enemy.health, 15.0);
        assert!(enemy.flash > 0.0);
    }

    #[test]
    fn test_forced_crit_multiplies() {
        let mut state = world();
        let a = spawn(&mut state, EnemyKind::Brute, Vec2::new(5.0, 5.0), 100.0);
        let dealt = damage_enemy(&mut state, a, 10.0, true, false);
        assert_eq!(dealt, 10.0 * state.stats.crit_multiplier);
        assert!(matches!(
            state.events()[0],
            GameEvent::DamageNumber { crit: true, .. }
        ));
    }

    #[test]
    fn test_chain_hits_one_extra_enemy_without_rechaining() {
        let mut state = world();
        state.stats.chain_level = 1;
        let a = spawn(&mut state, EnemyKind::Brute, Vec2::new(5.0, 5.0), 100.0);
        let b = spawn(&mut state, EnemyKind::Brute, Vec2::new(7.0, 5.0), 100.0);
        let c = spawn(&mut state, EnemyKind::Brute, Vec2::new(9.0, 5.0), 100.0);

        damage_enemy(&mut state, a, 10.0, false, true);

        let ratio = state.stats.chain_damage_ratio();
        assert_eq!(state.enemies[a].health, 90.0);
        assert!((state.enemies[b].health - (100.0 - 10.0 * ratio)).abs() < 1e-4);
        assert_eq!(state.enemies[c].health, 100.0);
        assert_eq!(state.arcs.len(), 1);
    }

    #[test]
    fn test_no_chain_without_upgrade() {
        let mut state = world();
        let a = spawn(&mut state, EnemyKind::Brute, Vec2::new(5.0, 5.0), 100.0);
        let b = spawn(&mut state, EnemyKind::Brute, Vec2::new(6.0, 5.0), 100.0);
        damage_enemy(&mut state, a, 10.0, false, true);
        assert_eq!(state.enemies[b].health, 100.0);
        assert!(state.arcs.is_empty());
    }

    #[test]
    fn test_echo_charge_resets_at_threshold() {
        let mut state = world();
        state.stats.echo_level = 1;
        let threshold = state.stats.echo_threshold();
        // Keep the target outside the burst radius
        state.player.body.clear();
        state.player.body.push_back(glam::IVec2::new(40, 30));
        let a = spawn(&mut state, EnemyKind::Brute, Vec2::new(5.0, 5.0), 10_000.0);

        damage_enemy(&mut state, a, threshold / 2.0, false, false);
        assert!((state.echo_charge - threshold / 2.0).abs() < 1e-4);
        damage_enemy(&mut state, a, threshold / 2.0, false, false);
        assert_eq!(state.echo_charge, 0.0);
        let bursts = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::EchoBurst { .. }))
            .count();
        assert_eq!(bursts, 1);

        damage_enemy(&mut state, a, threshold / 2.0, false, false);
        assert!((state.echo_charge - threshold / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_echo_burst_damages_near_player() {
        let mut state = world();
        state.stats.echo_level = 1;
        let head = state.player.head_pos();
        let far = spawn(&mut state, EnemyKind::Brute, Vec2::new(1.0, 1.0), 10_000.0);
        let near = spawn(&mut state, EnemyKind::Brute, head + Vec2::new(1.0, 0.0), 10_000.0);
        let threshold = state.stats.echo_threshold();
        damage_enemy(&mut state, far, threshold, false, false);
        let expected = 10_000.0 - threshold * ECHO_BURST_RATIO;
        assert!((state.enemies[near].health - expected).abs() < 1e-3);
    }

    #[test]
    fn test_death_processing_runs_once() {
        let mut state = world();
        let a = spawn(&mut state, EnemyKind::Drone, Vec2::new(5.0, 5.0), 5.0);
        damage_enemy(&mut state, a, 10.0, false, false);
        kill_enemy(&mut state, a);
        assert_eq!(state.kills, 1);
        assert_eq!(state.loot.len(), 1);
        assert_eq!(state.score, 0);
        // Dead enemies ignore further hits
        assert_eq!(damage_enemy(&mut state, a, 10.0, false, false), 0.0);
    }

    #[test]
    fn test_boss_death_sets_flag() {
        let mut state = world();
        let boss = spawn(&mut state, EnemyKind::Boss, Vec2::new(5.0, 5.0), 5.0);
        damage_enemy(&mut state, boss, 10.0, false, false);
        assert!(state.boss_defeated);
        assert!(state.sounds().contains(&SoundTag::BossDefeated));
        assert!(!state.sounds().contains(&SoundTag::EnemyDestroyed));
    }

    #[test]
    fn test_neural_magnet_pulls_loot() {
        let mut state = world();
        state.stats.neural_magnet_level = 1;
        let head = state.player.head_pos();
        let a = spawn(&mut state, EnemyKind::Drone, head + Vec2::new(10.0, 0.0), 1.0);
        damage_enemy(&mut state, a, 5.0, false, false);
        let loot = &state.loot[0];
        assert!(loot.pos.distance(head) < 10.0 * 0.5);
    }
}
