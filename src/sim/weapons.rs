//! Weapon firing and player abilities
//!
//! Each owned archetype accumulates time toward its own fire interval.
//! Overclock shortens every interval while its burst window is open. The
//! swarm is the exception: its drones orbit continuously and debounce hits
//! per enemy instead of using a trigger timer.

use glam::Vec2;

use super::damage::{area_damage, damage_enemy};
use super::events::SoundTag;
use super::state::{HitTag, Mine, Owner, Projectile, WorldState};
use super::stats::{Stats, WeaponKind};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Max distance a targeted weapon will aim at
pub const WEAPON_RANGE: f32 = 16.0;
const PROJECTILE_LIFETIME: f32 = 2.0;
const SWARM_HIT_RADIUS: f32 = 0.8;
const OVERCLOCK_FACTOR: f32 = 0.5;
const NOVA_GROWTH: f32 = 9.0;
const EMP_GROWTH: f32 = 20.0;

/// Player-triggered abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Phase,
    Emp,
    Compress,
}

/// Global fire-rate burst that cycles active/cooldown
#[derive(Debug, Clone, Default)]
pub struct Overclock {
    pub active: bool,
    /// Seconds left in the current window
    pub timer: f32,
}

/// Weapon timers
#[derive(Debug, Clone)]
pub struct Arsenal {
    /// Time accumulated toward each archetype's next trigger
    timers: [f32; WeaponKind::COUNT],
    /// Seconds left on a charging rail shot
    pub rail_charge: Option<f32>,
    pub swarm_angle: f32,
    pub overclock: Overclock,
}

impl Arsenal {
    pub fn new(stats: &Stats) -> Self {
        Self {
            timers: [0.0; WeaponKind::COUNT],
            rail_charge: None,
            swarm_angle: 0.0,
            overclock: Overclock {
                active: false,
                timer: stats.overclock_cooldown(),
            },
        }
    }

    /// Interval after overclock
    pub fn effective_interval(&self, stats: &Stats, kind: WeaponKind) -> f32 {
        let base = stats.weapon(kind).interval;
        if self.overclock.active {
            base * OVERCLOCK_FACTOR
        } else {
            base
        }
    }

    /// 1.0 = just fired, 0.0 = ready
    pub fn cooldown_fraction(&self, stats: &Stats, kind: WeaponKind) -> f32 {
        if kind == WeaponKind::Swarm || !stats.weapon(kind).owned() {
            return 0.0;
        }
        if kind == WeaponKind::Rail && self.rail_charge.is_some() {
            return 1.0;
        }
        let interval = self.effective_interval(stats, kind);
        if interval <= 0.0 {
            return 0.0;
        }
        (1.0 - self.timers[kind.index()] / interval).clamp(0.0, 1.0)
    }

    /// Current drone positions around `center`
    pub fn swarm_positions(&self, stats: &Stats, center: Vec2) -> Vec<Vec2> {
        let w = stats.weapon(WeaponKind::Swarm);
        if !w.owned() || w.count == 0 {
            return Vec::new();
        }
        (0..w.count)
            .map(|i| {
                let angle = self.swarm_angle + i as f32 * std::f32::consts::TAU / w.count as f32;
                center + polar_to_cartesian(w.radius, angle)
            })
            .collect()
    }

    fn update_overclock(&mut self, stats: &Stats, dt: f32) {
        if stats.overclock_level == 0 {
            self.overclock.active = false;
            return;
        }
        self.overclock.timer -= dt;
        if self.overclock.timer <= 0.0 {
            self.overclock.active = !self.overclock.active;
            self.overclock.timer = if self.overclock.active {
                stats.overclock_active()
            } else {
                stats.overclock_cooldown()
            };
        }
    }
}

/// Advance every weapon timer and fire whatever is ready
pub fn update_weapons(state: &mut WorldState, dt: f32) {
    let stats = state.stats.clone();
    state.arsenal.update_overclock(&stats, dt);

    update_swarm(state, &stats, dt);

    if let Some(charge) = state.arsenal.rail_charge {
        let charge = charge - dt;
        if charge <= 0.0 {
            state.arsenal.rail_charge = None;
            release_rail(state, &stats);
        } else {
            state.arsenal.rail_charge = Some(charge);
        }
    }

    for (kind, _) in stats.owned_weapons() {
        if kind == WeaponKind::Swarm {
            continue;
        }
        if kind == WeaponKind::Rail && state.arsenal.rail_charge.is_some() {
            continue;
        }
        let interval = state.arsenal.effective_interval(&stats, kind);
        let timer = &mut state.arsenal.timers[kind.index()];
        *timer += dt;
        if *timer < interval {
            continue;
        }
        if fire(state, &stats, kind) {
            state.arsenal.timers[kind.index()] -= interval;
        } else {
            // Hold ready without banking extra shots
            state.arsenal.timers[kind.index()] = interval;
        }
    }
}

/// Fire one archetype. Returns false when it had nothing to shoot at.
fn fire(state: &mut WorldState, stats: &Stats, kind: WeaponKind) -> bool {
    let w = *stats.weapon(kind);
    let head = state.player.head_pos();
    let facing = state.player.direction.as_vec2();

    match kind {
        WeaponKind::Aura => area_damage(state, head, w.radius, w.damage) > 0,

        WeaponKind::Cannon | WeaponKind::Lance | WeaponKind::Scatter => {
            let Some(ti) = state.nearest_enemy(head, WEAPON_RANGE) else {
                return false;
            };
            let aim = state.enemies[ti].pos - head;
            let base_angle = aim.y.atan2(aim.x);
            let (count, spread) = match kind {
                WeaponKind::Scatter => (w.count.max(1), w.special),
                WeaponKind::Cannon => (w.count.max(1), 0.15 * (w.count.saturating_sub(1)) as f32),
                _ => (1, 0.0),
            };
            let half = (count as f32 - 1.0) / 2.0;
            let step = if count > 1 { spread / (count as f32 - 1.0) } else { 0.0 };
            for i in 0..count {
                let angle = base_angle + (i as f32 - half) * step;
                let mut p = Projectile::new(
                    0,
                    head,
                    polar_to_cartesian(w.speed, angle),
                    w.damage,
                    Owner::Player,
                    PROJECTILE_LIFETIME,
                );
                p.piercing = kind == WeaponKind::Lance;
                p.source = Some(kind);
                state.spawn_projectile(p);
            }
            state.emit_sound(SoundTag::Shoot);
            true
        }

        WeaponKind::Rail => {
            if state.nearest_enemy(head, WEAPON_RANGE).is_none() {
                return false;
            }
            state.arsenal.rail_charge = Some(w.special);
            log::debug!("Rail charging ({:.2}s)", w.special);
            true
        }

        WeaponKind::Mines => {
            if state.mines.len() >= w.count as usize {
                return false;
            }
            let tail = state.player.body.back().copied().unwrap_or_default();
            let id = state.next_entity_id();
            state.mines.push(Mine {
                id,
                pos: crate::cell_to_world(tail),
                damage: w.damage,
                blast_radius: w.radius,
                trigger_radius: w.special,
                detonated: false,
            });
            true
        }

        WeaponKind::Seeker => {
            let target = state.nearest_enemy(head, WEAPON_RANGE * 1.5);
            let Some(ti) = target else {
                return false;
            };
            let target_id = state.enemies[ti].id;
            let count = w.count.max(1);
            for i in 0..count {
                // Fan out sideways, homing bends them back in
                let side = (i as f32 - (count as f32 - 1.0) / 2.0) * 0.6;
                let dir = (facing + facing.perp() * side).normalize_or(facing);
                let mut p = Projectile::new(
                    0,
                    head,
                    dir * w.speed,
                    w.damage,
                    Owner::Player,
                    PROJECTILE_LIFETIME * 2.0,
                );
                p.homing = true;
                p.target = Some(target_id);
                p.source = Some(kind);
                state.spawn_projectile(p);
            }
            state.emit_sound(SoundTag::Shoot);
            true
        }

        WeaponKind::Mortar => {
            let Some(ti) = state.nearest_enemy(head, WEAPON_RANGE) else {
                return false;
            };
            let target = state.enemies[ti].pos;
            let delta = target - head;
            let frames = (delta.length() / w.speed).max(10.0);
            // Lob so gravity brings the shell down on the target
            let vel = Vec2::new(
                delta.x / frames,
                delta.y / frames - 0.5 * GRAVITY * frames,
            );
            let mut p = Projectile::new(
                0,
                head,
                vel,
                w.damage,
                Owner::Player,
                frames / REFERENCE_FPS,
            );
            p.gravity = true;
            p.splash = Some(w.radius);
            p.source = Some(kind);
            state.spawn_projectile(p);
            state.emit_sound(SoundTag::Shoot);
            true
        }

        WeaponKind::Nova => {
            state.spawn_shockwave(head, w.radius, NOVA_GROWTH, Some(w.damage), None);
            true
        }

        WeaponKind::Swarm => false,
    }
}

/// Fire a fully charged rail shot at the nearest enemy (or straight ahead)
fn release_rail(state: &mut WorldState, stats: &Stats) {
    let w = stats.weapon(WeaponKind::Rail);
    let head = state.player.head_pos();
    let dir = state
        .nearest_enemy(head, WEAPON_RANGE * 1.5)
        .map(|ti| (state.enemies[ti].pos - head).normalize_or_zero())
        .filter(|d| *d != Vec2::ZERO)
        .unwrap_or_else(|| state.player.direction.as_vec2());
    let mut p = Projectile::new(
        0,
        head,
        dir * w.speed,
        w.damage,
        Owner::Player,
        PROJECTILE_LIFETIME,
    );
    p.piercing = true;
    p.source = Some(WeaponKind::Rail);
    state.spawn_projectile(p);
    state.emit_sound(SoundTag::Shoot);
}

fn update_swarm(state: &mut WorldState, stats: &Stats, dt: f32) {
    let w = *stats.weapon(WeaponKind::Swarm);
    if !w.owned() {
        return;
    }
    state.arsenal.swarm_angle = crate::normalize_angle(state.arsenal.swarm_angle + w.speed * dt);
    let drones = state.arsenal.swarm_positions(stats, state.player.head_pos());
    let reach_sq = SWARM_HIT_RADIUS * SWARM_HIT_RADIUS;

    let mut hits = Vec::new();
    for (i, enemy) in state.enemies.iter_mut().enumerate() {
        if !enemy.alive() || enemy.is_cooling(HitTag::Swarm) {
            continue;
        }
        if drones.iter().any(|d| d.distance_squared(enemy.pos) <= reach_sq) {
            enemy.set_cooldown(HitTag::Swarm, w.interval);
            hits.push(i);
        }
    }
    for i in hits {
        damage_enemy(state, i, w.damage, false, true);
    }
}

/// Trigger an ability. Returns false while it is cooling down or unavailable.
pub fn trigger_ability(state: &mut WorldState, ability: Ability) -> bool {
    let head = state.player.head_pos();
    match ability {
        Ability::Phase => {
            if state.stats.phase_level == 0 || state.cooldowns.phase > 0.0 {
                return false;
            }
            activate_phase(state);
            true
        }
        Ability::Emp => {
            if state.cooldowns.emp > 0.0 {
                return false;
            }
            state.cooldowns.emp = EMP_COOLDOWN;
            state.spawn_shockwave(head, EMP_RADIUS, EMP_GROWTH, None, Some(EMP_STUN));
            state.emit_sound(SoundTag::Emp);
            true
        }
        Ability::Compress => {
            let len = state.player.len();
            if state.cooldowns.compress > 0.0 || len <= COMPRESS_MIN_LENGTH {
                return false;
            }
            let shed = len - COMPRESS_MIN_LENGTH;
            state.player.body.truncate(COMPRESS_MIN_LENGTH);
            state.player.pending_growth = 0;
            state.cooldowns.compress = COMPRESS_COOLDOWN;
            let damage = shed as f32 * COMPRESS_DAMAGE_PER_SEGMENT;
            let radius = 3.0 + shed as f32 * 0.5;
            state.spawn_shockwave(head, radius, radius * 2.0, Some(damage), None);
            state.emit_sound(SoundTag::Compress);
            true
        }
    }
}

/// Start a phase window (also used by the automatic contact save)
pub fn activate_phase(state: &mut WorldState) {
    let duration = PHASE_DURATION + 0.25 * state.stats.phase_level.saturating_sub(1) as f32;
    state.effects.invulnerable = state.effects.invulnerable.max(duration);
    state.cooldowns.phase = PHASE_COOLDOWN;
    state.emit_sound(SoundTag::Phase);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::EnemyKind;
    use crate::sim::projectiles::update_projectiles;
    use crate::sim::stats::CharacterProfile;

    fn world_with(weapons: &[(WeaponKind, u32)]) -> WorldState {
        let mut profile = CharacterProfile::default();
        for &(kind, level) in weapons {
            profile.weapons.insert(kind, level);
        }
        let mut state = WorldState::new(5, Settings::default(), profile);
        state.stats.crit_chance = 0.0;
        state
    }

    fn near_head(state: &WorldState, offset: Vec2) -> Vec2 {
        state.player.head_pos() + offset
    }

    #[test]
    fn test_cannon_waits_for_target() {
        let mut state = world_with(&[(WeaponKind::Cannon, 1)]);
        let interval = state.stats.weapon(WeaponKind::Cannon).interval;
        update_weapons(&mut state, interval * 2.0);
        assert!(state.projectiles.is_empty());
        // Ready but not banked
        assert_eq!(state.arsenal.cooldown_fraction(&state.stats, WeaponKind::Cannon), 0.0);

        let pos = near_head(&state, Vec2::new(5.0, 0.0));
        state.spawn_enemy(EnemyKind::Drone, pos);
        update_weapons(&mut state, 0.001);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].vel.x > 0.0);
        assert!(state.sounds().contains(&SoundTag::Shoot));
    }

    #[test]
    fn test_lance_fires_piercing() {
        let mut state = world_with(&[(WeaponKind::Lance, 1)]);
        let pos = near_head(&state, Vec2::new(0.0, 4.0));
        state.spawn_enemy(EnemyKind::Drone, pos);
        let dt = state.stats.weapon(WeaponKind::Lance).interval;
        update_weapons(&mut state, dt);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].piercing);
    }

    #[test]
    fn test_scatter_fan_count() {
        let mut state = world_with(&[(WeaponKind::Scatter, 2)]);
        let pos = near_head(&state, Vec2::new(4.0, 0.0));
        state.spawn_enemy(EnemyKind::Drone, pos);
        let dt = state.stats.weapon(WeaponKind::Scatter).interval;
        update_weapons(&mut state, dt);
        let count = state.stats.weapon(WeaponKind::Scatter).count;
        assert_eq!(state.projectiles.len() as u32, count);
    }

    #[test]
    fn test_overclock_shortens_interval() {
        let mut state = world_with(&[(WeaponKind::Cannon, 1)]);
        state.stats.overclock_level = 1;
        let base = state.stats.weapon(WeaponKind::Cannon).interval;
        state.arsenal.overclock.timer = 0.0;
        update_weapons(&mut state, 0.001);
        assert!(state.arsenal.overclock.active);
        let eff = state.arsenal.effective_interval(&state.stats, WeaponKind::Cannon);
        assert!((eff - base * OVERCLOCK_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_overclock_cycles_back_to_cooldown() {
        let mut state = world_with(&[(WeaponKind::Cannon, 1)]);
        state.stats.overclock_level = 1;
        state.arsenal.overclock = Overclock {
            active: true,
            timer: 0.0005,
        };
        update_weapons(&mut state, 0.001);
        assert!(!state.arsenal.overclock.active);
        assert_eq!(state.arsenal.overclock.timer, state.stats.overclock_cooldown());
        let base = state.stats.weapon(WeaponKind::Cannon).interval;
        assert_eq!(state.arsenal.effective_interval(&state.stats, WeaponKind::Cannon), base);
    }

    #[test]
    fn test_aura_hits_every_enemy_in_radius() {
        let mut state = world_with(&[(WeaponKind::Aura, 1)]);
        let w = *state.stats.weapon(WeaponKind::Aura);
        let inside_a = near_head(&state, Vec2::new(w.radius * 0.5, 0.0));
        let inside_b = near_head(&state, Vec2::new(0.0, -w.radius * 0.5));
        let outside = near_head(&state, Vec2::new(w.radius + 3.0, 0.0));
        for pos in [inside_a, inside_b, outside] {
            state.spawn_enemy(EnemyKind::Brute, pos);
        }
        for enemy in &mut state.enemies {
            enemy.health = 1000.0;
        }

        update_weapons(&mut state, w.interval);

        assert_eq!(state.enemies[0].health, 1000.0 - w.damage);
        assert_eq!(state.enemies[1].health, 1000.0 - w.damage);
        assert_eq!(state.enemies[2].health, 1000.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_seeker_locks_on_target() {
        let mut state = world_with(&[(WeaponKind::Seeker, 1)]);
        let pos = near_head(&state, Vec2::new(0.0, -6.0));
        let id = state.spawn_enemy(EnemyKind::Drone, pos);
        let w = *state.stats.weapon(WeaponKind::Seeker);

        update_weapons(&mut state, w.interval);

        assert_eq!(state.projectiles.len() as u32, w.count.max(1));
        for p in &state.projectiles {
            assert!(p.homing);
            assert_eq!(p.target, Some(id));
            assert_eq!(p.source, Some(WeaponKind::Seeker));
        }
    }

    #[test]
    fn test_mortar_lobs_and_splashes_target() {
        let mut state = world_with(&[(WeaponKind::Mortar, 1)]);
        let pos = near_head(&state, Vec2::new(6.0, 0.0));
        state.spawn_enemy(EnemyKind::Brute, pos);
        state.enemies[0].health = 1000.0;
        let w = *state.stats.weapon(WeaponKind::Mortar);

        update_weapons(&mut state, w.interval);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].gravity);
        assert_eq!(state.projectiles[0].splash, Some(w.radius));
        // Thrown upward so gravity brings it down
        assert!(state.projectiles[0].vel.y < 0.0);

        let mut ticks = 0;
        while !state.projectiles.is_empty() {
            update_projectiles(&mut state, SIM_DT);
            state.cleanup();
            ticks += 1;
            assert!(ticks < 600);
        }
        assert_eq!(state.enemies[0].health, 1000.0 - w.damage);
    }

    #[test]
    fn test_nova_fires_damaging_ring() {
        let mut state = world_with(&[(WeaponKind::Nova, 1)]);
        let w = *state.stats.weapon(WeaponKind::Nova);
        update_weapons(&mut state, w.interval);
        assert_eq!(state.shockwaves.len(), 1);
        let wave = &state.shockwaves[0];
        assert_eq!(wave.origin, state.player.head_pos());
        assert_eq!(wave.max_radius, w.radius);
        assert_eq!(wave.damage, Some(w.damage));
        assert!(wave.stun.is_none());
    }

    #[test]
    fn test_rail_charges_then_fires() {
        let mut state = world_with(&[(WeaponKind::Rail, 1)]);
        let pos = near_head(&state, Vec2::new(6.0, 0.0));
        state.spawn_enemy(EnemyKind::Brute, pos);
        let w = *state.stats.weapon(WeaponKind::Rail);
        update_weapons(&mut state, w.interval);
        assert!(state.arsenal.rail_charge.is_some());
        assert!(state.projectiles.is_empty());
        update_weapons(&mut state, w.special + 0.01);
        assert!(state.arsenal.rail_charge.is_none());
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].piercing);
    }

    #[test]
    fn test_mines_capped() {
        let mut state = world_with(&[(WeaponKind::Mines, 1)]);
        let w = *state.stats.weapon(WeaponKind::Mines);
        for _ in 0..(w.count + 3) {
            update_weapons(&mut state, w.interval);
        }
        assert_eq!(state.mines.len() as u32, w.count);
    }

    #[test]
    fn test_swarm_debounces_hits() {
        let mut state = world_with(&[(WeaponKind::Swarm, 1)]);
        let w = *state.stats.weapon(WeaponKind::Swarm);
        let head = state.player.head_pos();
        // Sit on the first drone's orbit slot
        state.spawn_enemy(EnemyKind::Brute, head + Vec2::new(w.radius, 0.0));
        state.enemies[0].health = 1000.0;
        state.arsenal.swarm_angle = -w.speed * 0.001;
        update_weapons(&mut state, 0.001);
        let after_first = state.enemies[0].health;
        assert!(after_first < 1000.0);
        state.arsenal.swarm_angle = -w.speed * 0.001;
        update_weapons(&mut state, 0.001);
        assert_eq!(state.enemies[0].health, after_first);
    }

    #[test]
    fn test_emp_and_cooldown() {
        let mut state = world_with(&[]);
        assert!(trigger_ability(&mut state, Ability::Emp));
        assert_eq!(state.shockwaves.len(), 1);
        assert!(state.shockwaves[0].stun.is_some());
        assert!(!trigger_ability(&mut state, Ability::Emp));
    }

    #[test]
    fn test_phase_needs_upgrade() {
        let mut state = world_with(&[]);
        assert!(!trigger_ability(&mut state, Ability::Phase));
        state.stats.phase_level = 1;
        assert!(trigger_ability(&mut state, Ability::Phase));
        assert!(state.effects.is_invulnerable());
        assert!(!trigger_ability(&mut state, Ability::Phase));
    }

    #[test]
    fn test_compress_sheds_tail() {
        let mut state = world_with(&[]);
        state.player.pending_growth = 4;
        while state.player.len() < 8 {
            let tail = *state.player.body.back().unwrap();
            state.player.body.push_back(tail - glam::IVec2::X);
        }
        assert!(trigger_ability(&mut state, Ability::Compress));
        assert_eq!(state.player.len(), COMPRESS_MIN_LENGTH);
        let wave = &state.shockwaves[0];
        assert_eq!(wave.damage, Some(5.0 * COMPRESS_DAMAGE_PER_SEGMENT));
        assert!(!trigger_ability(&mut state, Ability::Compress));
    }
}
