//! World state and core simulation types
//!
//! Every entity collection and every piece of run state lives on
//! [`WorldState`]. Subsystems receive it by `&mut` once per tick; nothing
//! else holds a reference to an entity.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::boss::BossAi;
use super::camera::CameraController;
use super::events::{GameEvent, SoundTag};
use super::stats::{CharacterProfile, Stats, Upgrade, WeaponKind};
use super::weapons::Arsenal;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    Wall,
    SelfCollision,
    Enemy,
    Projectile,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Wall => "wall",
            FailureReason::SelfCollision => "self",
            FailureReason::Enemy => "enemy",
            FailureReason::Projectile => "projectile",
        }
    }
}

/// Grid direction (screen space, +y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        self.delta().as_vec2()
    }
}

/// The player's segmented body
#[derive(Debug, Clone)]
pub struct Player {
    /// Occupied cells, head first
    pub body: VecDeque<IVec2>,
    /// Direction of the last committed step
    pub direction: Direction,
    /// Buffered turns, oldest first
    pub queued: VecDeque<Direction>,
    /// Time accumulated toward the next grid step
    pub move_accumulator: f32,
    /// Steps that keep the tail instead of dropping it
    pub pending_growth: u32,
}

impl Player {
    pub fn new(head: IVec2, direction: Direction, length: usize) -> Self {
        let back = direction.opposite().delta();
        let body = (0..length.max(1) as i32).map(|i| head + back * i).collect();
        Self {
            body,
            direction,
            queued: VecDeque::with_capacity(DIRECTION_BUFFER_CAPACITY),
            move_accumulator: 0.0,
            pending_growth: 0,
        }
    }

    #[inline]
    pub fn head(&self) -> IVec2 {
        self.body.front().copied().unwrap_or(IVec2::ZERO)
    }

    #[inline]
    pub fn head_pos(&self) -> Vec2 {
        crate::cell_to_world(self.head())
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Queue a turn. Ignored when the buffer is full or the turn repeats or
    /// reverses the most recently queued direction.
    pub fn queue_direction(&mut self, dir: Direction) -> bool {
        let last = self.queued.back().copied().unwrap_or(self.direction);
        if dir == last || dir == last.opposite() {
            return false;
        }
        if self.queued.len() >= DIRECTION_BUFFER_CAPACITY {
            return false;
        }
        self.queued.push_back(dir);
        true
    }

    /// Consume the next buffered turn (or keep going straight)
    pub fn take_direction(&mut self) -> Direction {
        if let Some(dir) = self.queued.pop_front() {
            self.direction = dir;
        }
        self.direction
    }

    /// Is `cell` covered by a body segment (optionally ignoring the head)
    pub fn occupies(&self, cell: IVec2, skip_head: bool) -> bool {
        self.body
            .iter()
            .skip(usize::from(skip_head))
            .any(|&c| c == cell)
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Baseline chaser
    Drone,
    /// Slow and tanky
    Brute,
    /// Fast and fragile
    Dart,
    /// Unique three-phase adversary
    Boss,
}

impl EnemyKind {
    pub fn base_health(&self) -> f32 {
        match self {
            EnemyKind::Drone => 20.0,
            EnemyKind::Brute => 60.0,
            EnemyKind::Dart => 10.0,
            EnemyKind::Boss => 1500.0,
        }
    }

    /// Speed relative to the base chase rate
    pub fn speed_factor(&self) -> f32 {
        match self {
            EnemyKind::Drone => 1.0,
            EnemyKind::Brute => 0.6,
            EnemyKind::Dart => 1.6,
            EnemyKind::Boss => 1.0,
        }
    }

    /// Experience dropped on death
    pub fn xp_reward(&self) -> u32 {
        match self {
            EnemyKind::Drone => 1,
            EnemyKind::Brute => 3,
            EnemyKind::Dart => 1,
            EnemyKind::Boss => 50,
        }
    }
}

/// Sources that debounce repeat hits on the same enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTag {
    /// One entry per shockwave pulse
    Shockwave(u32),
    Swarm,
    Tail,
}

/// Per-kind behaviour record
#[derive(Debug, Clone)]
pub enum EnemyAi {
    Chase,
    Boss(Box<BossAi>),
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Hit flash timer (visual only)
    pub flash: f32,
    pub slow: f32,
    pub stun: f32,
    pub hit_cooldowns: HashMap<HitTag, f32>,
    pub ai: EnemyAi,
    /// Death processing already ran
    pub dead: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, health: f32) -> Self {
        let ai = match kind {
            EnemyKind::Boss => EnemyAi::Boss(Box::default()),
            _ => EnemyAi::Chase,
        };
        Self {
            id,
            kind,
            pos,
            health,
            max_health: health,
            flash: 0.0,
            slow: 0.0,
            stun: 0.0,
            hit_cooldowns: HashMap::new(),
            ai,
            dead: false,
        }
    }

    #[inline]
    pub fn alive(&self) -> bool {
        !self.dead && self.health > 0.0
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }

    /// True when `tag` is still cooling down for this enemy
    pub fn is_cooling(&self, tag: HitTag) -> bool {
        self.hit_cooldowns.get(&tag).is_some_and(|&t| t > 0.0)
    }

    pub fn set_cooldown(&mut self, tag: HitTag, secs: f32) {
        self.hit_cooldowns.insert(tag, secs);
    }

    /// Count down every enemy-local timer
    pub fn decay_timers(&mut self, dt: f32) {
        self.flash = (self.flash - dt).max(0.0);
        self.slow = (self.slow - dt).max(0.0);
        self.stun = (self.stun - dt).max(0.0);
        self.hit_cooldowns.retain(|_, t| {
            *t -= dt;
            *t > 0.0
        });
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile entity
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Cells per reference frame
    pub vel: Vec2,
    pub damage: f32,
    pub owner: Owner,
    /// Passes through enemies, recording each one in `hit_ids`
    pub piercing: bool,
    pub hit_ids: Vec<u32>,
    /// Steers toward `target`
    pub homing: bool,
    pub target: Option<u32>,
    pub gravity: bool,
    /// Seconds left before expiry
    pub lifetime: f32,
    /// Splash radius on impact
    pub splash: Option<f32>,
    pub source: Option<WeaponKind>,
    /// Marked for removal
    pub dead: bool,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, damage: f32, owner: Owner, lifetime: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            damage,
            owner,
            piercing: false,
            hit_ids: Vec::new(),
            homing: false,
            target: None,
            gravity: false,
            lifetime,
            splash: None,
            source: None,
            dead: false,
        }
    }
}

/// A proximity mine
#[derive(Debug, Clone)]
pub struct Mine {
    pub id: u32,
    pub pos: Vec2,
    pub damage: f32,
    pub blast_radius: f32,
    pub trigger_radius: f32,
    pub detonated: bool,
}

/// An expanding ring that hits each enemy at most once
#[derive(Debug, Clone)]
pub struct Shockwave {
    pub id: u32,
    pub origin: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    /// Cells per second
    pub growth: f32,
    pub opacity: f32,
    pub damage: Option<f32>,
    pub stun: Option<f32>,
}

impl Shockwave {
    /// Seconds until the ring reaches its max radius
    pub fn remaining_secs(&self) -> f32 {
        if self.growth <= 0.0 {
            0.0
        } else {
            ((self.max_radius - self.radius) / self.growth).max(0.0)
        }
    }

    pub fn finished(&self) -> bool {
        self.radius >= self.max_radius || self.opacity <= 0.0
    }
}

/// Visual record of one chain-damage jump
#[derive(Debug, Clone)]
pub struct LightningArc {
    pub from: Vec2,
    pub to: Vec2,
    pub life: f32,
}

/// A capturable objective
#[derive(Debug, Clone)]
pub struct Terminal {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds of hacking accumulated
    pub progress: f32,
    pub total_time: f32,
    /// Progress lost per second while abandoned
    pub decay_rate: f32,
    pub completed: bool,
    pub just_completed: bool,
    pub just_disconnected: bool,
    /// Player was inside the radius last tick
    pub player_inside: bool,
    /// Seconds since the last disconnect signal
    pub since_signal: f32,
}

impl Terminal {
    pub fn fraction(&self) -> f32 {
        if self.total_time <= 0.0 {
            1.0
        } else {
            (self.progress / self.total_time).clamp(0.0, 1.0)
        }
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LootKind {
    Xp(u32),
    Food,
    Magnet,
    Shield,
    SpeedBoost,
}

/// A pickup entity
#[derive(Debug, Clone)]
pub struct Loot {
    pub id: u32,
    pub kind: LootKind,
    pub pos: Vec2,
}

/// Active player effects
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    pub shield: u32,
    pub invulnerable: f32,
    pub speed_boost: f32,
    pub magnet: f32,
}

impl ActiveEffects {
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    fn decay(&mut self, dt: f32) {
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.speed_boost = (self.speed_boost - dt).max(0.0);
        self.magnet = (self.magnet - dt).max(0.0);
    }
}

/// Ability cooldowns (seconds remaining)
#[derive(Debug, Clone, Default)]
pub struct Cooldowns {
    pub phase: f32,
    pub emp: f32,
    pub compress: f32,
}

impl Cooldowns {
    fn decay(&mut self, dt: f32) {
        self.phase = (self.phase - dt).max(0.0);
        self.emp = (self.emp - dt).max(0.0);
        self.compress = (self.compress - dt).max(0.0);
    }
}

/// Work scheduled for a later tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    RemoveTerminal(u32),
    SpawnLoot { kind: LootKind, pos: Vec2 },
}

#[derive(Debug, Clone)]
struct Deferred {
    run_id: u64,
    remaining: f32,
    action: DeferredAction,
}

/// Handle an external collaborator keeps to detect a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

/// Complete world state
#[derive(Debug, Clone)]
pub struct WorldState {
    /// Bumped on every reset
    pub run_id: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub profile: CharacterProfile,
    pub phase: GamePhase,
    pub failure: Option<FailureReason>,
    /// Arena size in cells
    pub arena: IVec2,
    pub walls: HashSet<IVec2>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub mines: Vec<Mine>,
    pub shockwaves: Vec<Shockwave>,
    pub arcs: Vec<LightningArc>,
    pub terminals: Vec<Terminal>,
    pub loot: Vec<Loot>,
    pub stats: Stats,
    pub arsenal: Arsenal,
    pub effects: ActiveEffects,
    pub cooldowns: Cooldowns,
    pub camera: CameraController,
    pub score: u64,
    pub xp: u32,
    pub xp_threshold: u32,
    pub level: u32,
    pub pending_upgrades: u32,
    pub stage: u32,
    pub kills: u32,
    /// Echo cache charge toward the next burst
    pub echo_charge: f32,
    pub boss_defeated: bool,
    /// Seconds of simulated play this run
    pub elapsed: f32,
    pub time_ticks: u64,
    sounds: Vec<SoundTag>,
    events: Vec<GameEvent>,
    deferred: Vec<Deferred>,
    next_id: u32,
}

impl WorldState {
    /// Create a fresh run
    pub fn new(seed: u64, settings: Settings, profile: CharacterProfile) -> Self {
        let stats = Stats::from_profile(&profile);
        let start = IVec2::new(ARENA_WIDTH / 2, ARENA_HEIGHT / 2);
        let player = Player::new(start, Direction::Right, START_LENGTH);
        let mut camera = CameraController::default();
        camera.follow_rate = settings.effective_camera_smoothing();
        camera.snap_to(player.head_pos());
        let effects = ActiveEffects {
            shield: stats.shield_charges,
            ..Default::default()
        };
        Self {
            run_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            profile,
            phase: GamePhase::Playing,
            failure: None,
            arena: IVec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            walls: HashSet::new(),
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            mines: Vec::new(),
            shockwaves: Vec::new(),
            arcs: Vec::new(),
            terminals: Vec::new(),
            loot: Vec::new(),
            arsenal: Arsenal::new(&stats),
            stats,
            effects,
            cooldowns: Cooldowns::default(),
            camera,
            score: 0,
            xp: 0,
            xp_threshold: XP_BASE_THRESHOLD,
            level: 1,
            pending_upgrades: 0,
            stage: 1,
            kills: 0,
            echo_charge: 0.0,
            boss_defeated: false,
            elapsed: 0.0,
            time_ticks: 0,
            sounds: Vec::new(),
            events: Vec::new(),
            deferred: Vec::new(),
            next_id: 1,
        }
    }

    /// Replace the whole run. The RNG stream and settings carry over, the
    /// run id moves forward so stale deferred work is dropped.
    pub fn reset_game(&mut self, profile: CharacterProfile) {
        let run_id = self.run_id + 1;
        let rng = self.rng.clone();
        let settings = self.settings.clone();
        *self = Self::new(0, settings, profile);
        self.rng = rng;
        self.run_id = run_id;
        log::info!("Run {} started", run_id);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn run_token(&self) -> RunToken {
        RunToken(self.run_id)
    }

    /// Does a token handed out earlier still belong to this run
    pub fn accepts(&self, token: RunToken) -> bool {
        token.0 == self.run_id
    }

    // --- Queues ---

    pub fn emit_sound(&mut self, tag: SoundTag) {
        self.sounds.push(tag);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sounds(&self) -> &[SoundTag] {
        &self.sounds
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all queued sound tags (audio collaborator, once per frame)
    pub fn drain_sounds(&mut self) -> Vec<SoundTag> {
        std::mem::take(&mut self.sounds)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Deferred work ---

    pub fn schedule(&mut self, delay: f32, action: DeferredAction) {
        self.deferred.push(Deferred {
            run_id: self.run_id,
            remaining: delay,
            action,
        });
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Count down scheduled work and run whatever is due
    pub fn process_deferred(&mut self, dt: f32) {
        let mut due = Vec::new();
        let run_id = self.run_id;
        self.deferred.retain_mut(|d| {
            if d.run_id != run_id {
                log::warn!("Dropping deferred {:?} from stale run {}", d.action, d.run_id);
                return false;
            }
            d.remaining -= dt;
            if d.remaining <= 0.0 {
                due.push(d.action);
                false
            } else {
                true
            }
        });
        for action in due {
            match action {
                DeferredAction::RemoveTerminal(id) => self.terminals.retain(|t| t.id != id),
                DeferredAction::SpawnLoot { kind, pos } => {
                    self.spawn_loot(kind, pos);
                }
            }
        }
    }

    // --- Spawner seam ---

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let stage_scale = 1.0 + 0.15 * self.stage.saturating_sub(1) as f32;
        let health =
            kind.base_health() * self.settings.difficulty.enemy_health_modifier() * stage_scale;
        self.enemies.push(Enemy::new(id, kind, pos, health));
        id
    }

    pub fn spawn_boss(&mut self, pos: Vec2) -> u32 {
        log::info!("Boss spawned at ({:.1}, {:.1})", pos.x, pos.y);
        self.spawn_enemy(EnemyKind::Boss, pos)
    }

    pub fn spawn_loot(&mut self, kind: LootKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.loot.push(Loot { id, kind, pos });
        id
    }

    pub fn spawn_terminal(
        &mut self,
        pos: Vec2,
        radius: f32,
        total_time: f32,
        decay_rate: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        self.terminals.push(Terminal {
            id,
            pos,
            radius,
            progress: 0.0,
            total_time,
            decay_rate,
            completed: false,
            just_completed: false,
            just_disconnected: false,
            player_inside: false,
            // A fresh terminal may signal on the first departure
            since_signal: TERMINAL_SIGNAL_GAP,
        });
        id
    }

    pub fn spawn_projectile(&mut self, mut projectile: Projectile) -> u32 {
        let id = self.next_entity_id();
        projectile.id = id;
        self.projectiles.push(projectile);
        id
    }

    pub fn spawn_shockwave(
        &mut self,
        origin: Vec2,
        max_radius: f32,
        growth: f32,
        damage: Option<f32>,
        stun: Option<f32>,
    ) -> u32 {
        let id = self.next_entity_id();
        self.shockwaves.push(Shockwave {
            id,
            origin,
            radius: 0.0,
            max_radius,
            growth,
            opacity: 1.0,
            damage,
            stun,
        });
        id
    }

    pub fn add_wall(&mut self, cell: IVec2) {
        self.walls.insert(cell);
    }

    // --- Queries ---

    #[inline]
    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.arena.x && cell.y < self.arena.y
    }

    /// Cell is outside the arena or walled off
    #[inline]
    pub fn blocked(&self, cell: IVec2) -> bool {
        !self.in_bounds(cell) || self.walls.contains(&cell)
    }

    pub fn arena_center(&self) -> Vec2 {
        (self.arena - IVec2::ONE).as_vec2() * 0.5
    }

    pub fn enemy_index(&self, id: u32) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }

    /// Nearest living enemy to `pos` within `max_range`
    pub fn nearest_enemy(&self, pos: Vec2, max_range: f32) -> Option<usize> {
        let max_sq = max_range * max_range;
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive())
            .map(|(i, e)| (i, e.pos.distance_squared(pos)))
            .filter(|&(_, d)| d <= max_sq)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|e| e.kind == EnemyKind::Boss && e.alive())
    }

    /// Current grid steps per second (drives loot chase speed)
    pub fn player_speed(&self) -> f32 {
        1.0 / self.move_interval()
    }

    /// Active move interval including speed boost
    pub fn move_interval(&self) -> f32 {
        if self.effects.speed_boost > 0.0 {
            self.stats.boosted_move_interval()
        } else {
            self.stats.move_interval
        }
    }

    // --- Run flow ---

    /// End the run
    pub fn game_over(&mut self, reason: FailureReason) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        log::info!(
            "Run {} over ({}), score {}, kills {}",
            self.run_id,
            reason.as_str(),
            self.score,
            self.kills
        );
        self.phase = GamePhase::GameOver;
        self.failure = Some(reason);
        self.emit_sound(SoundTag::GameOver);
        self.emit(GameEvent::GameOver { reason });
    }

    /// Add experience; every threshold crossed is one pending upgrade
    pub fn gain_xp(&mut self, amount: u32) {
        self.xp += amount;
        self.score += u64::from(amount) * 10;
        while self.xp >= self.xp_threshold {
            self.xp -= self.xp_threshold;
            self.level += 1;
            self.pending_upgrades += 1;
            self.xp_threshold = (self.xp_threshold as f32 * 1.4).ceil() as u32;
            self.emit_sound(SoundTag::PowerUp);
            self.emit(GameEvent::LevelUp { level: self.level });
        }
    }

    /// Spend one pending upgrade on `upgrade`. Returns false when none are
    /// banked.
    pub fn apply_upgrade(&mut self, upgrade: Upgrade) -> bool {
        if self.pending_upgrades == 0 {
            return false;
        }
        self.pending_upgrades -= 1;
        self.stats.apply_upgrade(upgrade);
        if upgrade == Upgrade::Shield {
            self.effects.shield += 1;
        }
        log::debug!("Upgrade {:?} applied, {} pending", upgrade, self.pending_upgrades);
        true
    }

    /// Count down run-scoped timers
    pub fn decay_timers(&mut self, dt: f32) {
        self.effects.decay(dt);
        self.cooldowns.decay(dt);
        for arc in &mut self.arcs {
            arc.life -= dt;
        }
        self.arcs.retain(|a| a.life > 0.0);
        for enemy in &mut self.enemies {
            enemy.decay_timers(dt);
        }
    }

    /// Drop entities marked for removal
    pub fn cleanup(&mut self) {
        self.enemies.retain(|e| !e.dead);
        self.projectiles.retain(|p| !p.dead);
        self.mines.retain(|m| !m.detonated);
        self.shockwaves.retain(|s| !s.finished());
    }
}
