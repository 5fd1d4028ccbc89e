//! Neon Coil headless driver
//!
//! Runs a scripted run through the fixed-timestep loop and logs a summary.
//! Usage: `neon-coil [seed] [settings.json]` (logging via `RUST_LOG`).

use glam::{IVec2, Vec2};
use rand::Rng;

use neon_coil::Settings;
use neon_coil::consts::*;
use neon_coil::sim::{
    Ability, CameraIntent, CharacterProfile, Direction, EnemyKind, GameEvent, GamePhase, HudView,
    TickInput, Upgrade, WeaponKind, WorldState, tick,
};

/// Host frame rate the driver pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;
const RUN_SECONDS: f32 = 45.0;
/// Seconds between clockwise turns (keeps the player looping mid-arena)
const TURN_EVERY: f32 = 1.2;
const SPAWN_EVERY: f32 = 1.5;
const BOSS_AT: f32 = 20.0;

/// Order the scripted player picks upgrades in
const UPGRADE_PLAN: [Upgrade; 8] = [
    Upgrade::Weapon(WeaponKind::Lance),
    Upgrade::Chain,
    Upgrade::Weapon(WeaponKind::Nova),
    Upgrade::EchoCache,
    Upgrade::Weapon(WeaponKind::Cannon),
    Upgrade::Reflect,
    Upgrade::Overclock,
    Upgrade::Shield,
];

/// Game instance holding all state
struct Game {
    state: WorldState,
    accumulator: f32,
    input: TickInput,
    turn_timer: f32,
    spawn_timer: f32,
    boss_spawned: bool,
    upgrades_taken: usize,
    sounds_played: usize,
}

impl Game {
    fn new(seed: u64, settings: Settings) -> Self {
        let mut profile = CharacterProfile {
            name: "Demo".to_string(),
            shield_charges: Some(2),
            phase_level: Some(1),
            ..Default::default()
        };
        profile.weapons.insert(WeaponKind::Cannon, 2);
        profile.weapons.insert(WeaponKind::Aura, 1);
        profile.weapons.insert(WeaponKind::Swarm, 1);
        profile.weapons.insert(WeaponKind::Mines, 1);

        let mut state = WorldState::new(seed, settings, profile);
        for y in 4..9 {
            state.add_wall(IVec2::new(8, y));
        }
        let center = state.arena_center();
        state.spawn_terminal(center + Vec2::new(5.0, 0.0), 2.5, 3.0, 0.5);

        Self {
            state,
            accumulator: 0.0,
            input: TickInput::default(),
            turn_timer: 0.0,
            spawn_timer: 0.0,
            boss_spawned: false,
            upgrades_taken: 0,
            sounds_played: 0,
        }
    }

    /// Stand-in for the external input, spawner and upgrade collaborators
    fn script(&mut self, dt: f32) {
        self.turn_timer += dt;
        if self.turn_timer >= TURN_EVERY {
            self.turn_timer -= TURN_EVERY;
            let next = match self.state.player.direction {
                Direction::Right => Direction::Down,
                Direction::Down => Direction::Left,
                Direction::Left => Direction::Up,
                Direction::Up => Direction::Right,
            };
            self.input.directions.push(next);
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= SPAWN_EVERY {
            self.spawn_timer -= SPAWN_EVERY;
            let kind = match self.state.rng.random_range(0..3) {
                0 => EnemyKind::Drone,
                1 => EnemyKind::Brute,
                _ => EnemyKind::Dart,
            };
            let edge = self.state.arena.as_vec2() - Vec2::ONE;
            let pos = if self.state.rng.random::<bool>() {
                Vec2::new(self.state.rng.random_range(0.0..edge.x), 0.0)
            } else {
                Vec2::new(0.0, self.state.rng.random_range(0.0..edge.y))
            };
            self.state.spawn_enemy(kind, pos);
        }

        if !self.boss_spawned && self.state.elapsed >= BOSS_AT {
            self.boss_spawned = true;
            let pos = Vec2::new(self.state.arena_center().x, 3.0);
            self.state.spawn_boss(pos);
            self.input.abilities.push(Ability::Emp);
            self.input.camera.push(CameraIntent::AdjustZoom(-0.25));
        }

        while self.state.pending_upgrades > 0 {
            let upgrade = UPGRADE_PLAN[self.upgrades_taken % UPGRADE_PLAN.len()];
            if !self.state.apply_upgrade(upgrade) {
                break;
            }
            self.upgrades_taken += 1;
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.script(dt);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = TickInput::default();
        }

        // Audio and feedback collaborators drain once per frame
        self.sounds_played += self.state.drain_sounds().len();
        for event in self.state.drain_events() {
            match event {
                GameEvent::BossPhaseChanged { phase } => log::info!("Boss entered phase {}", phase),
                GameEvent::TerminalCompleted { id } => log::info!("Terminal {} captured", id),
                GameEvent::LevelUp { level } => log::debug!("Level {}", level),
                _ => {}
            }
        }
    }
}

fn load_settings(path: Option<&str>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => Settings::from_json_or_default(&json),
        Err(err) => {
            log::warn!("Could not read {} ({}), using defaults", path, err);
            Settings::default()
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0xC011);
    let settings = load_settings(args.get(2).map(String::as_str));
    log::info!(
        "Neon Coil headless run: seed {}, difficulty {}",
        seed,
        settings.difficulty.as_str()
    );

    let mut game = Game::new(seed, settings);
    let frames = (RUN_SECONDS / FRAME_DT) as u32;
    for _ in 0..frames {
        game.update(FRAME_DT);
        if game.state.phase == GamePhase::GameOver {
            break;
        }
    }

    let hud = HudView::from_state(&game.state);
    log::info!(
        "Finished after {:.1}s: score {}, level {}, kills {}, length {}, threat {}",
        game.state.elapsed,
        hud.score,
        hud.level,
        hud.kills,
        hud.length,
        hud.threat.as_str()
    );
    for slot in &hud.weapons {
        log::info!(
            "  {} lv{} ({:.0}% cooling)",
            slot.kind.as_str(),
            slot.level,
            slot.cooldown * 100.0
        );
    }
    if let Some(reason) = game.state.failure {
        log::info!("Run ended: {}", reason.as_str());
    }
    log::info!(
        "{} sounds played, boss defeated: {}, camera zoom {:.2}",
        game.sounds_played,
        game.state.boss_defeated,
        game.state.camera.transform.zoom
    );
}
