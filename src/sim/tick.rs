//! Fixed timestep simulation tick
//!
//! Runs every subsystem in a fixed order against the shared world state:
//! movement, weapons and projectiles, collision, cleanup, then camera.

use super::camera::CameraIntent;
use super::collision::{clear_terminal_signals, update_collisions};
use super::movement::{update_enemies, update_loot, update_player};
use super::projectiles::{update_mines, update_projectiles, update_shockwaves};
use super::state::{Direction, GamePhase, WorldState};
use super::weapons::{Ability, trigger_ability, update_weapons};

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Turns, oldest first
    pub directions: Vec<Direction>,
    /// Ability presses; each is cooldown-gated inside the sim
    pub abilities: Vec<Ability>,
    pub camera: Vec<CameraIntent>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(state: &mut WorldState, input: &TickInput, dt: f32) {
    for &intent in &input.camera {
        state.camera.push(intent);
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at tick {}", state.time_ticks);
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over; the camera still drains its intents
    if state.phase != GamePhase::Playing {
        clear_terminal_signals(state);
        update_camera(state, dt);
        return;
    }

    for &dir in &input.directions {
        state.player.queue_direction(dir);
    }

    state.time_ticks += 1;
    state.elapsed += dt;
    state.decay_timers(dt);
    state.process_deferred(dt);

    for &ability in &input.abilities {
        if !trigger_ability(state, ability) {
            log::debug!("{:?} not ready", ability);
        }
    }

    update_player(state, dt);
    update_enemies(state, dt);
    update_loot(state, dt);

    update_weapons(state, dt);
    update_projectiles(state, dt);
    update_mines(state);
    update_shockwaves(state, dt);

    update_collisions(state, dt);
    state.cleanup();

    update_camera(state, dt);
}

fn update_camera(state: &mut WorldState, dt: f32) {
    let focus = state.player.head_pos();
    let heading = state.player.direction.as_vec2();
    state.camera.update(dt, focus, heading);
}
