//! Per-tick simulation step
//!
//! Runs every system in a fixed order, once per host frame, and resumes the
//! run after the player picks an upgrade card.

use glam::Vec2;

use super::ballistics::{advance_meteors, advance_projectiles};
use super::cards::CARD_POOL;
use super::collision::{resolve_contact_damage, resolve_meteor_impacts, resolve_projectile_hits};
use super::enemy::update_enemies;
use super::player::update_player;
use super::state::{CombatState, GameEvent, GamePhase, GameState};
use super::wave::{check_wave_clear, update_spawner};

/// Normalized input for a single tick
#[derive(Debug, Clone, Default)]
pub struct Intent {
    /// Horizontal movement axis in [-1, 1]
    pub move_x: f32,
    /// Vertical movement axis in [-1, 1] (unused by the side view, kept for parity)
    pub move_y: f32,
    /// Stick aim axes in [-1, 1]
    pub aim_x: f32,
    pub aim_y: f32,
    pub jump: bool,
    pub shoot: bool,
    /// Held to refill mana
    pub charge: bool,
    /// Flip the staff between hand and back
    pub equip_toggle: bool,
    /// Absolute aim point (mouse), playfield coordinates
    pub aim_target: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick.
///
/// Events accumulate in `state.events`; drain them after every call.
pub fn tick(state: &mut GameState, input: &Intent) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    // Paused, choosing a card, or dead: everything stays frozen
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.screen_shake = state.screen_shake.saturating_sub(1);
    if let Some(warning) = state.warning.as_mut() {
        warning.ttl = warning.ttl.saturating_sub(1);
        if warning.ttl == 0 {
            state.warning = None;
        }
    }

    update_player(state, input);
    update_spawner(state);
    update_enemies(state);

    resolve_contact_damage(state);
    resolve_projectile_hits(state);
    advance_meteors(&mut state.meteors);
    resolve_meteor_impacts(state);
    advance_projectiles(&mut state.projectiles);

    if state.player.hp == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over on wave {} after {} ticks",
            state.wave.wave,
            state.time_ticks
        );
        return;
    }

    check_wave_clear(state);
}

/// Apply the card in `slot` of the current offer and start the next wave.
///
/// Returns false (and changes nothing) outside card selection or for a slot
/// that was not offered.
pub fn select_card(state: &mut GameState, slot: usize) -> bool {
    if state.phase != GamePhase::CardSelect {
        log::warn!("Card selection ignored in phase {:?}", state.phase);
        return false;
    }
    let Some(&index) = state.offered_cards.get(slot) else {
        log::warn!("Card slot {} was not offered", slot);
        return false;
    };

    let card = &CARD_POOL[index];
    (card.apply)(&mut state.player.stats);

    let player = &mut state.player;
    player.hp = player.stats.max_hp;
    player.mana = player.mana.min(player.stats.max_mana);
    player.paralyzed = false;
    player.combat = CombatState::Idle;

    let wave = &mut state.wave;
    wave.wave += 1;
    wave.kills = 0;
    wave.spawned = 0;
    wave.kill_target = state.tuning.kill_target(wave.wave);
    wave.boss_appeared = false;

    state.projectiles.clear();
    state.enemies.clear();
    state.meteors.clear();
    state.offered_cards.clear();
    state.phase = GamePhase::Playing;

    log::info!(
        "Picked {} - wave {} needs {} kills",
        card.name,
        state.wave.wave,
        state.wave.kill_target
    );
    true
}
