//! Wave pacing: spawn scheduling and wave-clear detection

use glam::Vec2;
use rand::Rng;

use super::cards::{CARD_POOL, sample_cards};
use super::state::{Enemy, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Count the spawn timer up and spawn once it passes the wave's interval
pub fn update_spawner(state: &mut GameState) {
    state.wave.spawn_timer += 1;
    if state.wave.spawn_timer > state.tuning.spawn_threshold(state.wave.wave) {
        spawn_enemy(state);
        state.wave.spawn_timer = 0;
    }
}

/// Spawn a normal enemy at a random playfield edge.
///
/// Nothing spawns while a boss is alive, or once the wave's quota is out
/// (unless the boss already appeared this wave).
pub fn spawn_enemy(state: &mut GameState) -> Option<u32> {
    let wave = &state.wave;
    if wave.spawned >= wave.kill_target && !wave.boss_appeared {
        return None;
    }
    if state.boss_alive() {
        return None;
    }

    let id = state.next_entity_id();
    state.wave.spawned += 1;

    let from_left = state.rng.random_bool(0.5);
    let x = if from_left {
        -ENEMY_SPAWN_OFFSET
    } else {
        CANVAS_WIDTH + ENEMY_SPAWN_OFFSET
    };
    let hp = state.tuning.enemy_hp(state.wave.wave);
    let walk_timer = state.rng.random::<f32>() * 100.0;
    state.enemies.push(Enemy::new(
        id,
        Vec2::new(x, GROUND_Y - ENEMY_HEIGHT),
        hp,
        !from_left,
        walk_timer,
    ));
    state.events.push(GameEvent::EnemySpawned { id });
    log::debug!(
        "Spawned enemy {} ({}/{}) with {} hp",
        id,
        state.wave.spawned,
        state.wave.kill_target,
        hp
    );
    Some(id)
}

/// All of the wave's enemies have spawned and none are left alive
pub fn is_wave_cleared(state: &GameState) -> bool {
    state.wave.spawned >= state.wave.kill_target && state.enemies.is_empty()
}

/// Enter card selection if the wave is over; returns whether it was
pub fn check_wave_clear(state: &mut GameState) -> bool {
    if !is_wave_cleared(state) {
        return false;
    }

    state.offered_cards = sample_cards(&mut state.rng);
    let offered = &state.offered_cards;
    let cards: [&'static str; CARDS_OFFERED] = std::array::from_fn(|i| CARD_POOL[offered[i]].id);
    state.phase = GamePhase::CardSelect;
    state.events.push(GameEvent::WaveCleared {
        wave: state.wave.wave,
        cards,
    });
    log::info!(
        "Wave {} cleared ({} kills), offering {:?}",
        state.wave.wave,
        state.wave.kills,
        cards
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyKind, NormalState};

    #[test]
    fn test_spawn_interval_wave_one() {
        let mut state = GameState::new(1);
        for _ in 0..190 {
            update_spawner(&mut state);
        }
        assert!(state.enemies.is_empty());
        update_spawner(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.wave.spawn_timer, 0);
        assert_eq!(state.wave.spawned, 1);
    }

    #[test]
    fn test_spawn_position_and_hp() {
        let mut state = GameState::new(9);
        state.wave.wave = 3;
        for _ in 0..20 {
            state.wave.spawned = 0;
            spawn_enemy(&mut state);
        }
        for e in &state.enemies {
            assert!(e.pos.x == -ENEMY_SPAWN_OFFSET || e.pos.x == CANVAS_WIDTH + ENEMY_SPAWN_OFFSET);
            assert_eq!(e.pos.y + e.size.y, GROUND_Y);
            assert_eq!(e.hp, 54.0);
            assert_eq!(e.max_hp, 54.0);
        }
        // Both sides show up
        assert!(state.enemies.iter().any(|e| e.pos.x < 0.0));
        assert!(state.enemies.iter().any(|e| e.pos.x > CANVAS_WIDTH));
    }

    #[test]
    fn test_spawn_quota() {
        let mut state = GameState::new(1);
        for _ in 0..5 {
            assert!(spawn_enemy(&mut state).is_some());
        }
        assert!(spawn_enemy(&mut state).is_none());
        assert_eq!(state.wave.spawned, 5);
    }

    #[test]
    fn test_no_spawn_while_boss_alive() {
        let mut state = GameState::new(1);
        spawn_enemy(&mut state);
        state.enemies[0].mutate_into_boss();
        state.wave.boss_appeared = true;
        assert!(spawn_enemy(&mut state).is_none());

        // Boss gone: spawning resumes past the quota
        state.enemies.clear();
        state.wave.spawned = 10;
        assert!(spawn_enemy(&mut state).is_some());
        assert_eq!(state.enemies[0].kind, EnemyKind::Normal(NormalState::Walk));
    }

    #[test]
    fn test_wave_clear_offers_three_cards() {
        let mut state = GameState::new(4);
        state.wave.spawned = 5;
        assert!(check_wave_clear(&mut state));
        assert_eq!(state.phase, GamePhase::CardSelect);
        assert_eq!(state.offered_cards.len(), 3);

        let Some(GameEvent::WaveCleared { wave, cards }) = state.events.last() else {
            panic!("expected WaveCleared");
        };
        assert_eq!(*wave, 1);
        assert_ne!(cards[0], cards[1]);
        assert_ne!(cards[1], cards[2]);
        assert_ne!(cards[0], cards[2]);
    }

    #[test]
    fn test_wave_not_clear_with_enemies_left() {
        let mut state = GameState::new(4);
        for _ in 0..5 {
            spawn_enemy(&mut state);
        }
        assert!(!check_wave_clear(&mut state));
        assert_eq!(state.phase, GamePhase::Playing);
    }
}
