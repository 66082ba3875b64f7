//! Collision detection and response
//!
//! Each entity pair has its own rule: enemy bodies hurt the player on
//! contact, projectiles damage enemies (with piercing), and meteors splash
//! the player when they hit the ground.

use super::enemy::{DeathOutcome, resolve_enemy_death};
use super::state::{Enemy, GameEvent, GameState, Player, Projectile};
use crate::consts::*;

/// Deal one point of damage unless the player is invulnerable.
///
/// Returns whether the hit landed.
pub fn hurt_player(player: &mut Player, events: &mut Vec<GameEvent>) -> bool {
    if player.invulnerability > 0 {
        return false;
    }
    player.hp = player.hp.saturating_sub(1);
    player.invulnerability = INVULNERABILITY_TICKS;
    player.hit_flash = HIT_FLASH_TICKS;
    events.push(GameEvent::PlayerDamaged { hp: player.hp });
    true
}

/// Whether an enemy body overlaps the player closely enough to hurt
pub fn touches_player(player: &Player, enemy: &Enemy) -> bool {
    let delta = player.center() - enemy.center();
    delta.x.abs() < (player.size.x + enemy.size.x) / 2.0
        && delta.y.abs() < CONTACT_VERTICAL_RANGE
}

/// Contact damage from enemy bodies
pub fn resolve_contact_damage(state: &mut GameState) {
    let GameState {
        player,
        enemies,
        events,
        ..
    } = state;
    if player.paralyzed {
        return;
    }
    for enemy in enemies.iter() {
        if touches_player(player, enemy) {
            hurt_player(player, events);
        }
    }
}

/// Apply every projectile overlapping `enemy`; returns whether it died
fn strike_enemy(enemy: &mut Enemy, projectiles: &mut [Projectile]) -> bool {
    // Immune through all three transforming states, the final wait included
    if enemy.boss_state().is_some_and(|s| s.is_transforming()) {
        return false;
    }

    let is_boss = enemy.is_boss();
    for p in projectiles.iter_mut().filter(|p| p.active) {
        if p.has_hit(enemy.id) || !enemy.contains(p.pos) {
            continue;
        }

        enemy.hp -= p.damage;
        enemy.hit_flash = HIT_FLASH_TICKS;
        if !is_boss {
            enemy.pos.x += if p.vel.x > 0.0 { KNOCKBACK } else { -KNOCKBACK };
        }
        p.hit_enemies.push(enemy.id);
        if p.piercing > 0 {
            p.piercing -= 1;
        } else {
            p.active = false;
        }

        if enemy.hp <= 0.0 {
            return true;
        }
    }
    false
}

/// Projectile hits against every enemy, including deaths and mutation
pub fn resolve_projectile_hits(state: &mut GameState) {
    let mut i = 0;
    while i < state.enemies.len() {
        let died = strike_enemy(&mut state.enemies[i], &mut state.projectiles);
        if !died {
            i += 1;
            continue;
        }

        let id = state.enemies[i].id;
        match resolve_enemy_death(state, i) {
            // The next enemy slid into slot `i`
            DeathOutcome::Killed => {}
            // Everything else evaporated; continue after the new boss
            DeathOutcome::Mutated => {
                i = state
                    .enemies
                    .iter()
                    .position(|e| e.id == id)
                    .map_or(state.enemies.len(), |pos| pos + 1);
            }
        }
    }
    state.projectiles.retain(|p| p.active);
}

/// Meteors that reached the ground: splash the player, shake, remove
pub fn resolve_meteor_impacts(state: &mut GameState) {
    let GameState {
        meteors,
        player,
        events,
        screen_shake,
        ..
    } = state;
    let player_x = player.center().x;
    meteors.retain(|m| {
        if m.pos.y < GROUND_Y {
            return true;
        }
        *screen_shake = SCREEN_SHAKE_TICKS;
        events.push(GameEvent::MeteorImpact { x: m.pos.x });
        if (player_x - m.pos.x).abs() < METEOR_SPLASH_RADIUS {
            hurt_player(player, events);
        }
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BossState, EnemyKind, Meteor};
    use glam::Vec2;

    fn add_enemy(state: &mut GameState, x: f32, hp: f32) -> u32 {
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Vec2::new(x, GROUND_Y - ENEMY_HEIGHT), hp, true, 0.0));
        id
    }

    fn add_projectile(state: &mut GameState, pos: Vec2, piercing: u32) {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel: Vec2::new(5.0, 0.0),
            angle: 0.0,
            frame: 0.0,
            active: true,
            damage: 15.0,
            size: 1.0,
            piercing,
            hit_enemies: Vec::new(),
        });
    }

    /// A point inside an enemy spawned by `add_enemy` at `x`
    fn inside(x: f32) -> Vec2 {
        Vec2::new(x + ENEMY_WIDTH / 2.0, GROUND_Y - ENEMY_HEIGHT / 2.0)
    }

    #[test]
    fn test_contact_damage_and_invulnerability() {
        let mut state = GameState::new(1);
        let px = state.player.center().x;
        add_enemy(&mut state, px - ENEMY_WIDTH / 2.0, 30.0);

        resolve_contact_damage(&mut state);
        assert_eq!(state.player.hp, 2);
        assert_eq!(state.player.invulnerability, INVULNERABILITY_TICKS);
        assert_eq!(state.player.hit_flash, HIT_FLASH_TICKS);

        resolve_contact_damage(&mut state);
        assert_eq!(state.player.hp, 2);
    }

    #[test]
    fn test_no_contact_damage_while_paralyzed() {
        let mut state = GameState::new(1);
        let px = state.player.center().x;
        add_enemy(&mut state, px - ENEMY_WIDTH / 2.0, 30.0);
        state.player.paralyzed = true;
        resolve_contact_damage(&mut state);
        assert_eq!(state.player.hp, 3);
    }

    #[test]
    fn test_no_contact_when_jumping_over() {
        let mut state = GameState::new(1);
        let px = state.player.center().x;
        add_enemy(&mut state, px - ENEMY_WIDTH / 2.0, 30.0);
        state.player.pos.y -= 80.0;
        resolve_contact_damage(&mut state);
        assert_eq!(state.player.hp, 3);
    }

    #[test]
    fn test_projectile_hit_and_knockback() {
        let mut state = GameState::new(1);
        let id = add_enemy(&mut state, 100.0, 30.0);
        add_projectile(&mut state, inside(100.0), 0);

        resolve_projectile_hits(&mut state);
        let enemy = &state.enemies[0];
        assert_eq!(enemy.id, id);
        assert_eq!(enemy.hp, 15.0);
        assert_eq!(enemy.pos.x, 100.0 + KNOCKBACK);
        assert_eq!(enemy.hit_flash, HIT_FLASH_TICKS);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_kill_counts() {
        let mut state = GameState::new(1);
        add_enemy(&mut state, 100.0, 10.0);
        add_projectile(&mut state, inside(100.0), 0);
        resolve_projectile_hits(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.wave.kills, 1);
    }

    #[test]
    fn test_piercing_two_strikes_three() {
        let mut state = GameState::new(1);
        for x in [100.0, 105.0, 110.0, 115.0] {
            add_enemy(&mut state, x, 1000.0);
        }
        add_projectile(&mut state, Vec2::new(130.0, GROUND_Y - 30.0), 2);

        resolve_projectile_hits(&mut state);
        assert!(state.projectiles.is_empty());
        let struck = state.enemies.iter().filter(|e| e.hp < 1000.0).count();
        assert_eq!(struck, 3);
        assert_eq!(state.enemies[3].hp, 1000.0);
    }

    #[test]
    fn test_no_double_hit_same_enemy() {
        let mut state = GameState::new(1);
        add_enemy(&mut state, 100.0, 1000.0);
        add_projectile(&mut state, inside(100.0), 5);

        for _ in 0..5 {
            resolve_projectile_hits(&mut state);
        }
        assert_eq!(state.enemies[0].hp, 985.0);
        let p = &state.projectiles[0];
        assert_eq!(p.hit_enemies.len(), 1);
        assert_eq!(p.piercing, 4);
    }

    #[test]
    fn test_transforming_boss_ignores_hits() {
        let mut state = GameState::new(1);
        add_enemy(&mut state, 100.0, 30.0);
        state.enemies[0].mutate_into_boss();
        for s in [
            BossState::TransformingPulse,
            BossState::TransformingMorph,
            BossState::TransformingWait,
        ] {
            state.enemies[0].kind = EnemyKind::Boss(s);
            add_projectile(&mut state, Vec2::new(125.0, GROUND_Y - 50.0), 0);
            resolve_projectile_hits(&mut state);
            assert_eq!(state.enemies[0].hp, 1.0);
            assert_eq!(state.projectiles.len(), 1);
            assert!(state.projectiles[0].hit_enemies.is_empty());
            state.projectiles.clear();
        }

        // Revealed boss takes damage but no knockback
        state.enemies[0].kind = EnemyKind::Boss(BossState::Idle);
        state.enemies[0].hp = 300.0;
        let x = state.enemies[0].pos.x;
        add_projectile(&mut state, Vec2::new(125.0, GROUND_Y - 50.0), 0);
        resolve_projectile_hits(&mut state);
        assert_eq!(state.enemies[0].hp, 285.0);
        assert_eq!(state.enemies[0].pos.x, x);
    }

    #[test]
    fn test_mutation_through_projectile() {
        // Scan seeds until the kill mutates, then check bookkeeping
        for seed in 0..100 {
            let mut state = GameState::new(seed);
            state.wave.wave = 2;
            add_enemy(&mut state, 100.0, 10.0);
            let target = add_enemy(&mut state, 300.0, 10.0);
            add_enemy(&mut state, 500.0, 10.0);
            add_projectile(&mut state, inside(300.0), 0);
            resolve_projectile_hits(&mut state);

            if state.wave.boss_appeared {
                assert_eq!(state.enemies.len(), 1);
                assert_eq!(state.enemies[0].id, target);
                assert!(state.enemies[0].is_boss());
                assert_eq!(state.wave.kills, 2);
                return;
            }
            assert_eq!(state.enemies.len(), 2);
            assert_eq!(state.wave.kills, 1);
        }
        panic!("no mutation in 100 seeds");
    }

    #[test]
    fn test_meteor_splash() {
        let mut state = GameState::new(1);
        let px = state.player.center().x;
        state.meteors.push(Meteor {
            pos: Vec2::new(px + 50.0, GROUND_Y + 3.0),
            vel: Vec2::new(0.0, 10.0),
            size: 30.0,
        });
        state.meteors.push(Meteor {
            pos: Vec2::new(px + 300.0, GROUND_Y + 1.0),
            vel: Vec2::new(0.0, 10.0),
            size: 30.0,
        });
        state.meteors.push(Meteor {
            pos: Vec2::new(px, 100.0),
            vel: Vec2::new(0.0, 10.0),
            size: 30.0,
        });

        resolve_meteor_impacts(&mut state);
        assert_eq!(state.meteors.len(), 1);
        assert_eq!(state.player.hp, 2);
        assert_eq!(state.screen_shake, SCREEN_SHAKE_TICKS);
        let impacts = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::MeteorImpact { .. }))
            .count();
        assert_eq!(impacts, 2);
    }

    #[test]
    fn test_hurt_player_floors_at_zero() {
        let mut player = Player::new(Default::default());
        let mut events = Vec::new();
        for _ in 0..5 {
            player.invulnerability = 0;
            hurt_player(&mut player, &mut events);
        }
        assert_eq!(player.hp, 0);
    }
}
