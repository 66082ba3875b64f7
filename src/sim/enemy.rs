//! Enemy and boss behavior
//!
//! Normal enemies walk toward the player and switch to their attack pose in
//! melee range. A dying normal enemy may instead mutate into the boss, which
//! runs a timed state machine with randomly chosen attacks.

use rand::Rng;
use rand_pcg::Pcg32;

use super::ballistics::spawn_meteor_volley;
use super::collision::hurt_player;
use super::state::{
    BossState, Enemy, EnemyKind, GameEvent, GameState, Meteor, NormalState, Player,
    WARNING_MUTATION,
};
use crate::consts::*;
use crate::sign_toward;

/// Boss state timings, in ticks
const PULSE_TICKS: u32 = 120;
const MORPH_FRAME_TICKS: u32 = 10;
const MORPH_FIRST_FRAME: u32 = 4;
const MORPH_LAST_FRAME: u32 = 10;
const WAIT_TICKS: u32 = 42;
const SWORD_SWING_TICK: u32 = 20;
const SWORD_END_TICK: u32 = 40;
const MANA_DRAIN_INTERVAL: u32 = 5;
const MANA_DRAIN_AMOUNT: f32 = 2.0;
const MANA_BURST_FRACTION: f32 = 0.35;
const MANA_END_TICK: u32 = 90;
const METEOR_CAST_TICK: u32 = 30;
const METEOR_END_TICK: u32 = 60;

/// Boss sprite frames
const FRAME_IDLE: u32 = 10;
const FRAME_SWORD_READY: u32 = 0;
const FRAME_SWORD_SWING: u32 = 1;
const FRAME_METEOR: u32 = 3;
const FRAME_MANA: u32 = 4;

const MUTATION_WARNING_TICKS: u32 = 180;

/// What happened to an enemy whose hp reached zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// Removed and counted as a kill
    Killed,
    /// Became the boss; every other normal enemy evaporated
    Mutated,
}

/// Everything a boss touches besides itself
struct BossContext<'a> {
    player: &'a mut Player,
    meteors: &'a mut Vec<Meteor>,
    rng: &'a mut Pcg32,
    events: &'a mut Vec<GameEvent>,
    revealed_hp: f32,
}

/// Advance every enemy by one tick
pub fn update_enemies(state: &mut GameState) {
    let player_x = state.player.center().x;
    let revealed_hp = state.tuning.boss_hp(state.wave.wave);
    let GameState {
        enemies,
        player,
        meteors,
        rng,
        events,
        ..
    } = state;
    let mut ctx = BossContext {
        player,
        meteors,
        rng,
        events,
        revealed_hp,
    };

    for enemy in enemies.iter_mut() {
        enemy.hit_flash = enemy.hit_flash.saturating_sub(1);
        let dx = player_x - enemy.center().x;
        match enemy.kind {
            EnemyKind::Normal(_) => update_normal(enemy, dx),
            EnemyKind::Boss(boss_state) => update_boss(enemy, boss_state, dx, &mut ctx),
        }
    }
}

fn update_normal(enemy: &mut Enemy, dx: f32) {
    if dx.abs() > ENEMY_MELEE_RANGE {
        enemy.kind = EnemyKind::Normal(NormalState::Walk);
        enemy.facing_right = dx > 0.0;
        enemy.pos.x += sign_toward(dx) * ENEMY_SPEED;
        enemy.walk_timer += 0.1;
    } else if enemy.kind != EnemyKind::Normal(NormalState::Attack) {
        enemy.kind = EnemyKind::Normal(NormalState::Attack);
        enemy.attack_frame = 0.0;
    } else {
        // Two attack frames, cycled
        enemy.attack_frame = (enemy.attack_frame + 0.1) % 2.0;
    }
}

fn enter(enemy: &mut Enemy, next: BossState, frame: u32) {
    log::debug!("boss {} -> {:?}", enemy.id, next);
    enemy.kind = EnemyKind::Boss(next);
    enemy.timer = 0;
    enemy.anim_frame = frame;
}

fn update_boss(enemy: &mut Enemy, boss_state: BossState, dx: f32, ctx: &mut BossContext<'_>) {
    enemy.timer += 1;
    match boss_state {
        BossState::TransformingPulse => {
            ctx.player.paralyzed = true;
            if enemy.timer > PULSE_TICKS {
                enter(enemy, BossState::TransformingMorph, MORPH_FIRST_FRAME);
            }
        }
        BossState::TransformingMorph => {
            if enemy.timer % MORPH_FRAME_TICKS == 0 {
                enemy.anim_frame += 1;
                if enemy.anim_frame > MORPH_LAST_FRAME {
                    let frame = enemy.anim_frame;
                    enter(enemy, BossState::TransformingWait, frame);
                }
            }
        }
        BossState::TransformingWait => {
            if enemy.timer > WAIT_TICKS {
                enter(enemy, BossState::Idle, FRAME_IDLE);
                ctx.player.paralyzed = false;
                enemy.hp = ctx.revealed_hp;
                enemy.max_hp = ctx.revealed_hp;
                log::info!("Boss {} revealed with {} hp", enemy.id, enemy.hp);
            }
        }
        BossState::Idle => {
            enemy.facing_right = dx > 0.0;
            if dx.abs() > BOSS_CHASE_RANGE {
                enemy.pos.x += sign_toward(dx) * BOSS_SPEED;
                enemy.walk_timer += 0.2;
            }
            if enemy.timer > BOSS_ATTACK_INTERVAL {
                let (next, frame) = choose_attack(dx.abs(), ctx.rng.random::<f32>());
                enter(enemy, next, frame);
            }
        }
        BossState::AttackSword => {
            if enemy.timer > SWORD_SWING_TICK {
                enemy.anim_frame = FRAME_SWORD_SWING;
                let dy = ctx.player.pos.y - enemy.pos.y;
                if dx.abs() < BOSS_SWORD_REACH && dy.abs() < BOSS_SWORD_REACH {
                    hurt_player(ctx.player, ctx.events);
                }
            }
            if enemy.timer > SWORD_END_TICK {
                enter(enemy, BossState::Idle, FRAME_IDLE);
            }
        }
        BossState::AttackMana => {
            ctx.player.paralyzed = true;
            if enemy.timer % MANA_DRAIN_INTERVAL == 0 && ctx.player.mana > 0.0 {
                ctx.player.drain_mana(MANA_DRAIN_AMOUNT);
            }
            if enemy.timer > MANA_END_TICK {
                let burst = ctx.player.stats.max_mana * MANA_BURST_FRACTION;
                ctx.player.drain_mana(burst);
                ctx.player.paralyzed = false;
                enter(enemy, BossState::Idle, FRAME_IDLE);
            }
        }
        BossState::AttackMeteor => {
            if enemy.timer == METEOR_CAST_TICK {
                spawn_meteor_volley(ctx.meteors, &mut *ctx.rng, METEORS_PER_ATTACK);
            }
            if enemy.timer > METEOR_END_TICK {
                enter(enemy, BossState::Idle, FRAME_IDLE);
            }
        }
    }
}

/// Pick the next boss attack from the distance to the player and a roll in [0, 1)
pub fn choose_attack(distance: f32, roll: f32) -> (BossState, u32) {
    if distance < BOSS_MELEE_RANGE {
        if roll < 0.7 {
            (BossState::AttackSword, FRAME_SWORD_READY)
        } else {
            (BossState::AttackMana, FRAME_MANA)
        }
    } else if roll < 0.6 {
        (BossState::AttackMeteor, FRAME_METEOR)
    } else {
        (BossState::AttackMana, FRAME_MANA)
    }
}

/// Apply the death rules to the enemy at `index`, whose hp reached zero
pub fn resolve_enemy_death(state: &mut GameState, index: usize) -> DeathOutcome {
    let can_mutate = !state.enemies[index].is_boss()
        && !state.wave.boss_appeared
        && state.wave.wave >= state.tuning.mutation_min_wave;

    if can_mutate && state.rng.random::<f32>() < state.tuning.mutation_chance {
        mutate(state, index);
        DeathOutcome::Mutated
    } else {
        kill(state, index);
        DeathOutcome::Killed
    }
}

fn mutate(state: &mut GameState, index: usize) {
    let enemy = &mut state.enemies[index];
    enemy.mutate_into_boss();
    let id = enemy.id;
    state.wave.boss_appeared = true;
    state.events.push(GameEvent::EnemyMutated { id });
    state.raise_warning(WARNING_MUTATION, MUTATION_WARNING_TICKS);

    let GameState {
        enemies,
        events,
        wave,
        ..
    } = state;
    enemies.retain(|e| {
        if e.is_boss() {
            return true;
        }
        events.push(GameEvent::EnemyEvaporated { id: e.id });
        wave.kills += 1;
        false
    });
    log::info!(
        "Enemy {} mutated on wave {} (kills {}/{})",
        id,
        state.wave.wave,
        state.wave.kills,
        state.wave.kill_target
    );
}

fn kill(state: &mut GameState, index: usize) {
    let enemy = state.enemies.remove(index);
    state.wave.kills += 1;
    state.events.push(GameEvent::EnemyKilled { id: enemy.id });
    if enemy.is_boss() {
        // Only the boss paralyzes; a kill mid-drain must not leave the player stuck
        state.player.paralyzed = false;
        log::info!("Boss {} defeated on wave {}", enemy.id, state.wave.wave);
    }

    let vampirism = state.player.stats.vampirism;
    // hp 0 earlier this tick is final; vampirism never revives
    if vampirism > 0.0
        && state.player.hp > 0
        && state.rng.random::<f32>() < vampirism
        && state.player.hp < state.player.stats.max_hp
    {
        state.player.heal(1);
        state.events.push(GameEvent::PlayerHealed {
            hp: state.player.hp,
        });
    }
}
