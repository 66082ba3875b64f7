//! Player controller
//!
//! Turns the per-tick intent into movement, staff handling, attacks and mana
//! charging. Physics runs every tick, paralyzed or not.

use glam::Vec2;

use super::ballistics::fire_projectile;
use super::state::{CombatState, GameEvent, GameState, Player, WARNING_USE_MANA};
use super::tick::Intent;
use crate::consts::*;
use crate::{angle_between, direction};

/// Ticks the "use remaining mana" warning stays up
const USE_MANA_WARNING_TICKS: u32 = 60;

/// Advance the player by one tick
pub fn update_player(state: &mut GameState, input: &Intent) {
    if state.player.paralyzed {
        let player = &mut state.player;
        player.combat = CombatState::Idle;
        player.mana_full = false;
    } else {
        apply_aim(&mut state.player, input);
        update_charge(state, input);
        try_start_attack(&mut state.player, input);
        apply_movement(&mut state.player, input);
        if let Some((origin, angle)) = advance_attack(&mut state.player) {
            fire_projectile(state, origin, angle);
        }
    }

    let player = &mut state.player;
    apply_physics(player);
    update_staff_tween(player);
    player.hit_flash = player.hit_flash.saturating_sub(1);
    player.invulnerability = player.invulnerability.saturating_sub(1);
}

/// Stick aim overrides the pointer target and pulls the staff out
fn apply_aim(player: &mut Player, input: &Intent) {
    if input.equip_toggle {
        player.staff_equipped = !player.staff_equipped;
    }

    if input.aim_x.abs() > AIM_DEADZONE || input.aim_y.abs() > AIM_DEADZONE {
        player.aim_target = player.center() + Vec2::new(input.aim_x, input.aim_y) * STICK_AIM_DISTANCE;
        player.staff_equipped = true;
    } else if let Some(target) = input.aim_target {
        player.aim_target = target;
    }
}

fn update_charge(state: &mut GameState, input: &Intent) {
    let player = &mut state.player;
    let mut refused = false;

    if input.charge {
        if player.combat == CombatState::Idle {
            if player.mana < player.stats.mana_cost {
                player.combat = CombatState::Charging;
            } else {
                refused = true;
            }
        }
    } else if player.is_charging() {
        player.combat = CombatState::Idle;
    }

    if player.is_charging() {
        player.staff_equipped = true;
        let max = player.stats.max_mana;
        if player.mana < max {
            player.mana += player.stats.mana_charge_speed;
            if player.mana >= max {
                player.mana = max;
                if !player.mana_full {
                    player.mana_full = true;
                    state.events.push(GameEvent::ManaFull);
                }
            } else {
                player.mana_full = false;
            }
        }
    } else {
        player.mana_full = false;
    }

    if refused {
        state.raise_warning(WARNING_USE_MANA, USE_MANA_WARNING_TICKS);
    }
}

fn try_start_attack(player: &mut Player, input: &Intent) {
    if input.shoot
        && player.staff_equipped
        && player.combat == CombatState::Idle
        && player.mana >= player.stats.mana_cost
    {
        player.combat = CombatState::Attacking { frame: 0.0 };
    }
}

fn apply_movement(player: &mut Player, input: &Intent) {
    let left = input.move_x < -MOVE_DEADZONE;
    let right = input.move_x > MOVE_DEADZONE;
    let moving = left || right;

    if player.staff_equipped && !player.is_charging() {
        player.facing_right = player.aim_target.x >= player.center().x;
    } else if right {
        player.facing_right = true;
    } else if left {
        player.facing_right = false;
    }

    if moving && player.grounded {
        player.walk_frame += 0.2;
    } else {
        player.walk_frame = 0.0;
    }

    if left {
        player.pos.x -= player.stats.move_speed;
    }
    if right {
        player.pos.x += player.stats.move_speed;
    }

    if input.jump && player.grounded {
        player.vy = player.stats.jump_force;
        player.grounded = false;
    }
}

/// Step the swing; returns the muzzle point and angle on the firing tick
fn advance_attack(player: &mut Player) -> Option<(Vec2, f32)> {
    let CombatState::Attacking { frame } = player.combat else {
        return None;
    };

    let next = frame + ATTACK_FRAME_STEP;
    let mut shot = None;
    if frame.floor() < ATTACK_FIRE_FRAME && next.floor() >= ATTACK_FIRE_FRAME {
        let center = player.center();
        let angle = angle_between(center, player.aim_target);
        let muzzle = center + direction(angle) * STAFF_LENGTH + Vec2::new(0.0, 10.0);
        player.drain_mana(player.stats.mana_cost);
        shot = Some((muzzle, angle));
    }

    player.combat = if next >= ATTACK_END_FRAME {
        CombatState::Idle
    } else {
        CombatState::Attacking { frame: next }
    };
    shot
}

fn apply_physics(player: &mut Player) {
    player.vy += GRAVITY;
    player.pos.y += player.vy;
    if player.pos.y + player.size.y >= GROUND_Y {
        player.pos.y = GROUND_Y - player.size.y;
        player.vy = 0.0;
        player.grounded = true;
    } else {
        player.grounded = false;
    }

    player.pos.x = player
        .pos
        .x
        .clamp(WALL_WIDTH, CANVAS_WIDTH - WALL_WIDTH - player.size.x);
}

fn update_staff_tween(player: &mut Player) {
    let target = if player.staff_equipped { 1.0 } else { 0.0 };
    if player.staff_anim < target {
        player.staff_anim = (player.staff_anim + EQUIP_SPEED).min(target);
    } else if player.staff_anim > target {
        player.staff_anim = (player.staff_anim - EQUIP_SPEED).max(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_mana_full(state: &GameState) -> usize {
        state
            .events
            .iter()
            .filter(|e| **e == GameEvent::ManaFull)
            .count()
    }

    #[test]
    fn test_gravity_and_jump() {
        let mut state = GameState::new(1);
        let jump = Intent {
            jump: true,
            ..Default::default()
        };
        update_player(&mut state, &jump);
        assert!(!state.player.grounded);
        // Jump impulse then one tick of gravity
        assert_eq!(state.player.vy, -9.5);

        let idle = Intent::default();
        for _ in 0..100 {
            update_player(&mut state, &idle);
        }
        assert!(state.player.grounded);
        assert_eq!(state.player.vy, 0.0);
        assert_eq!(state.player.pos.y + state.player.size.y, GROUND_Y);
    }

    #[test]
    fn test_walls_clamp() {
        let mut state = GameState::new(1);
        let left = Intent {
            move_x: -1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            update_player(&mut state, &left);
        }
        assert_eq!(state.player.pos.x, WALL_WIDTH);
        assert!(!state.player.facing_right);

        let right = Intent {
            move_x: 1.0,
            ..Default::default()
        };
        for _ in 0..300 {
            update_player(&mut state, &right);
        }
        assert_eq!(state.player.pos.x, CANVAS_WIDTH - WALL_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_small_stick_motion_ignored() {
        let mut state = GameState::new(1);
        let x = state.player.pos.x;
        let nudge = Intent {
            move_x: 0.15,
            ..Default::default()
        };
        update_player(&mut state, &nudge);
        assert_eq!(state.player.pos.x, x);
    }

    #[test]
    fn test_equip_tween() {
        let mut state = GameState::new(1);
        let toggle = Intent {
            equip_toggle: true,
            ..Default::default()
        };
        update_player(&mut state, &toggle);
        assert!(state.player.staff_equipped);
        assert!((state.player.staff_anim - 0.15).abs() < 1e-6);

        for _ in 0..10 {
            update_player(&mut state, &Intent::default());
        }
        assert_eq!(state.player.staff_anim, 1.0);

        update_player(&mut state, &toggle);
        for _ in 0..10 {
            update_player(&mut state, &Intent::default());
        }
        assert_eq!(state.player.staff_anim, 0.0);
    }

    #[test]
    fn test_attack_fires_once() {
        let mut state = GameState::new(1);
        state.player.staff_equipped = true;
        state.player.aim_target = state.player.center() + Vec2::new(100.0, 0.0);
        let shoot = Intent {
            shoot: true,
            ..Default::default()
        };
        update_player(&mut state, &shoot);
        assert!(state.player.is_attacking());

        let mut ticks = 1;
        while state.player.is_attacking() {
            update_player(&mut state, &Intent::default());
            ticks += 1;
        }
        assert_eq!(ticks, 16);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.player.mana, 85.0);
        // Muzzle sits at the staff tip to the right of the player
        let p = &state.projectiles[0];
        assert!(p.pos.x > state.player.center().x + 40.0);
        assert!(p.vel.x > 0.0);
    }

    #[test]
    fn test_attack_needs_staff_and_mana() {
        let mut state = GameState::new(1);
        let shoot = Intent {
            shoot: true,
            ..Default::default()
        };
        update_player(&mut state, &shoot);
        assert_eq!(state.player.combat, CombatState::Idle);

        state.player.staff_equipped = true;
        state.player.mana = 10.0;
        update_player(&mut state, &shoot);
        assert_eq!(state.player.combat, CombatState::Idle);
    }

    #[test]
    fn test_charge_to_full_fires_once() {
        let mut state = GameState::new(1);
        state.player.mana = 0.0;
        let charge = Intent {
            charge: true,
            ..Default::default()
        };

        for _ in 0..333 {
            update_player(&mut state, &charge);
        }
        assert!(state.player.mana < 100.0);
        assert_eq!(count_mana_full(&state), 0);

        update_player(&mut state, &charge);
        assert_eq!(state.player.mana, 100.0);
        assert_eq!(count_mana_full(&state), 1);

        // Keep holding: no repeat
        for _ in 0..200 {
            update_player(&mut state, &charge);
        }
        assert_eq!(count_mana_full(&state), 1);
        assert!(state.player.is_charging());
        assert!(state.player.staff_equipped);
    }

    #[test]
    fn test_charge_refused_with_enough_mana() {
        let mut state = GameState::new(1);
        let charge = Intent {
            charge: true,
            ..Default::default()
        };
        update_player(&mut state, &charge);
        update_player(&mut state, &charge);
        assert_eq!(state.player.combat, CombatState::Idle);
        let warnings = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Warning { .. }))
            .count();
        assert_eq!(warnings, 1);
        assert_eq!(state.warning.as_ref().unwrap().text, WARNING_USE_MANA);
    }

    #[test]
    fn test_release_stops_charging() {
        let mut state = GameState::new(1);
        state.player.mana = 0.0;
        let charge = Intent {
            charge: true,
            ..Default::default()
        };
        update_player(&mut state, &charge);
        assert!(state.player.is_charging());
        update_player(&mut state, &Intent::default());
        assert_eq!(state.player.combat, CombatState::Idle);
    }

    #[test]
    fn test_paralysis_blocks_input_not_physics() {
        let mut state = GameState::new(1);
        state.player.mana = 0.0;
        state.player.combat = CombatState::Charging;
        state.player.paralyzed = true;
        state.player.pos.y -= 100.0;
        state.player.grounded = false;
        let x = state.player.pos.x;
        let busy = Intent {
            move_x: 1.0,
            jump: true,
            charge: true,
            ..Default::default()
        };
        update_player(&mut state, &busy);
        assert_eq!(state.player.combat, CombatState::Idle);
        assert_eq!(state.player.pos.x, x);
        assert_eq!(state.player.mana, 0.0);
        assert_eq!(state.player.vy, GRAVITY);
    }

    #[test]
    fn test_stick_aim_equips_and_faces() {
        let mut state = GameState::new(1);
        let aim = Intent {
            aim_x: -1.0,
            ..Default::default()
        };
        update_player(&mut state, &aim);
        assert!(state.player.staff_equipped);
        assert!(!state.player.facing_right);
    }

    #[test]
    fn test_damage_timers_count_down() {
        let mut state = GameState::new(1);
        state.player.invulnerability = 2;
        state.player.hit_flash = 1;
        update_player(&mut state, &Intent::default());
        update_player(&mut state, &Intent::default());
        update_player(&mut state, &Intent::default());
        assert_eq!(state.player.invulnerability, 0);
        assert_eq!(state.player.hit_flash, 0);
    }
}
