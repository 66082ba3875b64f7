//! Projectile and meteor motion
//!
//! Both integrate linear velocity once per tick. Culling of spent projectiles
//! happens here; meteor ground impacts are resolved by the collision pass.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, Meteor, Projectile};
use crate::consts::*;
use crate::direction;

/// Spawn a projectile from `origin` flying along `angle` using the current stats
pub fn fire_projectile(state: &mut GameState, origin: Vec2, angle: f32) {
    let id = state.next_entity_id();
    let stats = &state.player.stats;
    state.projectiles.push(Projectile {
        id,
        pos: origin,
        vel: direction(angle) * stats.projectile_speed,
        angle,
        frame: 0.0,
        active: true,
        damage: stats.damage,
        size: stats.projectile_size,
        piercing: stats.piercing,
        hit_enemies: Vec::with_capacity(stats.piercing as usize + 1),
    });
    state.events.push(GameEvent::ProjectileFired { id });
}

/// Move projectiles, deactivate those leaving the playfield, drop inactive ones
pub fn advance_projectiles(projectiles: &mut Vec<Projectile>) {
    for p in projectiles.iter_mut() {
        p.pos += p.vel;
        p.frame += 0.5;
        if p.pos.x < 0.0 || p.pos.x > CANVAS_WIDTH || p.pos.y < 0.0 || p.pos.y > CANVAS_HEIGHT {
            p.active = false;
        }
    }
    projectiles.retain(|p| p.active);
}

/// Move meteors; impacts are handled by `collision::resolve_meteor_impacts`
pub fn advance_meteors(meteors: &mut [Meteor]) {
    for m in meteors.iter_mut() {
        m.pos += m.vel;
    }
}

/// Drop a volley of meteors at random positions above the playfield
pub fn spawn_meteor_volley<R: Rng + ?Sized>(meteors: &mut Vec<Meteor>, rng: &mut R, count: usize) {
    for _ in 0..count {
        meteors.push(Meteor {
            pos: Vec2::new(
                rng.random::<f32>() * CANVAS_WIDTH,
                // Staggered heights so they land one after another
                -100.0 - rng.random::<f32>() * 500.0,
            ),
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 2.0,
                8.0 + rng.random::<f32>() * 5.0,
            ),
            size: 20.0 + rng.random::<f32>() * 20.0,
        });
    }
}
