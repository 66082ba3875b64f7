//! Crazy Wizard - side-view wave survival game core
//!
//! Core modules:
//! - `sim`: Tick-driven simulation (player, enemies, boss, collisions, waves, cards)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Speeds and accelerations are expressed per tick, assuming ~60 ticks/second.
pub mod consts {
    /// Nominal simulation step used by hosts that drive `tick` from wall time
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    pub const GROUND_Y: f32 = 550.0;
    /// Width of the walls on both sides of the playfield
    pub const WALL_WIDTH: f32 = 40.0;

    /// Downward acceleration (units/tick²)
    pub const GRAVITY: f32 = 0.5;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 24.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    /// Staff equip/unequip tween step per tick
    pub const EQUIP_SPEED: f32 = 0.15;
    /// Attack animation advance per tick (4-step cycle)
    pub const ATTACK_FRAME_STEP: f32 = 0.25;
    /// Attack frame at which the projectile leaves the staff
    pub const ATTACK_FIRE_FRAME: f32 = 3.0;
    pub const ATTACK_END_FRAME: f32 = 4.0;
    /// Distance from player center to the staff tip
    pub const STAFF_LENGTH: f32 = 50.0;
    /// Stick aim projects the target this far from the player
    pub const STICK_AIM_DISTANCE: f32 = 200.0;
    /// Dead zones for analog input
    pub const MOVE_DEADZONE: f32 = 0.2;
    pub const AIM_DEADZONE: f32 = 0.1;

    /// Damage feedback
    pub const INVULNERABILITY_TICKS: u32 = 60;
    pub const HIT_FLASH_TICKS: u32 = 10;

    /// Normal enemy
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 70.0;
    pub const ENEMY_SPEED: f32 = 0.35;
    pub const ENEMY_MELEE_RANGE: f32 = 30.0;
    pub const ENEMY_SPAWN_OFFSET: f32 = 50.0;
    pub const KNOCKBACK: f32 = 5.0;

    /// Boss
    pub const BOSS_WIDTH: f32 = 50.0;
    pub const BOSS_HEIGHT: f32 = 100.0;
    pub const BOSS_SPEED: f32 = 0.8;
    pub const BOSS_CHASE_RANGE: f32 = 40.0;
    pub const BOSS_ATTACK_INTERVAL: u32 = 80;
    pub const BOSS_MELEE_RANGE: f32 = 120.0;
    pub const BOSS_SWORD_REACH: f32 = 100.0;
    pub const METEORS_PER_ATTACK: usize = 5;

    /// Contact damage vertical tolerance
    pub const CONTACT_VERTICAL_RANGE: f32 = 50.0;
    /// Meteor splash radius on ground impact
    pub const METEOR_SPLASH_RADIUS: f32 = 80.0;
    pub const SCREEN_SHAKE_TICKS: u32 = 10;

    /// Minimum ticks between enemy spawns regardless of wave
    pub const MIN_SPAWN_INTERVAL: u32 = 50;
    /// Number of cards offered on wave clear
    pub const CARDS_OFFERED: usize = 3;
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit direction for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// -1.0 or 1.0 depending on the sign of `dx` (zero counts as negative)
#[inline]
pub fn sign_toward(dx: f32) -> f32 {
    if dx > 0.0 { 1.0 } else { -1.0 }
}
