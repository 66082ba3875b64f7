//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod ballistics;
pub mod cards;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod state;
pub mod tick;
pub mod wave;

pub use cards::{CARD_POOL, Card, card_by_id};
pub use enemy::{DeathOutcome, choose_attack};
pub use state::{
    BossState, CombatState, Enemy, EnemyKind, GameEvent, GamePhase, GameState, Meteor,
    NormalState, Player, PlayerStats, Projectile, WARNING_MUTATION, WARNING_USE_MANA, Warning,
    WaveState,
};
pub use tick::{Intent, select_card, tick};
