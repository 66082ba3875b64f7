//! Data-driven game balance
//!
//! Defaults reproduce the shipped balance. Hosts may override any subset of
//! fields from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::PlayerStats;

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ticks between spawns before wave scaling
    pub base_spawn_rate: u32,
    /// Spawn interval shrinks by this much per wave
    pub spawn_rate_per_wave: u32,
    /// Kill target of the first wave
    pub first_wave_kill_target: u32,
    /// Kill target is `kill_target_base + kill_target_per_wave * wave` after a clear
    pub kill_target_base: u32,
    pub kill_target_per_wave: u32,
    /// Normal enemy hp is `enemy_base_hp + enemy_hp_per_wave * wave`
    pub enemy_base_hp: f32,
    pub enemy_hp_per_wave: f32,
    /// Boss hp is `boss_base_hp + boss_hp_per_wave * wave`
    pub boss_base_hp: f32,
    pub boss_hp_per_wave: f32,
    /// Chance a dying enemy mutates into the boss
    pub mutation_chance: f32,
    /// Mutations only happen from this wave on
    pub mutation_min_wave: u32,
    /// Stat block the player starts each run with
    pub starting_stats: PlayerStats,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_spawn_rate: 200,
            spawn_rate_per_wave: 10,
            first_wave_kill_target: 5,
            kill_target_base: 5,
            kill_target_per_wave: 3,
            enemy_base_hp: 30.0,
            enemy_hp_per_wave: 8.0,
            boss_base_hp: 200.0,
            boss_hp_per_wave: 50.0,
            mutation_chance: 0.5,
            mutation_min_wave: 2,
            starting_stats: PlayerStats::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.mutation_chance = tuning.mutation_chance.clamp(0.0, 1.0);
        Ok(tuning)
    }

    /// Load tuning from a file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Invalid tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read tuning file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Ticks the spawn timer must exceed before the next spawn
    pub fn spawn_threshold(&self, wave: u32) -> u32 {
        self.base_spawn_rate
            .saturating_sub(self.spawn_rate_per_wave * wave)
            .max(crate::consts::MIN_SPAWN_INTERVAL)
    }

    /// Kill target for a wave reached by clearing the previous one
    pub fn kill_target(&self, wave: u32) -> u32 {
        self.kill_target_base + self.kill_target_per_wave * wave
    }

    pub fn enemy_hp(&self, wave: u32) -> f32 {
        self.enemy_base_hp + self.enemy_hp_per_wave * wave as f32
    }

    pub fn boss_hp(&self, wave: u32) -> f32 {
        self.boss_base_hp + self.boss_hp_per_wave * wave as f32
    }
}
