//! Crazy Wizard headless runner
//!
//! Drives the simulation with a scripted autopilot at a simulated display
//! rate and prints a JSON summary of the run. Useful for balance checks:
//!
//! ```text
//! RUST_LOG=info crazy-wizard [tuning.json] [seed]
//! ```

use std::path::Path;

use serde::Serialize;

use crazy_wizard::Tuning;
use crazy_wizard::consts::*;
use crazy_wizard::sign_toward;
use crazy_wizard::sim::{GameEvent, GamePhase, GameState, Intent, select_card, tick};

/// Simulated display refresh (deliberately off the sim rate)
const FRAME_DT: f32 = 1.0 / 75.0;
/// Give up after this much simulated time
const MAX_SECONDS: f32 = 600.0;

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    wave_reached: u32,
    kills: u32,
    bosses_defeated: u32,
    mutations: u32,
    projectiles_fired: u32,
    damage_taken: u32,
    cards_picked: Vec<&'static str>,
    game_over: bool,
}

/// Runner holding the state and the accumulator
struct Game {
    state: GameState,
    accumulator: f32,
    input: Intent,
    summary: RunSummary,
}

impl Game {
    fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            accumulator: 0.0,
            input: Intent::default(),
            summary: RunSummary {
                seed,
                ..Default::default()
            },
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input = autopilot(&self.state);
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            self.handle_events();
            if self.state.phase == GamePhase::CardSelect {
                select_card(&mut self.state, 0);
            }
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::EnemyKilled { .. } | GameEvent::EnemyEvaporated { .. } => {
                    self.summary.kills += 1;
                }
                GameEvent::EnemyMutated { id } => {
                    self.summary.mutations += 1;
                    log::info!("Enemy {} mutated", id);
                }
                GameEvent::ProjectileFired { .. } => self.summary.projectiles_fired += 1,
                GameEvent::PlayerDamaged { hp } => {
                    self.summary.damage_taken += 1;
                    log::debug!("Player hit, {} hp left", hp);
                }
                GameEvent::WaveCleared { wave, cards } => {
                    log::info!("Wave {} cleared, taking {}", wave, cards[0]);
                    self.summary.cards_picked.push(cards[0]);
                    if self.state.wave.boss_appeared {
                        self.summary.bosses_defeated += 1;
                    }
                }
                GameEvent::Warning { text, .. } => log::debug!("Warning: {}", text),
                GameEvent::GameOver => self.summary.game_over = true,
                _ => {}
            }
        }
    }
}

/// Scripted input: face the nearest enemy, shoot, back off when close,
/// refill mana whenever nothing is near
fn autopilot(state: &GameState) -> Intent {
    let player = &state.player;
    let center = player.center();
    let nearest = state.enemies.iter().min_by(|a, b| {
        let da = (a.center().x - center.x).abs();
        let db = (b.center().x - center.x).abs();
        da.total_cmp(&db)
    });

    let mut intent = Intent {
        equip_toggle: !player.staff_equipped,
        ..Default::default()
    };
    let Some(target) = nearest else {
        intent.charge = player.mana < player.stats.max_mana;
        return intent;
    };

    let dx = target.center().x - center.x;
    intent.aim_target = Some(target.center());
    intent.shoot = player.mana >= player.stats.mana_cost;
    if dx.abs() < 150.0 {
        intent.move_x = -sign_toward(dx);
        intent.jump = dx.abs() < 60.0;
    } else if player.mana < player.stats.mana_cost {
        intent.charge = true;
    }
    intent
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Crazy Wizard (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = args
        .next()
        .map(|path| Tuning::load(Path::new(&path)))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let mut game = Game::new(seed, tuning);
    let mut elapsed = 0.0;
    while elapsed < MAX_SECONDS && game.state.phase != GamePhase::GameOver {
        game.update(FRAME_DT);
        elapsed += FRAME_DT;
    }

    let mut summary = game.summary;
    summary.ticks = game.state.time_ticks;
    summary.wave_reached = game.state.wave.wave;
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize run summary: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only
}
