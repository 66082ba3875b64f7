//! Game state and core simulation types
//!
//! Every entity record of a run lives here, owned by `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Paused by the player
    Paused,
    /// Wave cleared, waiting for the player to pick a card
    CardSelect,
    /// Run ended
    GameOver,
}

/// Upgradable stat block, mutated only by cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub move_speed: f32,
    /// Negative = upward impulse
    pub jump_force: f32,
    pub mana_cost: f32,
    pub mana_charge_speed: f32,
    pub max_mana: f32,
    pub max_hp: u32,
    pub damage: f32,
    pub projectile_speed: f32,
    /// Multiplier on the projectile sprite/hit size
    pub projectile_size: f32,
    /// Extra enemies a projectile passes through
    pub piercing: u32,
    /// Chance (0-1) to heal 1 hp on kill
    pub vampirism: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            jump_force: -10.0,
            mana_cost: 15.0,
            mana_charge_speed: 0.3,
            max_mana: 100.0,
            max_hp: 3,
            damage: 15.0,
            projectile_speed: 5.0,
            projectile_size: 1.0,
            piercing: 0,
            vampirism: 0.0,
        }
    }
}

/// Combat sub-state of the player; attacking and charging are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CombatState {
    #[default]
    Idle,
    /// Staff swing in progress, `frame` runs 0..4
    Attacking { frame: f32 },
    /// Holding the charge input, mana refilling
    Charging,
}

/// The player-controlled wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    pub grounded: bool,
    pub facing_right: bool,
    /// Walk cycle (rendering only)
    pub walk_frame: f32,
    pub staff_equipped: bool,
    /// 0.0 = staff on back, 1.0 = staff in hand
    pub staff_anim: f32,
    pub combat: CombatState,
    pub mana: f32,
    pub hp: u32,
    pub hit_flash: u32,
    pub invulnerability: u32,
    /// Set by boss attacks; suppresses all input
    pub paralyzed: bool,
    /// Latch so the mana-full signal fires once per charge session
    pub mana_full: bool,
    /// Point the staff aims at (playfield coordinates)
    pub aim_target: Vec2,
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(stats: PlayerStats) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(CANVAS_WIDTH / 2.0, GROUND_Y - size.y),
            size,
            vy: 0.0,
            grounded: true,
            facing_right: true,
            walk_frame: 0.0,
            staff_equipped: false,
            staff_anim: 0.0,
            combat: CombatState::Idle,
            mana: stats.max_mana,
            hp: stats.max_hp,
            hit_flash: 0,
            invulnerability: 0,
            paralyzed: false,
            mana_full: false,
            aim_target: Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
            stats,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.combat, CombatState::Attacking { .. })
    }

    pub fn is_charging(&self) -> bool {
        self.combat == CombatState::Charging
    }

    /// Heal by `amount`, never above max hp. A dead player stays dead.
    pub fn heal(&mut self, amount: u32) {
        if self.hp == 0 {
            return;
        }
        self.hp = (self.hp + amount).min(self.stats.max_hp);
    }

    /// Remove mana, floored at zero
    pub fn drain_mana(&mut self, amount: f32) {
        self.mana = (self.mana - amount).max(0.0);
    }

    /// Staff sprite frame (0-3) for the renderer.
    ///
    /// While paralyzed the staff cycles its frames backwards.
    pub fn staff_frame(&self, tick: u64) -> u8 {
        match self.combat {
            CombatState::Attacking { frame } => (frame.floor() as u8).min(3),
            CombatState::Charging => 2 + ((tick / 8) % 2) as u8,
            CombatState::Idle if self.paralyzed => 3 - ((tick / 5) % 4) as u8,
            CombatState::Idle => 0,
        }
    }
}

/// Normal enemy behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalState {
    Walk,
    Attack,
}

/// Boss behavior; a boss always starts at `TransformingPulse`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    TransformingPulse,
    TransformingMorph,
    TransformingWait,
    Idle,
    AttackSword,
    AttackMana,
    AttackMeteor,
}

impl BossState {
    /// Boss is still revealing itself and cannot be damaged
    pub fn is_transforming(self) -> bool {
        matches!(
            self,
            BossState::TransformingPulse | BossState::TransformingMorph | BossState::TransformingWait
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal(NormalState),
    Boss(BossState),
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub facing_right: bool,
    pub kind: EnemyKind,
    /// Ticks spent in the current boss state
    pub timer: u32,
    /// Boss sprite frame
    pub anim_frame: u32,
    /// Waddle phase (rendering only)
    pub walk_timer: f32,
    pub attack_frame: f32,
    pub hit_flash: u32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, hp: f32, facing_right: bool, walk_timer: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            hp,
            max_hp: hp,
            facing_right,
            kind: EnemyKind::Normal(NormalState::Walk),
            timer: 0,
            anim_frame: 0,
            walk_timer,
            attack_frame: 0.0,
            hit_flash: 0,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss_state(&self) -> Option<BossState> {
        match self.kind {
            EnemyKind::Boss(state) => Some(state),
            EnemyKind::Normal(_) => None,
        }
    }

    /// Strict point-in-rectangle test against the hitbox
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.pos.x
            && point.x < self.pos.x + self.size.x
            && point.y > self.pos.y
            && point.y < self.pos.y + self.size.y
    }

    /// Turn this enemy into a freshly revealed boss.
    ///
    /// The hitbox grows upward so the feet stay on the ground line.
    pub fn mutate_into_boss(&mut self) {
        let feet = self.pos.y + self.size.y;
        self.hp = 1.0;
        self.kind = EnemyKind::Boss(BossState::TransformingPulse);
        self.size = Vec2::new(BOSS_WIDTH, BOSS_HEIGHT);
        self.pos.y = feet - self.size.y;
        self.timer = 0;
        self.anim_frame = 0;
    }
}

/// A staff projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Flight angle (radians) for sprite rotation
    pub angle: f32,
    /// Animation frame counter
    pub frame: f32,
    pub active: bool,
    pub damage: f32,
    pub size: f32,
    /// Enemies this projectile may still pass through
    pub piercing: u32,
    /// Enemy ids already struck (never contains duplicates)
    pub hit_enemies: Vec<u32>,
}

impl Projectile {
    pub fn has_hit(&self, enemy_id: u32) -> bool {
        self.hit_enemies.contains(&enemy_id)
    }
}

/// A falling meteor from the boss ranged attack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

/// Per-run wave bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveState {
    /// Current wave (1-based)
    pub wave: u32,
    pub kills: u32,
    pub kill_target: u32,
    pub spawn_timer: u32,
    pub spawned: u32,
    /// Set once an enemy mutated this wave
    pub boss_appeared: bool,
}

impl WaveState {
    pub fn new(kill_target: u32) -> Self {
        Self {
            wave: 1,
            kills: 0,
            kill_target,
            spawn_timer: 0,
            spawned: 0,
            boss_appeared: false,
        }
    }
}

/// On-screen warning text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub text: String,
    /// Ticks left on screen
    pub ttl: u32,
}

pub const WARNING_MUTATION: &str = "An enemy has mutated...";
pub const WARNING_USE_MANA: &str = "USE REMAINING MANA!";

/// Signals produced for the host (UI, audio)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    GameOver,
    WaveCleared { wave: u32, cards: [&'static str; CARDS_OFFERED] },
    Warning { text: String, ttl: u32 },
    ManaFull,
    ProjectileFired { id: u32 },
    EnemySpawned { id: u32 },
    EnemyKilled { id: u32 },
    EnemyMutated { id: u32 },
    EnemyEvaporated { id: u32 },
    PlayerDamaged { hp: u32 },
    PlayerHealed { hp: u32 },
    MeteorImpact { x: f32 },
}

/// Complete state of a run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of every random branch in the run
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Active enemies (in spawn order)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub meteors: Vec<Meteor>,
    pub wave: WaveState,
    /// Pool indices offered while in `CardSelect`
    pub offered_cards: Vec<usize>,
    pub warning: Option<Warning>,
    /// Ticks of screen shake left (rendering only)
    pub screen_shake: u32,
    /// Events since the host last drained them. Unbounded: hosts must call
    /// `drain_events` every frame.
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::new(tuning.starting_stats.clone()),
            enemies: Vec::new(),
            projectiles: Vec::with_capacity(32),
            meteors: Vec::with_capacity(METEORS_PER_ATTACK * 2),
            wave: WaveState::new(tuning.first_wave_kill_target),
            offered_cards: Vec::with_capacity(CARDS_OFFERED),
            warning: None,
            screen_shake: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Raise a warning, replacing any current one.
    ///
    /// Re-raising the warning that is already showing only refreshes its ttl.
    pub fn raise_warning(&mut self, text: &str, ttl: u32) {
        if let Some(current) = self.warning.as_mut().filter(|w| w.text == text) {
            current.ttl = ttl;
            return;
        }
        self.warning = Some(Warning {
            text: text.to_string(),
            ttl,
        });
        self.events.push(GameEvent::Warning {
            text: text.to_string(),
            ttl,
        });
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn boss_alive(&self) -> bool {
        self.enemies.iter().any(Enemy::is_boss)
    }
}
