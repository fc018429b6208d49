//! Simulation module
//!
//! All gameplay logic lives here. Given the same seed, tuning and inputs a
//! run plays out identically:
//! - One seeded RNG owned by the state
//! - Fixed sub-step order every frame
//! - No rendering, audio or platform dependencies

pub mod asteroid;
pub mod collision;
pub mod difficulty;
pub mod enemy;
pub mod particle;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod rng;
pub mod starfield;
pub mod state;
pub mod tick;
pub mod wave;

pub use asteroid::{AsteroidParams, AsteroidSize, SplitOutcome};
pub use difficulty::{AdaptiveAssist, DifficultyController, DifficultyInputs};
pub use enemy::{BossParams, DroneParams, Enemy, EnemyKind, KamikazeParams};
pub use particle::Particle;
pub use player::{FireCommand, Player};
pub use powerup::{DropContext, PowerUp, PowerUpEconomy, PowerUpKind};
pub use projectile::{Bullet, EnemyBullet, HomingMissile};
pub use starfield::{StarLayer, Starfield};
pub use state::{GameEvent, GameState, PauseFlags, RunPhase, RunState};
pub use tick::{TickInput, tick};
pub use wave::{Archetype, WaveContext, WaveOutcome, WaveScheduler};
