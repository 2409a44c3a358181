//! In-game coach for Slay the Spire: snapshots the run, turns it into a
//! prompt, asks an OpenAI-compatible endpoint for advice and hands the
//! answer back without blocking the game loop.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;

pub use config::{ClientConfig, ConfigFile, ConfigOverrides};
pub use engine::{
    advise_once, AdviceCallback, AdviceCoordinator, CompletionBackend, CompletionClient,
    FnCallback, PromptBuilder, ShutdownMode,
};
pub use error::{CompletionError, ConfigError, CoordinatorError, ErrorKind};
pub use model::advice::{Advice, AdviceResponse, CompletionResult};
pub use model::game_state::{CardRef, CombatSnapshot, EnemySnapshot, GameSnapshot, PlayerSnapshot};
pub use model::host_state::{HostGame, RunState};
