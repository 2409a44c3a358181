pub mod engine;
pub mod llm_client;
pub mod prompt_builder;
pub mod protocol;
pub mod snapshot_builder;

pub use engine::{advise_once, AdviceCoordinator, ShutdownMode};
pub use llm_client::{CompletionBackend, CompletionClient};
pub use prompt_builder::PromptBuilder;
pub use protocol::{AdviceCallback, FnCallback};
