//! Command-line interface for spire-coach.

use std::path::PathBuf;

use clap::Parser;

use spire_coach::ConfigOverrides;

/// Ask the Slay the Spire coach about a saved run state
#[derive(Parser, Debug)]
#[command(name = "spire-coach")]
#[command(about = "LLM coaching for a Slay the Spire run", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON file describing the run (a missing `run` means no active game)
    #[arg(long)]
    pub state: PathBuf,

    /// Config file to use instead of the default search
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// API key (overrides OPENAI_API_KEY and the config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Completions endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(long)]
    pub model: Option<String>,

    /// Print the extracted snapshot as JSON and exit
    #[arg(long)]
    pub dump_state: bool,

    /// Print the prompt that would be sent and exit
    #[arg(long)]
    pub dump_prompt: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
        }
    }
}
