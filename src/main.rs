mod cli;

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::Cli;
use spire_coach::config::settings_io;
use spire_coach::engine::snapshot_builder;
use spire_coach::{
    AdviceCoordinator, ClientConfig, CompletionClient, PromptBuilder, RunState, ShutdownMode,
};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    spire_coach::logging::init(cli.verbose)?;

    let text = fs::read_to_string(&cli.state)
        .with_context(|| format!("reading run state {}", cli.state.display()))?;
    let host: RunState = serde_json::from_str(&text)
        .with_context(|| format!("parsing run state {}", cli.state.display()))?;

    if cli.dump_state {
        let snapshot = snapshot_builder::extract(&host);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(ExitCode::SUCCESS);
    }

    if cli.dump_prompt {
        let snapshot = snapshot_builder::extract(&host);
        if let Some(message) = snapshot.error.as_deref() {
            eprintln!("{}", message);
            return Ok(ExitCode::FAILURE);
        }
        print!("{}", PromptBuilder::build(&snapshot));
        return Ok(ExitCode::SUCCESS);
    }

    let file = settings_io::load_config_file(cli.config.as_deref());
    let config = ClientConfig::from_process_env(&cli.overrides(), file.as_ref());
    info!(
        endpoint = config.endpoint(),
        model = config.model(),
        has_api_key = config.has_api_key(),
        "Resolved configuration"
    );

    let client = CompletionClient::new(config).context("creating completion client")?;
    let mut coordinator =
        AdviceCoordinator::new(Arc::new(host), client).context("starting advice worker")?;

    let rx = coordinator.request_advice_channel()?;
    let response = rx.recv().context("advice worker exited without answering")?;
    coordinator.shutdown(ShutdownMode::Drain);

    println!("{}", response.display_text());

    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
