use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the stderr subscriber for the binary. `RUST_LOG` wins over the
/// verbosity flag when set. The library itself only emits events.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose {
        "warn,spire_coach=debug"
    } else {
        "warn,spire_coach=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
