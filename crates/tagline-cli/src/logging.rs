use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for the CLI.
///
/// Logs go to stderr so command output on stdout stays clean. `verbose`
/// forces `debug`; otherwise `RUST_LOG` is honoured, defaulting to `warn`.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let filter_layer = if verbose {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
