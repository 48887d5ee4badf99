use crate::config::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Keeps the background log writer alive. Dropping it flushes pending lines,
/// so hold it until the server has shut down.
#[must_use = "logs are flushed when the guard is dropped"]
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Installs the process-wide subscriber. `RUST_LOG` takes precedence over the
/// configured filter.
pub fn init_tracing(config: &Config) -> anyhow::Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;

    let (writer, worker) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;

    Ok(LogGuard { _worker: worker })
}
