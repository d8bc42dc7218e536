use anyhow::{Context, Result};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
pub fn init(level: &str, time_format: Option<&str>) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match time_format {
        Some(fmt) => builder.with_timer(ChronoUtc::new(fmt.to_string())).try_init(),
        None => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
