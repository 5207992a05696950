use color_eyre::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::{ensure_data_dir_exists, Config};

pub const LOG_FILE: &str = "greeter.log";

/// Install a file-only subscriber; the terminal belongs to the form.
///
/// The returned guard flushes the log on drop and must live until exit.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    ensure_data_dir_exists(config)?;
    let file_appender = tracing_appender::rolling::never(&config.config.data_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::builder()
        .with_default_directive(default_level(config.log.level.as_deref()).into())
        .from_env_lossy();

    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;
    Ok(guard)
}

/// Configured level, or INFO in debug builds and WARN in release builds.
fn default_level(configured: Option<&str>) -> LevelFilter {
    configured
        .and_then(|level| level.parse().ok())
        .unwrap_or(if cfg!(debug_assertions) {
            LevelFilter::INFO
        } else {
            LevelFilter::WARN
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_wins_over_build_default() {
        assert_eq!(default_level(Some("trace")), LevelFilter::TRACE);
        assert_eq!(default_level(Some("off")), LevelFilter::OFF);
    }

    #[test]
    fn unknown_level_falls_back() {
        let fallback = default_level(None);
        assert_eq!(default_level(Some("loud")), fallback);
        assert!(fallback == LevelFilter::INFO || fallback == LevelFilter::WARN);
    }
}
