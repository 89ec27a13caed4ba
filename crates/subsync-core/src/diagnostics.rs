use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::config::DiagnosticsConfig;

pub struct TelemetryGuard {
    pub session_id: Uuid,
    /// JSON log of this session, when file logging is enabled.
    pub log_file: Option<PathBuf>,
    _file_guard: Option<WorkerGuard>,
}

/// `{prefix}-{timestamp}-{session}.log`, so concurrent CLI runs never share a file.
#[must_use]
pub fn session_log_file_name(prefix: &str, timestamp: &str, session_id: Uuid) -> String {
    let session = session_id.simple().to_string();
    format!("{prefix}-{timestamp}-{}.log", &session[..8])
}

/// Compact stderr output plus an optional JSON log file per session.
///
/// `RUST_LOG` overrides the configured filter. `command` names the CLI
/// subcommand and is attached to the startup event.
pub fn init_tracing_with_config(
    log_dir: impl AsRef<Path>,
    config: &DiagnosticsConfig,
    command: &str,
) -> anyhow::Result<TelemetryGuard> {
    let session_id = Uuid::new_v4();

    let (file_layer, log_file, file_guard) = if config.json_file {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)
            .with_context(|| format!("failed to create log directory: {}", log_dir.display()))?;

        let timestamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let file_name = session_log_file_name(&config.file_prefix, &timestamp, session_id);
        let log_file = log_dir.join(&file_name);
        let (file_writer, file_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, file_name));

        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(file_writer);
        (Some(layer), Some(log_file), Some(file_guard))
    } else {
        (None, None, None)
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(config.show_targets)
        .with_writer(std::io::stderr);

    if let Err(error) = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        warn!(?error, "global tracing subscriber already initialized");
    } else {
        info!(
            %session_id,
            command,
            log_file = ?log_file,
            "tracing initialized"
        );
    }

    Ok(TelemetryGuard {
        session_id,
        log_file,
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_name_carries_session_prefix() {
        let session_id =
            Uuid::parse_str("5f1c2d3e-0000-4000-8000-000000000000").expect("uuid should parse");
        assert_eq!(
            session_log_file_name("subsync", "20260101-120000", session_id),
            "subsync-20260101-120000-5f1c2d3e.log"
        );
    }

    #[test]
    fn disabled_file_logging_creates_no_directory() {
        let temp = tempfile::tempdir().expect("tempdir should be creatable");
        let log_dir = temp.path().join("logs");
        let config = DiagnosticsConfig {
            json_file: false,
            ..DiagnosticsConfig::default()
        };

        let guard =
            init_tracing_with_config(&log_dir, &config, "test").expect("tracing should init");
        assert!(guard.log_file.is_none());
        assert!(!log_dir.exists());
    }
}
