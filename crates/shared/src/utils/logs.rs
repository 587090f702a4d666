use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use std::path::Path;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

fn quiet_filter(level: &str) -> EnvFilter {
    ["hyper=off", "opentelemetry=off", "tonic=off", "h2=off", "sqlx=warn"]
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(EnvFilter::new(level), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Daily-rolled `{component}.log` in `dir`, written off the calling thread.
fn file_writer(dir: impl AsRef<Path>, component: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, format!("{component}.log"));
    tracing_appender::non_blocking(appender)
}

/// Installs console, optional JSON file, and OTLP log layers. Keep the
/// returned guard alive for as long as file logs should be flushed.
pub fn init_logger(
    sdk_logger_provider: &SdkLoggerProvider,
    component: &str,
    is_dev: bool,
    enable_file: bool,
) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_dev {
            quiet_filter("debug")
        } else {
            quiet_filter("info")
        }
    });

    let console_layer = if is_dev {
        fmt::layer()
            .pretty()
            .with_thread_names(true)
            .with_ansi(true)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_filter(console_filter)
            .boxed()
    };

    let (file_layer, guard) = if enable_file {
        let log_dir = if is_dev { "./logs" } else { "/var/log/app" };
        let (writer, guard) = file_writer(log_dir, component);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .json()
            .with_filter(quiet_filter("info"));

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let otel_layer =
        OpenTelemetryTracingBridge::new(sdk_logger_provider).with_filter(quiet_filter("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(otel_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_writer_flushes_into_component_log() {
        let dir = std::env::temp_dir().join(format!("storefront-logs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let (mut writer, guard) = file_writer(&dir, "api-test");
        writer.write_all(b"order placed\n").unwrap();
        drop(guard);

        let logs: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with("api-test.log"))
            .filter_map(|entry| std::fs::read_to_string(entry.path()).ok())
            .collect();

        assert_eq!(logs.len(), 1);
        assert!(logs[0].contains("order placed"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
