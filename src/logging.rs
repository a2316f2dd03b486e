//! Logging configuration using tracing
//!
//! Two sinks:
//! - an optional log file (`--log`), debug and above, one line per event in
//!   the form `2024-01-31 12:00:00,123 - target - LEVEL - message`, with
//!   warnings written as `WARNING`;
//! - stderr, error level only, always on.
//!
//! The file filter can be overridden with `SYNCTEX_JUMP_LOG` (EnvFilter syntax).
//! Nothing is installed globally: callers run their work inside
//! `tracing::subscriber::with_default` with the subscriber built here.

use std::path::Path;

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
const DEFAULT_FILE_FILTER: &str = "debug";

/// Event format for the log file: `timestamp - target - LEVEL - message`.
struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        write!(
            writer,
            "{} - {} - {} - ",
            Local::now().format(TIMESTAMP_FORMAT),
            metadata.target(),
            level_name(metadata.level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Level names as conventionally written in log files (`WARNING`, not `WARN`).
fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

/// Builds the subscriber for a run of the tool.
///
/// If the log file cannot be opened a warning is printed and the file sink
/// is skipped; logging never prevents the jump itself.
pub fn build_subscriber(
    log_file: Option<&Path>,
    file_filter: Option<&str>,
) -> impl Subscriber + Send + Sync + 'static {
    build_subscriber_with_stderr(log_file, file_filter, std::io::stderr)
}

fn build_subscriber_with_stderr<W>(
    log_file: Option<&Path>,
    file_filter: Option<&str>,
    stderr: W,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let file_layer = log_file.and_then(|path| match open_appender(path) {
        Ok(appender) => Some(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .event_format(LogLineFormat)
                .with_filter(parse_file_filter(file_filter)),
        ),
        Err(e) => {
            eprintln!(
                "Warning: Failed to open log file {}: {e}",
                path.display()
            );
            None
        }
    });

    let stderr_layer = fmt::layer()
        .with_writer(stderr)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_filter(LevelFilter::ERROR);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
}

/// Opens `path` for appending; the file and its parent directories are created
/// if needed.
fn open_appender(path: &Path) -> Result<RollingFileAppender, InitError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().unwrap_or(path.as_os_str());

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
}

fn parse_file_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILE_FILTER))
}
