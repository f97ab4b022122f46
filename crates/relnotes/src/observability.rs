//! Structured logging for the CLI.
//!
//! Every event becomes one JSON object per line in a daily-rolled
//! `relnotes.jsonl`. Stdout carries the rendered notes and is never written
//! to; when no log file can be opened, records go to stderr instead.
//!
//! The log file location is the first of:
//!
//! 1. `RELNOTES_LOG_PATH` (a full file path)
//! 2. `RELNOTES_LOG_DIR`
//! 3. `log_dir` from configuration
//! 4. the platform data directory, under `logs/`
//!
//! Each record carries the names of the spans it was emitted in (`spans`)
//! and their fields flattened next to the event's own, so a line logged
//! while rendering looks like:
//!
//! ```json
//! {"timestamp":"…","level":"debug","target":"relnotes_core::changelog",
//!  "service":"relnotes","spans":["cmd_notes","preview_notes"],
//!  "path":"/repo/CHANGELOG","format":"html","message":"extracted latest release"}
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

const SERVICE: &str = env!("CARGO_PKG_NAME");
const ENV_LOG_PATH: &str = "RELNOTES_LOG_PATH";
const ENV_LOG_DIR: &str = "RELNOTES_LOG_DIR";
const LOG_FILE_NAME: &str = "relnotes.jsonl";

/// Keeps the background log writer flushing; hold it until exit.
pub struct LogGuard {
    _worker: WorkerGuard,
}

/// Install the global JSONL subscriber.
///
/// `config_log_dir` is the `log_dir` configuration value, consulted after
/// the environment overrides.
pub fn init(filter: EnvFilter, config_log_dir: Option<&Path>) -> LogGuard {
    let (writer, worker) = match open_log_file(config_log_dir) {
        Ok(appender) => tracing_appender::non_blocking(appender),
        Err(err) => {
            eprintln!("Warning: {err:#}. Logging to stderr.");
            tracing_appender::non_blocking(std::io::stderr())
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(JsonLines::new(writer))
        .init();

    LogGuard { _worker: worker }
}

/// Log filter from CLI flags: `-q` > `-v`/`-vv` > `RUST_LOG` > configured level.
pub fn filter(quiet: bool, verbose: u8, configured: &str) -> EnvFilter {
    match (quiet, verbose) {
        (true, _) => EnvFilter::new("error"),
        (false, 0) => {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
        }
        (false, 1) => EnvFilter::new("debug"),
        (false, _) => EnvFilter::new("trace"),
    }
}

// ============================================================================
// Log file location
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogFile {
    dir: PathBuf,
    name: String,
}

impl LogFile {
    fn choose(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_dir: Option<&Path>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = env_path {
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("{ENV_LOG_PATH} must end in a UTF-8 file name"))?;
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            return Ok(Self {
                dir: dir.to_path_buf(),
                name: name.to_string(),
            });
        }

        env_dir
            .or_else(|| config_dir.map(Path::to_path_buf))
            .or(data_dir)
            .map(|dir| Self {
                dir,
                name: LOG_FILE_NAME.to_string(),
            })
            .ok_or_else(|| anyhow!("no log directory could be determined"))
    }

    fn open(&self) -> Result<RollingFileAppender> {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(&self.name)
            .build(&self.dir)
            .with_context(|| format!("cannot open log file in {}", self.dir.display()))
    }
}

fn open_log_file(config_log_dir: Option<&Path>) -> Result<RollingFileAppender> {
    let data_dir = directories::ProjectDirs::from("", "", SERVICE)
        .map(|dirs| dirs.data_local_dir().join("logs"));
    LogFile::choose(
        std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
        std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
        config_log_dir,
        data_dir,
    )?
    .open()
}

// ============================================================================
// JSON lines layer
// ============================================================================

struct JsonLines<W> {
    writer: W,
}

impl<W> JsonLines<W> {
    const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<S, W> Layer<S> for JsonLines<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: LayerContext<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = Fields::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: LayerContext<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(fields) = span.extensions_mut().get_mut::<Fields>() {
            values.record(fields);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: LayerContext<'_, S>) {
        let meta = event.metadata();
        let mut line = Map::new();
        line.insert(
            "timestamp".into(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true).into(),
        );
        line.insert("level".into(), meta.level().as_str().to_lowercase().into());
        line.insert("target".into(), meta.target().into());
        line.insert("service".into(), SERVICE.into());

        if let Some(scope) = ctx.event_scope(event) {
            let mut names = Vec::new();
            for span in scope.from_root() {
                names.push(Value::from(span.name()));
                if let Some(fields) = span.extensions().get::<Fields>() {
                    line.extend(fields.0.clone());
                }
            }
            line.insert("spans".into(), Value::Array(names));
        }

        let mut fields = Fields::default();
        event.record(&mut fields);
        line.extend(fields.0);

        let mut out = Value::Object(line).to_string();
        out.push('\n');
        let _ = self.writer.make_writer().write_all(out.as_bytes());
    }
}

#[derive(Default)]
struct Fields(Map<String, Value>);

impl Visit for Fields {
    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.insert(field.name().into(), value.into());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().into(), value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().into(), value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().into(), value.into());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().into(), format!("{value:?}").into());
    }
}
