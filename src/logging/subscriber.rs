//! tracing integration
//!
//! Installs a global tracing subscriber that writes through the same sink as
//! the [`Logger`], using the same line layout so tracing output in the active
//! file still carries the date token day recovery relies on.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, SinkKind};

use super::clock::{Clock, SystemClock};
use super::console::ConsoleSink;
use super::dispatch::Logger;
use super::file_writer::RotatingFile;
use super::format::format_line_with_origin;
use super::level::{Level, LevelMask};

/// Event formatter producing `Level: date time target: fields`
#[derive(Debug, Clone)]
pub struct LineFormat {
    clock: Arc<dyn Clock>,
}

impl LineFormat {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();

        let mut fields = String::new();
        ctx.field_format().format_fields(Writer::new(&mut fields), event)?;

        let line = format_line_with_origin(
            Level::from(*meta.level()),
            self.clock.now(),
            meta.target(),
            format_args!("{}", fields),
        );
        writer.write_str(&line)
    }
}

/// Build the configured logger and route tracing events to the same sink
///
/// `RUST_LOG` overrides the configured level for tracing events only.
pub fn init_logging(config: &Config) -> Result<Logger> {
    let mask = config.level_mask();

    match config.sink {
        SinkKind::Console => {
            install_subscriber(mask, std::io::stdout)?;
            Ok(Logger::console(
                mask,
                ConsoleSink::stdout().with_color(config.color),
            ))
        }
        SinkKind::File => {
            let path = config.log_path();
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).context("Failed to create logs directory")?;
            }

            let diagnostics = Arc::new(ConsoleSink::stdout().with_color(config.color));
            let file = Arc::new(
                RotatingFile::new(path, config.rotation()).with_diagnostics(diagnostics),
            );

            install_subscriber(mask, Arc::clone(&file))?;
            Ok(Logger::file(mask, file))
        }
    }
}

fn install_subscriber<W>(mask: LevelMask, writer: W) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(mask.to_level_filter().into()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .event_format(LineFormat::default())
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install tracing subscriber")
}
