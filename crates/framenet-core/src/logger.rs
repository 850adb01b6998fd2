//! Stderr logger with per-module levels.
//!
//! Lines read `[  0.012s DEBUG network] compiled network: 4 systems, 3 transforms`.
//! Targets are shown without their `framenet` crate prefix. Path discovery in
//! `system` logs every start/target pair at `trace`, so it usually wants a
//! lower level than the rest of the network:
//!
//! ```text
//! FRAMENET_LOG=debug,system=warn
//! ```

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read by [`init_with_level`] and `init_tracing`.
pub const LOG_ENV: &str = "FRAMENET_LOG";

const CRATE_PREFIXES: [&str; 3] = ["framenet_core::", "framenet_pinhole::", "framenet::"];

/// `network::walk` for `framenet::network::walk`; foreign targets unchanged.
fn module_of(target: &str) -> &str {
    CRATE_PREFIXES
        .iter()
        .find_map(|prefix| target.strip_prefix(prefix))
        .unwrap_or(target)
}

/// A default level plus overrides for framenet modules.
#[derive(Clone, Debug, PartialEq)]
pub struct LogFilter {
    default: LevelFilter,
    modules: Vec<(String, LevelFilter)>,
}

impl LogFilter {
    pub fn new(default: LevelFilter) -> Self {
        Self {
            default,
            modules: Vec::new(),
        }
    }

    /// Override the level of `module` (`"system"`, `"network"`, ...) and its
    /// submodules.
    pub fn with_module(mut self, module: &str, level: LevelFilter) -> Self {
        self.modules.retain(|(name, _)| name != module);
        self.modules.push((module.to_owned(), level));
        self
    }

    /// Parse `level,module=level,...`. Unparseable entries are skipped and a
    /// missing default falls back to `fallback`.
    pub fn parse(spec: &str, fallback: LevelFilter) -> Self {
        let mut filter = Self::new(fallback);
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once('=') {
                Some((module, level)) => {
                    if let Ok(level) = level.trim().parse() {
                        filter = filter.with_module(module.trim(), level);
                    }
                }
                None => {
                    if let Ok(level) = entry.parse() {
                        filter.default = level;
                    }
                }
            }
        }
        filter
    }

    /// [`LOG_ENV`] parsed over `fallback`, or just `fallback` when unset.
    pub fn from_env(fallback: LevelFilter) -> Self {
        match std::env::var(LOG_ENV) {
            Ok(spec) => Self::parse(&spec, fallback),
            Err(_) => Self::new(fallback),
        }
    }

    /// Level applied to records from `target`; the longest matching module wins.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        let module = module_of(target);
        self.modules
            .iter()
            .filter(|(name, _)| {
                module
                    .strip_prefix(name.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
            })
            .max_by_key(|(name, _)| name.len())
            .map_or(self.default, |&(_, level)| level)
    }

    /// Most verbose level any record can pass.
    pub fn max_level(&self) -> LevelFilter {
        self.modules
            .iter()
            .map(|&(_, level)| level)
            .fold(self.default, Ord::max)
    }

    /// The same filter as `tracing` directives on full `framenet::` targets.
    pub fn directives(&self) -> String {
        let mut out = self.default.to_string().to_lowercase();
        for (module, level) in &self.modules {
            out.push_str(&format!(
                ",framenet::{module}={}",
                level.to_string().to_lowercase()
            ));
        }
        out
    }
}

struct StderrLogger {
    filter: LogFilter,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let _ = writeln!(
            std::io::stderr(),
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            module_of(record.target()),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger at `level`, refined by [`LOG_ENV`] if set.
///
/// Only the first successful call installs a logger.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    init_with_filter(LogFilter::from_env(level))
}

/// Install the stderr logger with explicit per-module levels.
pub fn init_with_filter(filter: LogFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let max = filter.max_level();
        let logger = LOGGER.get_or_init(|| StderrLogger {
            filter,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(max);
    }
    Ok(())
}

/// Install a `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise [`LOG_ENV`] is translated to
/// `framenet::` directives over a default of `info`. Span close events are
/// emitted so `compile` timings show up in the output.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = LogFilter::from_env(LevelFilter::Info).directives();
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
