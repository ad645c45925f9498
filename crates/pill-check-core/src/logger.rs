//! Stderr logging for the pill-check crates.
//!
//! Records from `pill_check*` targets pass at [`LogOptions::level`]; records
//! from every other crate (image decoders, rayon) only at
//! [`LogOptions::dependency_level`], so `--verbose` shows the pipeline stages
//! without decoder chatter.

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

const OWN_TARGET_PREFIX: &str = "pill_check";

/// Level filters used by [`init`] and `init_tracing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogOptions {
    /// Filter for `pill_check` and `pill_check_core` records.
    pub level: LevelFilter,
    /// Filter for records from any other crate.
    pub dependency_level: LevelFilter,
}

impl LogOptions {
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            level,
            dependency_level: LevelFilter::Warn,
        }
    }

    /// `Debug` for our own targets when `verbose`, `Info` otherwise.
    pub const fn verbose(verbose: bool) -> Self {
        Self::new(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
    }

    fn level_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET_PREFIX) {
            self.level
        } else {
            self.dependency_level
        }
    }

    fn max_level(&self) -> LevelFilter {
        self.level.max(self.dependency_level)
    }

    #[cfg(feature = "tracing")]
    fn env_filter_directives(&self) -> String {
        format!(
            "{}={},{}",
            OWN_TARGET_PREFIX, self.level, self.dependency_level
        )
    }
}

impl Default for LogOptions {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

struct StderrLogger {
    options: LogOptions,
    started: Instant,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.options.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// `pill_check_core::color` -> `color`
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Install the stderr logger. Later calls keep the first options.
pub fn init(options: LogOptions) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StderrLogger {
            options,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(logger.options.max_level());
    }
    Ok(())
}

/// Shorthand for [`init`] with [`LogOptions::new`].
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    init(LogOptions::new(level))
}

/// Install a `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise the filter is built from `options`.
#[cfg(feature = "tracing")]
pub fn init_tracing(options: LogOptions, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.env_filter_directives()));
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_target_keeps_last_segment() {
        assert_eq!(short_target("pill_check_core::color"), "color");
        assert_eq!(short_target("pill_check"), "pill_check");
    }

    #[test]
    fn own_targets_use_main_level() {
        let opts = LogOptions::verbose(true);
        assert_eq!(opts.level_for("pill_check::validator"), LevelFilter::Debug);
        assert_eq!(opts.level_for("pill_check_core::color"), LevelFilter::Debug);
        assert_eq!(opts.level_for("png::decoder"), LevelFilter::Warn);
        assert_eq!(opts.max_level(), LevelFilter::Debug);
    }

    #[test]
    fn quiet_main_level_still_passes_dependency_warnings() {
        let opts = LogOptions {
            level: LevelFilter::Error,
            dependency_level: LevelFilter::Warn,
        };
        assert_eq!(opts.max_level(), LevelFilter::Warn);
        assert_eq!(LogOptions::verbose(false), LogOptions::default());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn tracing_directives_follow_options() {
        assert_eq!(
            LogOptions::verbose(true).env_filter_directives(),
            "pill_check=DEBUG,WARN"
        );
    }

    #[test]
    fn init_twice_is_ok() {
        assert!(init_with_level(LevelFilter::Warn).is_ok());
        assert!(init(LogOptions::verbose(true)).is_ok());
    }
}
