use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;

/// Environment variable that overrides the default log level.
pub const LOG_ENV_VAR: &str = "SKETCHWRIGHT_LOG";

/// Log level used when `SKETCHWRIGHT_LOG` is not set.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialize the tracing subscriber without timestamps but with colors.
///
/// Use SKETCHWRIGHT_LOG=info or SKETCHWRIGHT_LOG=debug to increase verbosity.
/// Example: SKETCHWRIGHT_LOG=debug sketchwright --script demo.sws
///
/// `debug` forces debug output for this crate regardless of the environment.
pub fn init_logger(debug: bool) {
    // Empty time formatter that doesn't print anything
    struct EmptyTime;
    impl FormatTime for EmptyTime {
        fn format_time(
            &self,
            _: &mut tracing_subscriber::fmt::format::Writer<'_>,
        ) -> std::fmt::Result {
            Ok(())
        }
    }

    let level = std::env::var(LOG_ENV_VAR)
        .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

    let format = format()
        .with_timer(EmptyTime)
        .with_level(true)
        .with_target(true)
        .with_ansi(true);

    let mut filter = EnvFilter::new(&level);
    if debug {
        if let Ok(directive) = "sketchwright=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_filter(filter),
        )
        .try_init();
}
