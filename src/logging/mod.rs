use crate::cli::TracingFormat;
use crate::config::Config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt::format::JsonFields};

/// Default filter directives when `RUST_LOG` is unset.
///
/// sqlx statement logging (target `sqlx::query`) follows the crate level so
/// `LOG_LEVEL=debug` also shows the probe statement.
pub fn default_directives(base_level: &str) -> String {
    format!("warn,rowprobe={base_level},sqlx::query={base_level}")
}

/// Configure and initialize logging for the application.
///
/// Events go to stderr; stdout is reserved for the probe report.
pub fn setup_logging(config: &Config, tracing_format: TracingFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    match tracing_format {
        TracingFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .init();
        }
        TracingFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_writer(std::io::stderr)
                        .json()
                        .flatten_event(true)
                        .with_current_span(true)
                        .fmt_fields(JsonFields::new()),
                )
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse() {
        let directives = default_directives("debug");
        assert_eq!(directives, "warn,rowprobe=debug,sqlx::query=debug");
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
