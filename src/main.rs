use clap::Parser;
use rowprobe::app::App;
use rowprobe::cli::Args;
use rowprobe::config::Config;
use rowprobe::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

/// Exit status when configuration prevents a probe from being attempted.
const EXIT_CONFIG: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logging is not up yet, so config errors go straight to stderr
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting rowprobe"
    );

    let app = match App::new(&config, &args) {
        Ok(app) => app,
        Err(e) => {
            error!(error = format!("{e:#}"), "invalid probe configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    app.run().await
}
