use crate::cli::Args;
use crate::config::{Config, ProbeOverrides};
use crate::probe::{ConnectionDescriptor, PgConnector, StdoutSink, TracingSink, run_probe};
use crate::utils::fmt_duration;
use anyhow::Context;
use std::process::ExitCode;
use tracing::info;

/// A configured probe, ready to run once.
pub struct App {
    descriptor: ConnectionDescriptor,
}

impl App {
    /// Resolve the probe descriptor from configuration and CLI overrides.
    pub fn new(config: &Config, args: &Args) -> Result<Self, anyhow::Error> {
        let overrides = ProbeOverrides {
            schema: args.schema.clone(),
            table: args.table.clone(),
            column: args.column.clone(),
        };
        let descriptor = config
            .descriptor(&overrides)
            .context("Failed to build connection descriptor")?;

        info!(
            target_db = %descriptor.target_label(),
            table = %descriptor.table,
            column = %descriptor.column,
            connect_timeout = fmt_duration(descriptor.connect_timeout),
            query_timeout = fmt_duration(descriptor.query_timeout),
            "probe configured"
        );

        Ok(App { descriptor })
    }

    /// Run the probe against Postgres, reporting to logs and stdout.
    pub async fn run(self) -> ExitCode {
        let mut sink = (TracingSink, StdoutSink::new());
        let report = run_probe(&self.descriptor, &PgConnector, &mut sink).await;
        report.exit_code()
    }
}
