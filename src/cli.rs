use clap::{Parser, ValueEnum};
use std::fmt;

/// Connect to a database, read the first row of one table, report a field.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::default())]
    pub tracing: TracingFormat,

    /// Schema of the probed table (overrides PROBE_SCHEMA)
    #[arg(long)]
    pub schema: Option<String>,

    /// Table to probe, `table` or `schema.table` (overrides PROBE_TABLE)
    #[arg(long)]
    pub table: Option<String>,

    /// Column reported from the first row (overrides PROBE_COLUMN)
    #[arg(long)]
    pub column: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable, compact single-line events
    Pretty,
    /// One JSON object per event
    Json,
}

impl Default for TracingFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            TracingFormat::Pretty
        } else {
            TracingFormat::Json
        }
    }
}

impl fmt::Display for TracingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TracingFormat::Pretty => "pretty",
            TracingFormat::Json => "json",
        })
    }
}
