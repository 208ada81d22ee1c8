//! Single-row fetch probe: connect, read the first row, report one field,
//! always disconnect.

pub mod connector;
pub mod descriptor;
pub mod errors;
pub mod postgres;
pub mod sink;
pub mod table;

pub use connector::{Connector, ProbeConnection};
pub use descriptor::ConnectionDescriptor;
pub use errors::ProbeError;
pub use postgres::PgConnector;
pub use sink::{ReportSink, StdoutSink, TracingSink};
pub use table::{Identifier, IdentifierError, TableRef};

use crate::utils::{fmt_duration, log_if_slow};
use anyhow::anyhow;
use std::fmt;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{Instrument, debug, info_span, warn};

/// Connects slower than this are logged as warnings.
const SLOW_CONNECT_THRESHOLD: Duration = Duration::from_secs(2);

/// Upper bound on the graceful close; past it the handle is dropped instead.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one probe run.
#[derive(Debug)]
pub enum ProbeReport {
    Found { column: String, value: String },
    Empty { table: String },
    Failed(ProbeError),
}

impl ProbeReport {
    /// The reported field value, if a row was found.
    pub fn value(&self) -> Option<&str> {
        match self {
            ProbeReport::Found { value, .. } => Some(value),
            _ => None,
        }
    }

    /// `0` for a found or empty result, `1` for a failed probe.
    pub fn exit_status(&self) -> u8 {
        match self {
            ProbeReport::Found { .. } | ProbeReport::Empty { .. } => 0,
            ProbeReport::Failed(_) => 1,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeReport::Found { column, value } if column == descriptor::DEFAULT_COLUMN => {
                write!(f, "Found user: {value}")
            }
            ProbeReport::Found { column, value } => write!(f, "Found user {column}: {value}"),
            ProbeReport::Empty { table } => write!(f, "No rows found in {table}"),
            ProbeReport::Failed(e) => write!(f, "Probe failed: {}", e.chain()),
        }
    }
}

/// Run one probe and emit its outcome to `sink`.
///
/// Never returns an error: every failure is folded into the report. The
/// connection opened for this run is released before the function returns,
/// whatever the outcome, and is never shared with a later run.
pub async fn run_probe<C, S>(
    descriptor: &ConnectionDescriptor,
    connector: &C,
    sink: &mut S,
) -> ProbeReport
where
    C: Connector,
    S: ReportSink + ?Sized,
{
    let span = info_span!(
        "probe",
        db = %descriptor.target_label(),
        table = %descriptor.table,
    );

    let report = match fetch_first_value(descriptor, connector).instrument(span).await {
        Ok(value) => ProbeReport::Found {
            column: descriptor.column.to_string(),
            value,
        },
        Err(ProbeError::Empty { table }) => ProbeReport::Empty { table },
        Err(e) => ProbeReport::Failed(e),
    };

    sink.emit(&report);
    report
}

/// Connect, read the configured column of the first row, disconnect.
///
/// An empty table surfaces as [`ProbeError::Empty`].
pub async fn fetch_first_value<C: Connector>(
    descriptor: &ConnectionDescriptor,
    connector: &C,
) -> Result<String, ProbeError> {
    let start = Instant::now();
    let mut conn = match time::timeout(descriptor.connect_timeout, connector.connect(descriptor)).await {
        Ok(Ok(conn)) => conn,
        Ok(Err(source)) => {
            return Err(ProbeError::Connection {
                target: descriptor.target_label(),
                source,
            });
        }
        Err(_elapsed) => {
            return Err(ProbeError::Connection {
                target: descriptor.target_label(),
                source: anyhow!(
                    "connect timed out after {}",
                    fmt_duration(descriptor.connect_timeout)
                ),
            });
        }
    };
    let elapsed = log_if_slow(start, SLOW_CONNECT_THRESHOLD, "database connect");
    debug!(duration = fmt_duration(elapsed), "connection acquired");

    let result = read_first_value(&mut conn, descriptor).await;

    // Released before the result is inspected so every outcome closes the handle
    release(conn).await;
    result
}

async fn read_first_value<P: ProbeConnection>(
    conn: &mut P,
    descriptor: &ConnectionDescriptor,
) -> Result<String, ProbeError> {
    let sql = descriptor.table.select_first_row();
    let column = descriptor.column.as_str();
    let table = || descriptor.table.to_string();

    let start = Instant::now();
    let fetched = time::timeout(descriptor.query_timeout, conn.fetch_first_text(&sql, column)).await;
    debug!(duration = fmt_duration(start.elapsed()), sql = %sql, "query finished");

    match fetched {
        Ok(Ok(Some(value))) => Ok(value),
        Ok(Ok(None)) => Err(ProbeError::Empty { table: table() }),
        Ok(Err(source)) => Err(ProbeError::Query {
            table: table(),
            source,
        }),
        Err(_elapsed) => Err(ProbeError::Query {
            table: table(),
            source: anyhow!(
                "query timed out after {}",
                fmt_duration(descriptor.query_timeout)
            ),
        }),
    }
}

async fn release<P: ProbeConnection>(conn: P) {
    let start = Instant::now();
    match time::timeout(CLOSE_TIMEOUT, conn.close()).await {
        Ok(Ok(())) => debug!(duration = fmt_duration(start.elapsed()), "connection released"),
        Ok(Err(e)) => warn!(error = ?e, "graceful close failed, connection handle dropped"),
        Err(_elapsed) => warn!(
            timeout = fmt_duration(CLOSE_TIMEOUT),
            "graceful close timed out, connection handle dropped"
        ),
    }
}
