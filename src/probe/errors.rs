//! Error types for a single probe run.

use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Network, authentication, TLS failure or connect timeout.
    #[error("connection to {target} failed")]
    Connection {
        target: String,
        #[source]
        source: anyhow::Error,
    },
    /// Bad table reference, permission denial, decode failure or query timeout.
    #[error("query against {table} failed")]
    Query {
        table: String,
        #[source]
        source: anyhow::Error,
    },
    /// The table had no rows. Reported, never fatal.
    #[error("no rows in {table}")]
    Empty { table: String },
}

impl ProbeError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Connection { .. } => "connection",
            ProbeError::Query { .. } => "query",
            ProbeError::Empty { .. } => "empty_result",
        }
    }

    /// The error message followed by every source, joined with `: `.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut source: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}
