//! Everything needed to reach the data store and pick the row field to report.

use crate::probe::table::{Identifier, TableRef};
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_COLUMN: &str = "email";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ConnectionDescriptor {
    /// Host, port, credentials, database and TLS mode.
    pub target: PgConnectOptions,
    pub table: TableRef,
    pub column: Identifier,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl ConnectionDescriptor {
    pub fn new(target: PgConnectOptions, table: TableRef) -> Self {
        Self {
            target,
            table,
            column: Identifier(DEFAULT_COLUMN.to_owned()),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_column(mut self, column: Identifier) -> Self {
        self.column = column;
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, query: Duration) -> Self {
        self.connect_timeout = connect;
        self.query_timeout = query;
        self
    }

    /// `user@host:port/database`, never including the password.
    pub fn target_label(&self) -> String {
        let user = self.target.get_username();
        let host = self.target.get_host();
        let port = self.target.get_port();
        match self.target.get_database() {
            Some(db) => format!("{user}@{host}:{port}/{db}"),
            None => format!("{user}@{host}:{port}"),
        }
    }
}

// Manual impl so the password inside `PgConnectOptions` never reaches a log line.
impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("target", &self.target_label())
            .field("table", &self.table.to_string())
            .field("column", &self.column.as_str())
            .field("connect_timeout", &self.connect_timeout)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}
