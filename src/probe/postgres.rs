//! Postgres implementation of the probe seams, backed by a single
//! `sqlx::PgConnection` rather than a pool.

use crate::probe::connector::{Connector, ProbeConnection};
use crate::probe::descriptor::ConnectionDescriptor;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::postgres::PgConnection;
use sqlx::{ConnectOptions, Connection, Row};
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    type Connection = PgProbeConnection;

    async fn connect(&self, descriptor: &ConnectionDescriptor) -> anyhow::Result<PgProbeConnection> {
        let options = descriptor
            .target
            .clone()
            .log_statements(tracing::log::LevelFilter::Debug)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1));

        let conn = PgConnection::connect_with(&options)
            .await
            .context("failed to open postgres connection")?;
        Ok(PgProbeConnection(conn))
    }
}

/// Dropping the inner `PgConnection` closes its socket.
pub struct PgProbeConnection(PgConnection);

#[async_trait]
impl ProbeConnection for PgProbeConnection {
    async fn fetch_first_text(&mut self, sql: &str, column: &str) -> anyhow::Result<Option<String>> {
        let Some(row) = sqlx::query(sql)
            .fetch_optional(&mut self.0)
            .await
            .context("statement failed")?
        else {
            return Ok(None);
        };

        let value: Option<String> = row
            .try_get(column)
            .with_context(|| format!("failed to read column `{column}` as text"))?;
        value
            .map(Some)
            .ok_or_else(|| anyhow!("column `{column}` is NULL in the first row"))
    }

    async fn close(self) -> anyhow::Result<()> {
        self.0
            .close()
            .await
            .context("failed to close postgres connection gracefully")
    }
}
