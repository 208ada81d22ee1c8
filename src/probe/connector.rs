//! Seams between the probe and the database driver.

use crate::probe::descriptor::ConnectionDescriptor;
use async_trait::async_trait;

/// Opens one fresh connection per call. Implementations must not pool or
/// reuse connections between calls.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: ProbeConnection;

    async fn connect(&self, descriptor: &ConnectionDescriptor) -> anyhow::Result<Self::Connection>;
}

/// An exclusively owned connection.
///
/// Dropping the value must release the underlying handle; `close` releases it
/// gracefully. Either way the handle is released exactly once.
#[async_trait]
pub trait ProbeConnection: Send + Sized {
    /// Run `sql` and decode `column` of the first row as text.
    ///
    /// `Ok(None)` means the statement returned no rows.
    async fn fetch_first_text(&mut self, sql: &str, column: &str) -> anyhow::Result<Option<String>>;

    async fn close(self) -> anyhow::Result<()>;
}
