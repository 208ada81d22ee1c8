//! Validated SQL identifiers and the schema-qualified table the probe reads.
//!
//! Table and column names come from configuration and end up interpolated into
//! the statement text, so they are restricted to plain Postgres identifiers and
//! always emitted double-quoted.

use std::fmt;

/// Postgres truncates identifiers longer than `NAMEDATALEN - 1` bytes.
const MAX_IDENTIFIER_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier `{0}` exceeds {MAX_IDENTIFIER_LEN} bytes")]
    TooLong(String),
    #[error("identifier `{name}` contains invalid character {ch:?}")]
    InvalidChar { name: String, ch: char },
    #[error("identifier `{0}` must start with a letter or underscore")]
    InvalidStart(String),
}

/// A bare Postgres identifier: `[A-Za-z_][A-Za-z0-9_$]*`, at most 63 bytes.
///
/// Stored lowercased, the way Postgres folds an unquoted name, so `Users`
/// names the same table in quoted SQL as it would unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier(pub(crate) String);

impl Identifier {
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(IdentifierError::Empty);
        };
        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(IdentifierError::TooLong(name));
        }
        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(IdentifierError::InvalidStart(name));
        }
        if let Some(ch) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$')) {
            return Err(IdentifierError::InvalidChar { name, ch });
        }
        Ok(Self(name.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier wrapped in double quotes, safe to splice into SQL.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A schema-qualified table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Identifier,
    pub table: Identifier,
}

impl TableRef {
    pub fn new(schema: &str, table: &str) -> Result<Self, IdentifierError> {
        Ok(Self {
            schema: Identifier::new(schema)?,
            table: Identifier::new(table)?,
        })
    }

    /// Parse `table` or `schema.table`, using `default_schema` for the bare form.
    pub fn parse(input: &str, default_schema: &str) -> Result<Self, IdentifierError> {
        match input.split_once('.') {
            Some((schema, table)) => Self::new(schema, table),
            None => Self::new(default_schema, input),
        }
    }

    /// The one statement the probe issues.
    pub fn select_first_row(&self) -> String {
        format!(
            "SELECT * FROM {}.{} LIMIT 1",
            self.schema.quoted(),
            self.table.quoted()
        )
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}
