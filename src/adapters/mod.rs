//! Adapter interfaces for the hosted table service.
//!
//! Views never talk to the backend directly. They go through a
//! [`RecordSource`], which fetches ordered pages of raw JSON records and
//! inserts flat records. Two implementations ship with the crate:
//! - [`TableClient`]: the PostgREST-style REST API of the hosted backend
//! - [`FixtureSource`]: in-memory tables, loaded from JSON or built in code

pub mod fixture;
pub mod table;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use fixture::FixtureSource;
pub use table::{TableClient, TableConfig};

/// Errors that can occur while talking to a record source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// Tables the site reads from or writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    LibraryItems,
    Questions,
    ContactSubmissions,
    VolunteerSubmissions,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::LibraryItems => "library_items",
            Table::Questions => "questions",
            Table::ContactSubmissions => "contact_submissions",
            Table::VolunteerSubmissions => "volunteer_submissions",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Table {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, SourceError> {
        match s {
            "library_items" => Ok(Table::LibraryItems),
            "questions" => Ok(Table::Questions),
            "contact_submissions" => Ok(Table::ContactSubmissions),
            "volunteer_submissions" => Ok(Table::VolunteerSubmissions),
            other => Err(SourceError::UnknownTable(other.to_string())),
        }
    }
}

/// A request for one page of records
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub table: Table,

    /// Columns to select (`None` selects everything)
    pub columns: Option<Vec<String>>,

    /// Field to order by
    pub order_by: String,

    pub descending: bool,

    /// Zero-based index of the first record
    pub offset: usize,

    /// Maximum number of records to return
    pub limit: usize,

    /// Column equality filters (column -> value)
    pub filters: BTreeMap<String, String>,
}

impl PageQuery {
    /// Newest-first query over a table, starting at the first record
    pub fn newest_first(table: Table, limit: usize) -> Self {
        Self {
            table,
            columns: None,
            order_by: "created_at".to_string(),
            descending: true,
            offset: 0,
            limit,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(column.into(), value.into());
        self
    }

    pub fn at_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for record sources
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch one ordered page of raw records
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Value>, SourceError>;

    /// Insert a single flat record
    async fn insert(&self, table: Table, record: Value) -> Result<(), SourceError>;
}
