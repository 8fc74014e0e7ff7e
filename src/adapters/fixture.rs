//! In-memory record source.
//!
//! Serves tables from a JSON document shaped like
//! `{"library_items": [...], "questions": [...]}`, applying the same
//! ordering, equality filtering and offset/limit paging as the backend.
//! Inserted records are kept so callers can inspect them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::{PageQuery, RecordSource, SourceError, Table};

/// Fixture-backed record source
#[derive(Default)]
pub struct FixtureSource {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
}

impl FixtureSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a JSON document keyed by table name
    pub fn from_json(document: &str) -> Result<Self> {
        let parsed: BTreeMap<String, Vec<Value>> =
            serde_json::from_str(document).context("Failed to parse fixture JSON")?;

        let mut tables = HashMap::new();
        for (name, records) in parsed {
            let table: Table = name.parse()?;
            tables.insert(table, records);
        }

        Ok(Self {
            tables: Mutex::new(tables),
        })
    }

    /// Load a fixture file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fixture: {}", path.display()))?;

        Self::from_json(&content).with_context(|| format!("Invalid fixture: {}", path.display()))
    }

    /// Add records to a table (builder style)
    pub fn with_records(mut self, table: Table, records: impl IntoIterator<Item = Value>) -> Self {
        self.tables
            .get_mut()
            .entry(table)
            .or_default()
            .extend(records);
        self
    }

    /// Snapshot of a table's contents
    pub async fn records(&self, table: Table) -> Vec<Value> {
        self.tables
            .lock()
            .await
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }
}

fn matches_filters(record: &Value, filters: &BTreeMap<String, String>) -> bool {
    filters.iter().all(|(column, expected)| match record.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == *expected,
        None => false,
    })
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn project(record: Value, columns: Option<&Vec<String>>) -> Value {
    match (columns, record) {
        (Some(columns), Value::Object(fields)) => Value::Object(
            fields
                .into_iter()
                .filter(|(key, _)| columns.contains(key))
                .collect(),
        ),
        (_, record) => record,
    }
}

#[async_trait]
impl RecordSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Value>, SourceError> {
        let tables = self.tables.lock().await;
        let Some(records) = tables.get(&query.table) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<&Value> = records
            .iter()
            .filter(|r| matches_filters(r, &query.filters))
            .collect();

        // Stable sort keeps insertion order among equal keys
        matching.sort_by(|a, b| {
            let ord = compare_field(a, b, &query.order_by);
            if query.descending {
                ord.reverse()
            } else {
                ord
            }
        });

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|r| project(r.clone(), query.columns.as_ref()))
            .collect())
    }

    async fn insert(&self, table: Table, record: Value) -> Result<(), SourceError> {
        self.tables.lock().await.entry(table).or_default().push(record);
        Ok(())
    }
}
