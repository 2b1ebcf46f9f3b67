use crate::audit::{ExternalRecord, ExternalRecordSource, ExternalRow, RejectedRow};
use crate::error::SourceError;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn owned_by(row_owner: Option<&str>, owner: Option<&str>) -> bool {
    match owner {
        Some(owner) => row_owner == Some(owner),
        None => true,
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordSource {
    records: Vec<ExternalRecord>,
}

impl InMemoryRecordSource {
    pub fn new(records: Vec<ExternalRecord>) -> Self {
        Self { records }
    }

    pub fn insert(&mut self, record: ExternalRecord) {
        self.records.push(record);
    }
}

impl ExternalRecordSource for InMemoryRecordSource {
    fn fetch(&self, owner: Option<&str>) -> Result<Vec<ExternalRow>, SourceError> {
        Ok(self
            .records
            .iter()
            .filter(|r| owned_by(r.owner.as_deref(), owner))
            .cloned()
            .map(Ok)
            .collect())
    }
}

pub struct FnRecordSource<F> {
    fetch: F,
}

impl<F> FnRecordSource<F>
where
    F: Fn(Option<&str>) -> Result<Vec<ExternalRow>, SourceError>,
{
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F> ExternalRecordSource for FnRecordSource<F>
where
    F: Fn(Option<&str>) -> Result<Vec<ExternalRow>, SourceError>,
{
    fn fetch(&self, owner: Option<&str>) -> Result<Vec<ExternalRow>, SourceError> {
        (self.fetch)(owner)
    }
}

fn row_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn decode_row(index: usize, value: Value) -> ExternalRow {
    let id = row_id(&value);
    serde_json::from_value(value).map_err(|e| RejectedRow {
        index,
        row_id: id,
        message: e.to_string(),
    })
}

/// Reads a JSON or YAML array of records on every fetch.
///
/// Only a document that is not an array fails the fetch; each element is
/// decoded on its own so one bad row does not hide the others.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn parse(&self, raw: &str) -> Result<Vec<Value>, SourceError> {
        let ext = self
            .path
            .extension()
            .and_then(|v| v.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_str(raw).map_err(|e| SourceError::Parse(e.to_string()))
            }
            "json" => serde_json::from_str(raw).map_err(|e| SourceError::Parse(e.to_string())),
            _ => Err(SourceError::Parse(format!(
                "unsupported records extension '{ext}'; expected .yaml/.yml/.json"
            ))),
        }
    }
}

impl ExternalRecordSource for FileRecordSource {
    fn fetch(&self, owner: Option<&str>) -> Result<Vec<ExternalRow>, SourceError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| SourceError::Io(format!("{}: {e}", self.path.display())))?;
        let rows: Vec<ExternalRow> = self
            .parse(&raw)?
            .into_iter()
            .enumerate()
            .filter(|(_, value)| owned_by(value.get("owner").and_then(Value::as_str), owner))
            .map(|(index, value)| decode_row(index, value))
            .collect();
        let rejected = rows.iter().filter(|r| r.is_err()).count();
        tracing::debug!(
            path = %self.path.display(),
            rows = rows.len(),
            rejected,
            "external records read"
        );
        Ok(rows)
    }
}
