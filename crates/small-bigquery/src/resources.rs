//! The subset of BigQuery v2 REST resources this crate reads.
//!
//! Field names follow the wire format (camelCase); int64 values arrive as
//! decimal strings, per the API's JSON mapping.

/// Identifier triple locating one table within a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: Box<str>,
    pub dataset_id: Box<str>,
    pub table_id: Box<str>,
}

impl TableReference {
    pub fn new(
        project_id: impl Into<Box<str>>,
        dataset_id: impl Into<Box<str>>,
        table_id: impl Into<Box<str>>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            table_id: table_id.into(),
        }
    }
}

/// A table, as returned by both the listing and get calls.
///
/// Listing responses carry a partial view; size fields only show up once the
/// table is fetched directly.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Box<str>>,
    pub table_reference: TableReference,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TableKind>,
    /// Storage bytes, as a decimal string. Kept undecoded so callers decide
    /// how to treat missing or malformed values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_bytes: Option<Box<str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableKind {
    Table,
    View,
    External,
    MaterializedView,
    Snapshot,
}

/// One page of a dataset's table listing.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    /// Continuation cursor; absent (or empty) on the final page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<Box<str>>,
    /// Datasets with no tables omit the key entirely.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<Table>,
}
