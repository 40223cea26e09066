//! The calculator itself: paginate the listing, fan out metadata fetches,
//! sum the byte counts.

use futures::future::try_join_all;
use small_bigquery::resources::{Table, TableReference};
use small_bigquery::{BigQueryClient, Scope};

use crate::tables::DatasetTables;
use crate::{Error, Result};

/// How to treat a table whose `numBytes` is missing or not a decimal string.
///
/// Ordinary tables always report a size, but views and external tables can
/// come back without one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingSize {
    /// Count the table as zero bytes and keep going (logs a warning).
    #[default]
    Zero,
    /// Fail the whole computation with [`Error::MalformedSize`].
    Fail,
}

/// Knobs for [`dataset_size_mb`] and [`total_megabytes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeOptions {
    pub missing_size: MissingSize,
    /// Cap on listing page sizes (`maxResults`); the service picks its own
    /// page size when [`None`].
    pub max_page_size: Option<usize>,
}

/// Computes the total size of `dataset_id` in (decimal) megabytes.
///
/// Resolves application-default credentials, lists every table in the
/// dataset, fetches each table's metadata concurrently, and sums the
/// reported byte counts. The first failure at any stage aborts the whole
/// computation; partial totals are never returned.
pub async fn dataset_size_mb(
    project_id: &str,
    dataset_id: &str,
    options: SizeOptions,
) -> Result<f64> {
    if project_id.trim().is_empty() {
        return Err(Error::InvalidArgument("project id must be non-empty"));
    }
    if dataset_id.trim().is_empty() {
        return Err(Error::InvalidArgument("dataset id must be non-empty"));
    }

    let client = BigQueryClient::new(project_id, Scope::BigQueryReadOnly).await?;

    let mut dataset = client.dataset(dataset_id);
    if let Some(max) = options.max_page_size {
        dataset = dataset.with_max_page_size(max);
    }

    total_megabytes(&dataset, options).await
}

/// Sums the sizes of every table reachable through `tables`, in megabytes.
///
/// This is [`dataset_size_mb`] minus the credential and client setup, so the
/// whole computation can run against an in-memory [`DatasetTables`].
pub async fn total_megabytes<T: DatasetTables>(tables: &T, options: SizeOptions) -> Result<f64> {
    let refs = list_all_tables(tables).await?;
    tracing::debug!(tables = refs.len(), "dataset listing complete");

    let bytes = sum_table_bytes(tables, &refs, options.missing_size).await?;

    Ok(bytes as f64 / 1_000_000.0)
}

/// Drains the listing into one vector of table references, following
/// continuation tokens until the service stops returning them.
async fn list_all_tables<T: DatasetTables>(tables: &T) -> Result<Vec<TableReference>> {
    let mut refs = Vec::new();
    let mut page_token: Option<Box<str>> = None;

    loop {
        let page = tables.table_page(page_token.as_deref()).await?;

        refs.extend(page.tables.into_iter().map(|table| table.table_reference));

        match page.next_page_token {
            // an empty token means the same thing as a missing one
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => return Ok(refs),
        }
    }
}

/// Fetches every table's metadata concurrently and sums the byte counts.
///
/// The sum is carried in a `u128`: each `numBytes` fits in a `u64`, but a
/// dataset's total does not have to.
async fn sum_table_bytes<T: DatasetTables>(
    tables: &T,
    refs: &[TableReference],
    missing_size: MissingSize,
) -> Result<u128> {
    let fetched = try_join_all(
        refs.iter()
            .map(|table_ref| tables.get_table(&table_ref.table_id)),
    )
    .await?;

    let mut total: u128 = 0;
    for table in &fetched {
        total += u128::from(table_bytes(table, missing_size)?);
    }

    Ok(total)
}

/// Reads the `numBytes` decimal string off a fetched table.
fn table_bytes(table: &Table, missing_size: MissingSize) -> Result<u64> {
    let parsed = table
        .num_bytes
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u64>().ok());

    match parsed {
        Some(bytes) => Ok(bytes),
        None => match missing_size {
            MissingSize::Zero => {
                tracing::warn!(
                    table = table.table_reference.table_id.as_ref(),
                    raw = ?table.num_bytes,
                    "table reported no usable numBytes, counting as zero"
                );
                Ok(0)
            }
            MissingSize::Fail => Err(Error::MalformedSize {
                table: table.table_reference.table_id.clone(),
                raw: table.num_bytes.clone(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use small_bigquery::error::ErrorPayload;
    use small_bigquery::resources::{Table, TableKind, TableList, TableReference};

    use super::*;

    /// In-memory stand-in for the listing + metadata surface. Listing calls
    /// walk `pages` in order; metadata fetches resolve against `tables`.
    #[derive(Default)]
    struct FakeTables {
        pages: Vec<FakePage>,
        tables: HashMap<&'static str, FakeTable>,
        calls: Mutex<Calls>,
    }

    enum FakePage {
        Page(Vec<&'static str>, Option<&'static str>),
        Fail,
    }

    enum FakeTable {
        Bytes(&'static str),
        NoSize,
        Fail,
    }

    #[derive(Default)]
    struct Calls {
        page_tokens: Vec<Option<String>>,
        fetched: Vec<String>,
    }

    impl FakeTables {
        /// One listing page of `(table id, numBytes)` entries.
        fn sized(entries: &[(&'static str, &'static str)]) -> Self {
            FakeTables {
                pages: vec![FakePage::Page(
                    entries.iter().map(|&(id, _)| id).collect(),
                    None,
                )],
                tables: entries
                    .iter()
                    .map(|&(id, raw)| (id, FakeTable::Bytes(raw)))
                    .collect(),
                calls: Mutex::default(),
            }
        }

        fn page_tokens(&self) -> Vec<Option<String>> {
            self.calls.lock().unwrap().page_tokens.clone()
        }

        fn fetched(&self) -> Vec<String> {
            self.calls.lock().unwrap().fetched.clone()
        }
    }

    impl DatasetTables for FakeTables {
        async fn table_page(&self, page_token: Option<&str>) -> Result<TableList> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.page_tokens.push(page_token.map(str::to_owned));
                calls.page_tokens.len() - 1
            };

            match self.pages.get(index) {
                Some(FakePage::Page(ids, next)) => Ok(TableList {
                    next_page_token: (*next).map(Box::from),
                    tables: ids.iter().map(|id| listed(id)).collect(),
                }),
                Some(FakePage::Fail) => Err(call_failed()),
                None => panic!("unexpected listing request for page {index}"),
            }
        }

        async fn get_table(&self, table_id: &str) -> Result<Table> {
            self.calls.lock().unwrap().fetched.push(table_id.to_owned());

            match self.tables.get(table_id) {
                Some(FakeTable::Bytes(raw)) => Ok(Table {
                    num_bytes: Some(Box::from(*raw)),
                    ..listed(table_id)
                }),
                Some(FakeTable::NoSize) => Ok(listed(table_id)),
                Some(FakeTable::Fail) => Err(call_failed()),
                None => panic!("metadata fetch for unknown table {table_id}"),
            }
        }
    }

    fn listed(table_id: &str) -> Table {
        Table {
            table_reference: TableReference::new("proj", "ds", table_id),
            kind: Some(TableKind::Table),
            ..Table::default()
        }
    }

    fn call_failed() -> Error {
        Error::Transport(small_bigquery::Error::BadRequest(ErrorPayload::new(
            400,
            "injected failure",
        )))
    }

    #[tokio::test]
    async fn two_tables_sum_to_five_megabytes() {
        let fake = FakeTables::sized(&[("sales", "2000000"), ("inventory", "3000000")]);

        let mb = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap();

        assert_eq!(mb, 5.0);
        assert_eq!(fake.fetched(), ["sales", "inventory"]);
    }

    #[tokio::test]
    async fn empty_dataset_totals_zero() {
        let fake = FakeTables {
            pages: vec![FakePage::Page(Vec::new(), None)],
            ..FakeTables::default()
        };

        let mb = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap();

        assert_eq!(mb, 0.0);
        assert!(fake.fetched().is_empty());
    }

    #[tokio::test]
    async fn listing_follows_continuation_tokens() {
        let fake = FakeTables {
            pages: vec![
                FakePage::Page(vec!["t1"], Some("page-2")),
                FakePage::Page(vec!["t2"], Some("page-3")),
                FakePage::Page(vec!["t3"], None),
            ],
            tables: HashMap::from([
                ("t1", FakeTable::Bytes("1000000")),
                ("t2", FakeTable::Bytes("2000000")),
                ("t3", FakeTable::Bytes("3000000")),
            ]),
            calls: Mutex::default(),
        };

        let mb = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap();

        assert_eq!(mb, 6.0);
        assert_eq!(
            fake.page_tokens(),
            [None, Some("page-2".to_owned()), Some("page-3".to_owned())]
        );
        assert_eq!(fake.fetched(), ["t1", "t2", "t3"]);
    }

    #[tokio::test]
    async fn empty_continuation_token_ends_the_listing() {
        let fake = FakeTables {
            pages: vec![FakePage::Page(vec!["t1"], Some(""))],
            tables: HashMap::from([("t1", FakeTable::Bytes("1000000"))]),
            calls: Mutex::default(),
        };

        let mb = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap();

        assert_eq!(mb, 1.0);
        assert_eq!(fake.page_tokens().len(), 1);
    }

    #[tokio::test]
    async fn listing_failure_aborts_before_any_metadata_fetch() {
        let fake = FakeTables {
            pages: vec![
                FakePage::Page(vec!["t1"], Some("page-2")),
                FakePage::Fail,
            ],
            tables: HashMap::from([("t1", FakeTable::Bytes("1000000"))]),
            calls: Mutex::default(),
        };

        let err = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        // the page-one results must not leak into any metadata fetches
        assert!(fake.fetched().is_empty());
    }

    #[tokio::test]
    async fn metadata_fetch_failure_fails_the_total() {
        let fake = FakeTables {
            pages: vec![FakePage::Page(vec!["ok1", "bad", "ok2"], None)],
            tables: HashMap::from([
                ("ok1", FakeTable::Bytes("1000000")),
                ("bad", FakeTable::Fail),
                ("ok2", FakeTable::Bytes("3000000")),
            ]),
            calls: Mutex::default(),
        };

        let err = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn missing_num_bytes_counts_as_zero_by_default() {
        let fake = FakeTables {
            pages: vec![FakePage::Page(vec!["sized", "view"], None)],
            tables: HashMap::from([
                ("sized", FakeTable::Bytes("2000000")),
                ("view", FakeTable::NoSize),
            ]),
            calls: Mutex::default(),
        };

        let mb = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap();

        assert_eq!(mb, 2.0);
    }

    #[tokio::test]
    async fn malformed_num_bytes_counts_as_zero_by_default() {
        let fake = FakeTables::sized(&[("sized", "2000000"), ("odd", "12MB")]);

        let mb = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap();

        assert_eq!(mb, 2.0);
    }

    #[tokio::test]
    async fn strict_mode_rejects_missing_num_bytes() {
        let fake = FakeTables {
            pages: vec![FakePage::Page(vec!["view"], None)],
            tables: HashMap::from([("view", FakeTable::NoSize)]),
            calls: Mutex::default(),
        };
        let options = SizeOptions {
            missing_size: MissingSize::Fail,
            ..SizeOptions::default()
        };

        match total_megabytes(&fake, options).await.unwrap_err() {
            Error::MalformedSize { table, raw } => {
                assert_eq!(table.as_ref(), "view");
                assert_eq!(raw, None);
            }
            other => panic!("expected MalformedSize, got {other}"),
        }
    }

    #[tokio::test]
    async fn strict_mode_rejects_malformed_num_bytes() {
        let fake = FakeTables::sized(&[("odd", "12MB")]);
        let options = SizeOptions {
            missing_size: MissingSize::Fail,
            ..SizeOptions::default()
        };

        match total_megabytes(&fake, options).await.unwrap_err() {
            Error::MalformedSize { table, raw } => {
                assert_eq!(table.as_ref(), "odd");
                assert_eq!(raw.as_deref(), Some("12MB"));
            }
            other => panic!("expected MalformedSize, got {other}"),
        }
    }

    #[tokio::test]
    async fn total_is_independent_of_listing_order() {
        let forward = FakeTables::sized(&[("a", "1500000"), ("b", "2500000"), ("c", "4000000")]);
        let reversed = FakeTables::sized(&[("c", "4000000"), ("b", "2500000"), ("a", "1500000")]);

        let forward_mb = total_megabytes(&forward, SizeOptions::default())
            .await
            .unwrap();
        let reversed_mb = total_megabytes(&reversed, SizeOptions::default())
            .await
            .unwrap();

        assert_eq!(forward_mb, 8.0);
        assert_eq!(forward_mb, reversed_mb);
    }

    #[tokio::test]
    async fn gigantic_totals_do_not_overflow() {
        // two tables at u64::MAX bytes each overflow a u64 sum
        let max = "18446744073709551615";
        let fake = FakeTables::sized(&[("huge1", max), ("huge2", max)]);

        let mb = total_megabytes(&fake, SizeOptions::default())
            .await
            .unwrap();

        let expected = (u128::from(u64::MAX) * 2) as f64 / 1_000_000.0;
        assert_eq!(mb, expected);
    }

    #[tokio::test]
    async fn blank_project_id_is_rejected_up_front() {
        for project_id in ["", "   "] {
            let err = dataset_size_mb(project_id, "ds", SizeOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn blank_dataset_id_is_rejected_up_front() {
        let err = dataset_size_mb("proj", "\t ", SizeOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
