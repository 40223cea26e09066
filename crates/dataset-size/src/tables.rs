//! The collaborator seam between the calculator and the BigQuery API.

use std::future::Future;

use small_bigquery::DatasetClient;
use small_bigquery::resources::{Table, TableList};

use crate::Error;

/// The slice of the BigQuery surface the calculator needs: one listing page
/// at a time, plus per-table metadata fetches.
///
/// The production implementation is [`DatasetClient`]; tests plug in
/// in-memory fakes, so the calculator's behavior is checkable without
/// credentials or a network.
pub trait DatasetTables: Send + Sync {
    /// Fetches one listing page, resuming from `page_token` when present.
    fn table_page(
        &self,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<TableList, Error>> + Send;

    /// Fetches the full metadata for one table.
    fn get_table(&self, table_id: &str) -> impl Future<Output = Result<Table, Error>> + Send;
}

impl DatasetTables for DatasetClient {
    async fn table_page(&self, page_token: Option<&str>) -> Result<TableList, Error> {
        DatasetClient::table_page(self, page_token)
            .await
            .map_err(Error::from)
    }

    async fn get_table(&self, table_id: &str) -> Result<Table, Error> {
        DatasetClient::get_table(self, table_id)
            .await
            .map_err(Error::from)
    }
}
