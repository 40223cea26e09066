use std::sync::Arc;

use reqwest::Url;

use crate::client::InnerClient;
use crate::resources::{Table, TableList};
use crate::{Error, validate_response};

/// Listing pages max out at 1000 entries server-side.
const MAX_PAGE_SIZE: usize = 1000;

/// Client scoped to a single dataset.
#[derive(Debug, Clone)]
pub struct DatasetClient {
    inner: Arc<InnerClient>,
    dataset_id: Box<str>,
    max_page_size: Option<usize>,
}

impl DatasetClient {
    pub(crate) fn from_parts(inner: Arc<InnerClient>, dataset_id: Box<str>) -> Self {
        Self {
            inner,
            dataset_id,
            max_page_size: None,
        }
    }

    #[inline]
    pub fn project_id(&self) -> &str {
        self.inner.project_id()
    }

    #[inline]
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Caps the number of entries per listing page (the `maxResults` query
    /// parameter), clamped to the server-side limit.
    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max.clamp(1, MAX_PAGE_SIZE));
        self
    }

    fn tables_url(&self) -> Url {
        self.inner
            .make_url(["datasets", self.dataset_id.as_ref(), "tables"])
    }

    /// Fetches one page of the dataset's table listing.
    ///
    /// Passing the previous response's `next_page_token` resumes where that
    /// page left off; `None` starts from the beginning. Driving the
    /// continuation loop is the caller's job.
    pub async fn table_page(&self, page_token: Option<&str>) -> Result<TableList, Error> {
        let mut builder = self
            .inner
            .request(reqwest::Method::GET, self.tables_url())
            .await?;

        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }

        if let Some(max) = self.max_page_size {
            builder = builder.query(&[("maxResults", max)]);
        }

        let resp = builder.send().await?;
        let page: TableList = validate_response(resp).await?.json().await?;

        tracing::debug!(
            dataset = self.dataset_id.as_ref(),
            tables = page.tables.len(),
            more = page.next_page_token.is_some(),
            "fetched table listing page"
        );

        Ok(page)
    }

    /// Fetches the full metadata for one table.
    pub async fn get_table(&self, table_id: &str) -> Result<Table, Error> {
        let url = self
            .inner
            .make_url(["datasets", self.dataset_id.as_ref(), "tables", table_id]);

        let builder = self.inner.request(reqwest::Method::GET, url).await?;
        let resp = builder.send().await?;

        validate_response(resp)
            .await?
            .json()
            .await
            .map_err(Error::from)
    }
}
