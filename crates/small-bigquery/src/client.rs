use std::sync::Arc;

use http::header::AUTHORIZATION;
use reqwest::Url;

use crate::auth::Auth;
use crate::dataset::DatasetClient;
use crate::{Error, Scope};

/// <https://cloud.google.com/bigquery/docs/reference/rest>
pub const BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

#[derive(Debug, Clone)]
pub struct BigQueryClient {
    inner: Arc<InnerClient>,
}

#[derive(Debug)]
pub(crate) struct InnerClient {
    client: reqwest::Client,
    auth: Auth,
    /// `{base}/projects/{project_id}`, precomputed since every route starts
    /// with it.
    base_url: Url,
}

impl BigQueryClient {
    /// Connects to the live service using application-default credentials.
    pub async fn new(project_id: &str, scope: Scope) -> Result<Self, Error> {
        let auth = Auth::new(project_id, scope).await?;
        let base_url = Url::parse(BASE_URL).expect("base url is valid");
        Self::from_parts(auth, base_url)
    }

    /// Builds a client from an existing [`Auth`] handle and a base URL.
    ///
    /// The base URL override is how tests and emulator setups point the
    /// client somewhere other than the live service.
    pub fn from_parts(auth: Auth, mut base_url: Url) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("small-bigquery")
            .build()?;

        base_url
            .path_segments_mut()
            .expect("can be a base")
            .pop_if_empty()
            .extend(["projects", auth.project_id()]);

        Ok(Self {
            inner: Arc::new(InnerClient {
                client,
                auth,
                base_url,
            }),
        })
    }

    #[inline]
    pub fn project_id(&self) -> &str {
        self.inner.project_id()
    }

    /// Narrows to a handle scoped to one dataset.
    pub fn dataset(&self, dataset_id: impl Into<Box<str>>) -> DatasetClient {
        DatasetClient::from_parts(Arc::clone(&self.inner), dataset_id.into())
    }
}

impl InnerClient {
    pub(crate) fn project_id(&self) -> &str {
        self.auth.project_id()
    }

    /// Extends the base URL with extra path segments.
    ///
    /// Segments are percent-encoded individually, so an id containing `/` or
    /// `?` cannot rewrite the route.
    pub(crate) fn make_url<P>(&self, path: P) -> Url
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .expect("can be a base")
            .extend(path);

        url
    }

    /// Starts an authenticated request. The await is for the auth header,
    /// nothing is sent yet.
    pub(crate) async fn request(
        &self,
        method: reqwest::Method,
        url: Url,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let header = self.auth.get_header().await?;

        tracing::trace!(%method, url = url.as_str(), "building request");

        Ok(self
            .client
            .request(method, url)
            .header(AUTHORIZATION, header))
    }
}
