//! Transport-independent authentication via [`Auth`].

use std::fmt;
use std::sync::Arc;

use http::HeaderValue;

use crate::{Error, Scope};

/// Produces `Bearer` authorization header values for a single scope.
///
/// Cheap to clone; all clones share the same underlying token provider.
#[derive(Clone)]
pub struct Auth {
    project_id: Arc<str>,
    scope: Scope,
    provider: Provider,
}

#[derive(Clone)]
enum Provider {
    /// Credentials resolved by [`gcp_auth`]: service account files, local
    /// gcloud credentials, or the metadata server.
    Live(Arc<dyn gcp_auth::TokenProvider>),
    /// A fixed, pre-rendered header. Used against emulators and local test
    /// servers, where there is nothing to refresh.
    Static(HeaderValue),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("project_id", &self.project_id)
            .field("scope", &self.scope.as_str())
            .finish_non_exhaustive()
    }
}

impl Auth {
    /// Resolves application-default credentials for `project_id`.
    pub async fn new(project_id: impl Into<Arc<str>>, scope: Scope) -> Result<Self, Error> {
        let provider = gcp_auth::provider().await?;

        Ok(Self {
            project_id: project_id.into(),
            scope,
            provider: Provider::Live(provider),
        })
    }

    /// Builds an [`Auth`] around a fixed token, skipping credential discovery
    /// entirely.
    pub fn new_static(
        project_id: impl Into<Arc<str>>,
        scope: Scope,
        token: &str,
    ) -> Result<Self, Error> {
        Ok(Self {
            project_id: project_id.into(),
            scope,
            provider: Provider::Static(build_header(token)?),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Renders the `Bearer` header for the configured scope.
    ///
    /// Token caching and refresh live inside the [`gcp_auth`] providers, so
    /// calling this per request does not hit the credential backend each time.
    pub async fn get_header(&self) -> Result<HeaderValue, Error> {
        match &self.provider {
            Provider::Static(header) => Ok(header.clone()),
            Provider::Live(provider) => {
                let token = provider.token(&[self.scope.scope_uri()]).await?;
                tracing::trace!(scope = self.scope.as_str(), "fetched access token");
                build_header(token.as_str())
            }
        }
    }
}

fn build_header(token: &str) -> Result<HeaderValue, Error> {
    const BEARER_PREFIX: &str = "Bearer ";

    let mut dst = bytes::BytesMut::with_capacity(BEARER_PREFIX.len() + token.len());
    dst.extend_from_slice(BEARER_PREFIX.as_bytes());
    dst.extend_from_slice(token.as_bytes());

    HeaderValue::from_maybe_shared(dst.freeze()).map_err(Error::from)
}
