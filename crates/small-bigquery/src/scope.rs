//! [`Scope`] enum for the OAuth scopes this crate can request.

/// Auth scopes usable with the BigQuery read paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    CloudPlatformAdmin,
    CloudPlatformReadOnly,
    BigQueryAdmin,
    BigQueryReadWrite,
    BigQueryReadOnly,
}

impl Scope {
    pub const CLOUD_PLATFORM_ADMIN: &'static str = "https://www.googleapis.com/auth/cloud-platform";

    pub const CLOUD_PLATFORM_READ_ONLY: &'static str =
        "https://www.googleapis.com/auth/cloud-platform.read-only";

    pub const BIG_QUERY_ADMIN: &'static str = "https://www.googleapis.com/auth/bigquery";
    pub const BIG_QUERY_READ_WRITE: &'static str =
        "https://www.googleapis.com/auth/bigquery.insertdata";
    pub const BIG_QUERY_READ_ONLY: &'static str =
        "https://www.googleapis.com/auth/bigquery.readonly";

    #[inline]
    pub const fn scope_uri(&self) -> &'static str {
        match self {
            Self::CloudPlatformAdmin => Self::CLOUD_PLATFORM_ADMIN,
            Self::CloudPlatformReadOnly => Self::CLOUD_PLATFORM_READ_ONLY,
            Self::BigQueryAdmin => Self::BIG_QUERY_ADMIN,
            Self::BigQueryReadWrite => Self::BIG_QUERY_READ_WRITE,
            Self::BigQueryReadOnly => Self::BIG_QUERY_READ_ONLY,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CloudPlatformAdmin => "CloudPlatformAdmin",
            Self::CloudPlatformReadOnly => "CloudPlatformReadOnly",
            Self::BigQueryAdmin => "BigQueryAdmin",
            Self::BigQueryReadWrite => "BigQueryReadWrite",
            Self::BigQueryReadOnly => "BigQueryReadOnly",
        }
    }
}
