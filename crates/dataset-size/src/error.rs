use small_bigquery::GcpAuthError;

/// Errors from the size computation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input validation failed; nothing was sent anywhere.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Credential resolution failed.
    #[error(transparent)]
    Auth(GcpAuthError),
    /// A listing or table fetch call failed.
    #[error(transparent)]
    Transport(small_bigquery::Error),
    /// A table reported an unusable `numBytes` value and [`MissingSize::Fail`]
    /// was selected.
    ///
    /// [`MissingSize::Fail`]: crate::MissingSize::Fail
    #[error("table {table} reported an unusable numBytes value: {raw:?}")]
    MalformedSize {
        table: Box<str>,
        /// The raw wire value; [`None`] when the field was missing entirely.
        raw: Option<Box<str>>,
    },
}

impl From<small_bigquery::Error> for Error {
    fn from(err: small_bigquery::Error) -> Self {
        // keep credential failures in their own class, everything else the
        // collaborator reports is a failed call
        match err {
            small_bigquery::Error::Auth(auth) => Self::Auth(auth),
            other => Self::Transport(other),
        }
    }
}
