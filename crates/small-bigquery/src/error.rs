use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;

/// Errors surfaced by the REST client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credential resolution or token refresh failed.
    #[error(transparent)]
    Auth(#[from] gcp_auth::Error),
    #[error(transparent)]
    NotFound(ErrorPayload),
    #[error(transparent)]
    PermissionDenied(ErrorPayload),
    #[error(transparent)]
    BadRequest(ErrorPayload),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    /// Errors that indicate an issue with this API wrapper itself, rather
    /// than the request or the service.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// The Google error payload, for the variants that carry one.
    pub const fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::NotFound(payload)
            | Self::PermissionDenied(payload)
            | Self::BadRequest(payload) => Some(payload),
            _ => None,
        }
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(value: InvalidHeaderValue) -> Self {
        Self::Internal(InternalError::InvalidHeader(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Internal(InternalError::Json(value))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidHeader(#[from] InvalidHeaderValue),
}

/// Validates that the response has a 2XX status and passes it back as [`Ok`],
/// or consumes the response and builds the appropriate [`Error`].
pub(crate) async fn validate_response(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();

    macro_rules! extract_error {
        ($kind:ident : $status:expr, $resp:expr) => {{
            let bytes = $resp.bytes().await?;
            let payload = ErrorPayload::from_raw_parts($status, bytes)?;
            Error::$kind(payload)
        }};
    }

    match status.as_u16() {
        404 => Err(extract_error!(NotFound: status, resp)),
        401 | 403 => Err(extract_error!(PermissionDenied: status, resp)),
        400..=499 => Err(extract_error!(BadRequest: status, resp)),
        _ => resp.error_for_status().map_err(Error::Reqwest),
    }
}

/// Generic error payloads sent back from Google.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorPayload {
    code: u16,
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

impl ErrorPayload {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    fn from_raw_parts(status: StatusCode, payload: Bytes) -> Result<Self, InternalError> {
        // use the leading non-whitespace byte to hint at what kind of payload
        // the service sent back.
        match payload.trim_ascii_start().first().copied() {
            // likely a nested google-format error message
            Some(b'{') => match serde_json::from_slice::<NestedPayload>(&payload) {
                Ok(NestedPayload { error }) => Ok(error),
                Err(error) => Err(InternalError::Json(error)),
            },
            // any other leading byte is likely text (proxies, load balancers)
            Some(_) => Ok(Self {
                code: status.as_u16(),
                message: String::from_utf8_lossy(&payload).into_owned(),
                errors: Vec::new(),
            }),
            // empty/whitespace body, use the status itself so the message is
            // never empty.
            None => Ok(Self {
                code: status.as_u16(),
                message: String::from(status.as_str()),
                errors: Vec::new(),
            }),
        }
    }

    pub const fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[ErrorDetail] {
        &self.errors
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();

        f.write_str("error code ")?;
        f.write_str(buf.format(self.code))?;
        f.write_str(": ")?;
        f.write_str(&self.message)?;

        // if there's more errors than just the 1, say so
        if self.errors.len() > 1 {
            f.write_str(" and ")?;
            f.write_str(buf.format(self.errors.len() - 1))?;
            f.write_str(" others...")
        } else {
            Ok(())
        }
    }
}

impl std::error::Error for ErrorPayload {}

/// One entry of the `errors` array inside a Google error payload.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorDetail {
    message: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

impl ErrorDetail {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

#[derive(serde::Deserialize)]
struct NestedPayload {
    error: ErrorPayload,
}
