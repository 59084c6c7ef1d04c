/// Core error type for the realty gateway.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown chiller provider '{provider}', supported: {supported}")]
    UnknownProvider { provider: String, supported: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("{service} is unreachable: {reason}")]
    UpstreamUnavailable { service: &'static str, reason: String },

    #[error("{service} returned HTTP {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    #[error("{service} returned a malformed payload")]
    UpstreamPayload { service: &'static str },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller is at fault (bad input) rather than the gateway or an upstream.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownProvider { .. } | Self::InvalidInput(_))
    }
}
