//! VaaS API Errors
//!
//! Error kinds surfaced by the client: transport failures, non-2xx API
//! responses, filter misses and decode failures. No error is retried.

/// Errors returned by VaaS API operations.
#[derive(Debug, thiserror::Error)]
pub enum VaasError {
    /// Connection, DNS or timeout failure from the HTTP transport.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("VaaS API error at {url} (HTTP {status}): {body}")]
    Api {
        url: String,
        status: u16,
        body: String,
    },

    /// A listing succeeded but no element matched the requested filter.
    #[error("no {resource} matching {query} found")]
    NotFound {
        resource: &'static str,
        query: String,
    },

    /// A successful response carried malformed JSON.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Director resolution failed while deriving an identifier.
    #[error("cannot determine director ID: {0}")]
    DirectorLookup(#[source] Box<VaasError>),
}

impl VaasError {
    /// Build a filter-miss error for a resource kind and query.
    pub fn not_found(resource: &'static str, query: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            query: query.into(),
        }
    }

    /// Whether this error is a filter miss (directly or behind a director
    /// lookup wrapper) rather than a transport or API failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::DirectorLookup(source) => source.is_not_found(),
            _ => false,
        }
    }
}
