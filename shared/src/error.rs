use thiserror::Error;

/// A collaborator fetch failure.
///
/// Callers keep serving the last good snapshot when they see this;
/// a transient failure must never read as "zero entitlement".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },
}
