//! Download failure taxonomy.

use std::error::Error as StdError;

use crate::models::FailureKind;

/// Errors that can occur while fetching or saving a book
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The fetch was cancelled through the progress indicator
    #[error("Download cancelled")]
    Cancelled,

    /// The server's TLS certificate has expired
    #[error("Certificate has expired: {0}")]
    CertificateExpired(String),

    /// The source URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("Server returned status {0}")]
    Status(u16),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DownloadError {
    /// Classify a reqwest error, recognising expired certificates anywhere in its cause chain
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if is_certificate_expired(err) {
            return DownloadError::CertificateExpired(error_chain(err));
        }
        if let Some(status) = err.status() {
            return DownloadError::Status(status.as_u16());
        }
        DownloadError::Network(error_chain(err))
    }

    /// Presentation class of this error
    pub fn kind(&self) -> FailureKind {
        match self {
            DownloadError::Cancelled => FailureKind::Cancelled,
            DownloadError::CertificateExpired(_) => FailureKind::CertificateExpired,
            _ => FailureKind::Other,
        }
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        DownloadError::from_reqwest(&err)
    }
}

/// Whether `err` or any of its sources reports an expired certificate
///
/// OpenSSL/native-tls say "certificate has expired", rustls reports an
/// invalid peer certificate of kind `Expired`.
pub fn is_certificate_expired(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = current {
        let message = e.to_string().to_lowercase();
        if message.contains("certificate has expired")
            || message.contains("certificate expired")
            || (message.contains("invalid peer certificate") && message.contains("expired"))
        {
            return true;
        }
        current = e.source();
    }
    false
}

/// Render an error together with its sources, outermost first
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(e) = current {
        let text = e.to_string();
        if !parts.contains(&text) {
            parts.push(text);
        }
        current = e.source();
    }
    parts.join(": ")
}
