//! Accessibility errors

use fos_dom::DomError;

/// Result alias for accessibility operations
pub type Result<T> = std::result::Result<T, A11yError>;

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("unsupported ARIA relationship attribute {attribute:?}, expected one of: {valid}")]
    UnsupportedAttribute { attribute: String, valid: String },

    #[error("sync() called while the owning component is not mounted")]
    InvalidSyncState,

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
