//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A node the backend draws into is missing from the host page.
    #[error("Missing host node: {0}")]
    MissingNode(String),

    /// The host refused a node or attribute update.
    #[error("Host update failed: {0}")]
    Host(String),
}
