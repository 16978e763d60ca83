use thiserror::Error;

use crate::sql::RenderError;

/// Failure taxonomy for alert queries.
///
/// The HTTP layer maps `InvalidInput` to 400 and `NotFound` to 404. `Remote`
/// and `Render` (a broken template) become 5xx responses.
#[derive(Debug, Error)]
pub enum AlertsError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("remote query failed: {0:#}")]
    Remote(#[source] anyhow::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AlertsError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
