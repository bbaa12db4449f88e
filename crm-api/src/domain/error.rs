use thiserror::Error;

/// Errors returned by every repository and service, regardless of backend.
#[derive(Debug, Error)]
pub enum CrmError {
    #[error("{collection} not found: {id}")]
    NotFound { collection: &'static str, id: String },
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl CrmError {
    pub fn not_found(collection: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Rejects blank required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), CrmError> {
    if value.trim().is_empty() {
        return Err(CrmError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}
