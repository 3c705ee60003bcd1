//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Dependency error: {0}")]
    DependencyError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Version number {version_number} already taken for contract {contract_id}")]
    VersionNumberTaken { contract_id: Uuid, version_number: i32 },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Document render error: {0}")]
    RenderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        DomainError::NotFound { entity, id }
    }

    /// Machine-readable code reported to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ValidationError(_) => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::DependencyError(_) => "DEPENDENCY_ERROR",
            DomainError::Conflict(_) | DomainError::VersionNumberTaken { .. } => "CONFLICT",
            DomainError::DatabaseError(_)
            | DomainError::RenderError(_)
            | DomainError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Storage and internal failures; the detail must not reach callers.
    pub fn is_server_fault(&self) -> bool {
        self.code() == "INTERNAL_ERROR"
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let id = Uuid::new_v4();
        assert_eq!(DomainError::not_found("Contract", id).code(), "NOT_FOUND");
        assert_eq!(
            DomainError::VersionNumberTaken { contract_id: id, version_number: 2 }.code(),
            "CONFLICT"
        );
        assert!(DomainError::DatabaseError("boom".into()).is_server_fault());
        assert!(!DomainError::DependencyError("missing".into()).is_server_fault());
    }

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        assert_eq!(
            DomainError::not_found("Contract", id).to_string(),
            format!("Contract not found: {}", id)
        );
    }
}
