use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error("Line id {0} does not belong to this order")]
    InvalidLineReference(i32),
    #[error("Line id {0} appears more than once in the submission")]
    DuplicateLineReference(i32),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        DomainError::NotFound { entity, id }
    }
}
