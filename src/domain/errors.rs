use thiserror::Error;

use super::models::FlowerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("flower {0} stored with a count of zero")]
    EmptyFlowerCount(FlowerId),
    #[error("greenery variant out of range: {0}")]
    InvalidGreenery(i64),
    #[error("invalid flower catalog: {0}")]
    InvalidCatalog(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
