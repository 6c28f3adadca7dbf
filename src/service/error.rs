use thiserror::Error;

use crate::index::IndexError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid engagement event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
