use roster_database::{StoreError, StoreResult};
use tracing::{debug, error};

use crate::{ApiError, Operation};

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Store {
        operation: Operation,
        source: StoreError,
    },
    Internal {
        operation: Operation,
        message: String,
    },
}

impl ServiceError {
    pub fn internal(operation: Operation, msg: impl Into<String>) -> Self {
        Self::Internal {
            operation,
            message: msg.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(id) => {
                debug!(id, "user not found");
                ApiError::not_found("User not found")
            }
            ServiceError::Store { operation, source } => {
                error!(operation = operation.name(), error = %source, "store call failed");
                ApiError::internal_server_error(operation.failure_message())
            }
            ServiceError::Internal { operation, message } => {
                error!(operation = operation.name(), %message, "internal error");
                ApiError::internal_server_error(operation.failure_message())
            }
        }
    }
}

/// Attach the operation a store call was made for.
pub trait StoreResultExt<T> {
    fn during(self, operation: Operation) -> Result<T, ServiceError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn during(self, operation: Operation) -> Result<T, ServiceError> {
        self.map_err(|source| match source {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            source => ServiceError::Store { operation, source },
        })
    }
}
