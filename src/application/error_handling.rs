// src/application/error_handling.rs
//
// Error mapping at the UI boundary
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - One consistent error shape for every view state
// - Never exposes storage or IO details
// - Logs the full error before it is flattened

use serde::{Deserialize, Serialize};
use crate::error::AppError;

/// Standard error response for UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found (404)
    NotFound,

    /// Invalid input/validation error (400)
    Validation,

    /// Not signed in or bad credentials (401)
    Unauthorized,

    /// Business rule violated, e.g. out of stock (422)
    DomainError,

    /// Database/persistence error (500)
    Database,

    /// File system error (500)
    FileSystem,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::not_found("Resource"),

            AppError::Validation(message) => Self::validation(message),

            AppError::Unauthorized(message) => Self {
                success: false,
                error_type: ErrorType::Unauthorized,
                message,
                details: None,
            },

            AppError::Domain(domain_error) => Self {
                success: false,
                error_type: ErrorType::DomainError,
                message: "Request breaks a store rule".to_string(),
                details: Some(domain_error.to_string()),
            },

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);

                Self {
                    success: false,
                    error_type: ErrorType::Database,
                    message: "Database operation failed".to_string(),
                    details: Some("Check logs for details".to_string()),
                }
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);

                Self {
                    success: false,
                    error_type: ErrorType::Database,
                    message: "Database connection failed".to_string(),
                    details: None,
                }
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);

                Self {
                    success: false,
                    error_type: ErrorType::FileSystem,
                    message: "File system operation failed".to_string(),
                    details: None,
                }
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message: "Data serialization failed".to_string(),
                    details: None,
                }
            }

            AppError::Config(message) => {
                log::error!("Configuration error: {}", message);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message: "Store is misconfigured".to_string(),
                    details: Some(message),
                }
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message,
                    details: None,
                }
            }
        }
    }

    /// Create validation error
    pub fn validation(message: String) -> Self {
        Self {
            success: false,
            error_type: ErrorType::Validation,
            message,
            details: None,
        }
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self {
            success: false,
            error_type: ErrorType::NotFound,
            message: format!("{} not found", resource),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

/// Helper trait to convert Results to ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use uuid::Uuid;

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(AppError::NotFound);
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Resource not found");
    }

    #[test]
    fn test_stock_error_keeps_details() {
        let error = ErrorResponse::from_app_error(AppError::Domain(DomainError::InsufficientStock {
            product_id: Uuid::nil(),
            requested: 3,
            available: 1,
        }));
        assert_eq!(error.error_type, ErrorType::DomainError);
        assert!(error.details.unwrap().contains("available 1"));
    }

    #[test]
    fn test_database_error_hides_cause() {
        let error = ErrorResponse::from_app_error(AppError::Database(rusqlite::Error::QueryReturnedNoRows));
        assert_eq!(error.error_type, ErrorType::Database);
        assert!(!error.details.unwrap_or_default().contains("QueryReturnedNoRows"));
    }

    #[test]
    fn test_serialization() {
        let error = ErrorResponse::from_app_error(AppError::Unauthorized("Session expired".to_string()));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"unauthorized\""));
        assert!(json.contains("Session expired"));
    }

    #[test]
    fn test_to_error_response() {
        let result: Result<(), AppError> = Err(AppError::Validation("Cart is empty".to_string()));
        let error = result.to_error_response().unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
    }
}
