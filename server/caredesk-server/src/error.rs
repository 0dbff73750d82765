use crate::views;
use auth_identity::IdentityError;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use database_layer::DatabaseError;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

/// Errors that end a request with an error page
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }


    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Database(DatabaseError::ConnectionFailed(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Database(_) | ApiError::Identity(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::Database(_) => "database_error",
            ApiError::Identity(_) => "identity_error",
        }
    }

    /// Text shown to the user; server-side failures stay generic
    fn public_message(&self) -> String {
        match self {
            ApiError::NotFound { resource } => {
                format!("The requested {} could not be found.", resource.to_lowercase())
            }
            _ => "Something went wrong on our side. Please try again.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "Request failed"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "Request rejected"
            );
        }

        let page = views::error_page(status_code, &self.public_message(), &error_id);
        (status_code, Html(page)).into_response()
    }
}

/// get-or-404 for optional lookups
pub trait OptionExt<T> {
    fn or_not_found(self, resource: &'static str) -> Result<T, ApiError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, resource: &'static str) -> Result<T, ApiError> {
        self.ok_or(ApiError::NotFound { resource })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("Patient").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(DatabaseError::ConnectionFailed("gone".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(DatabaseError::QueryFailed("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_not_shown() {
        let err = ApiError::from(DatabaseError::QueryFailed("no such table: patients".into()));
        assert!(!err.public_message().contains("patients"));
        assert_eq!(
            ApiError::not_found("Lab order").public_message(),
            "The requested lab order could not be found."
        );
    }

    #[test]
    fn test_or_not_found() {
        let missing: Option<i64> = None;
        assert!(matches!(
            missing.or_not_found("Patient"),
            Err(ApiError::NotFound { resource: "Patient" })
        ));
        assert_eq!(Some(7).or_not_found("Patient").unwrap(), 7);
    }
}
