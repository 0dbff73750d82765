//! Request-scoped principal extraction
//!
//! The session cookie is resolved to an [`AuthContext`] once per request and
//! handed to handlers as an ordinary argument. [`DoctorContext`] and
//! [`PatientContext`] additionally gate on role equality.

use crate::cookies::{self, SESSION_COOKIE};
use crate::error::ApiError;
use crate::flash::{self, Flash};
use crate::routes::paths;
use crate::server::ClinicServer;
use async_trait::async_trait;
use auth_identity::{IdentityError, Role};
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";
pub const ACCESS_DENIED: &str = "Access denied.";

/// Authenticated principal for the current request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub session_token: String,
}

impl AuthContext {
    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }
}

/// Send the visitor to the login page, dropping a stale session cookie if one was sent
fn login_redirect(stale_cookie: bool) -> Response {
    let mut response = flash::redirect(paths::LOGIN, Flash::info(LOGIN_REQUIRED));
    if stale_cookie {
        cookies::append_set_cookie(&mut response, &cookies::removal_cookie(SESSION_COOKIE));
    }
    response
}

#[async_trait]
impl FromRequestParts<ClinicServer> for AuthContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        server: &ClinicServer,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = cookies::read_cookie(&parts.headers, SESSION_COOKIE) else {
            return Err(login_redirect(false));
        };

        match server.identity.validate_token(&token).await {
            Ok(user) => Ok(AuthContext {
                user_id: user.id,
                username: user.username,
                role: user.role,
                session_token: token,
            }),
            Err(
                e @ (IdentityError::InvalidToken
                | IdentityError::SessionExpired
                | IdentityError::UserNotFound),
            ) => {
                debug!(reason = %e, "Rejected session cookie");
                Err(login_redirect(true))
            }
            Err(e) => Err(ApiError::from(e).into_response()),
        }
    }
}

fn require_role(auth: &AuthContext, role: Role, path: &str) -> Result<(), Response> {
    if auth.role == role {
        return Ok(());
    }
    warn!(
        user_id = auth.user_id,
        role = %auth.role,
        required = %role,
        path = %path,
        "Role check failed"
    );
    Err(flash::redirect(paths::INDEX, Flash::error(ACCESS_DENIED)))
}

/// Principal that must hold the doctor role
#[derive(Debug, Clone)]
pub struct DoctorContext(pub AuthContext);

#[async_trait]
impl FromRequestParts<ClinicServer> for DoctorContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        server: &ClinicServer,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, server).await?;
        require_role(&auth, Role::Doctor, parts.uri.path())?;
        Ok(DoctorContext(auth))
    }
}

/// Principal that must hold the patient role
#[derive(Debug, Clone)]
pub struct PatientContext(pub AuthContext);

#[async_trait]
impl FromRequestParts<ClinicServer> for PatientContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        server: &ClinicServer,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, server).await?;
        require_role(&auth, Role::Patient, parts.uri.path())?;
        Ok(PatientContext(auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    fn context(role: Role) -> AuthContext {
        AuthContext {
            user_id: 1,
            username: "someone".into(),
            role,
            session_token: "token".into(),
        }
    }

    #[test]
    fn test_role_gate() {
        assert!(require_role(&context(Role::Doctor), Role::Doctor, "/add").is_ok());

        let denied = require_role(&context(Role::Patient), Role::Doctor, "/add").unwrap_err();
        assert_eq!(denied.status(), StatusCode::SEE_OTHER);
        assert_eq!(denied.headers().get(LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_login_redirect_clears_stale_cookie() {
        let response = login_redirect(true);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/login");
        assert_eq!(response.headers().get_all(axum::http::header::SET_COOKIE).iter().count(), 2);
        assert_eq!(
            login_redirect(false)
                .headers()
                .get_all(axum::http::header::SET_COOKIE)
                .iter()
                .count(),
            1
        );
    }
}
