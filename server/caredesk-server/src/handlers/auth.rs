use crate::cookies::{self, SESSION_COOKIE};
use crate::flash::{self, Flash, IncomingFlash};
use crate::forms::{LoginForm, SignupForm};
use crate::middleware::AuthContext;
use crate::routes::paths;
use crate::server::ClinicServer;
use crate::views;
use auth_identity::{IdentityError, SignupRequest};
use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, info, warn};

const UNAVAILABLE: &str = "Something went wrong. Please try again.";

/// Message for the form, hiding anything that is not meant for users
fn form_message(e: &IdentityError, action: &str) -> String {
    if e.is_user_facing() {
        e.to_string()
    } else {
        error!(error = %e, action, "Identity operation failed");
        UNAVAILABLE.to_string()
    }
}

pub async fn login_form(auth: Option<AuthContext>, incoming: IncomingFlash) -> Response {
    if auth.is_some() {
        return Redirect::to(paths::INDEX).into_response();
    }
    flash::page(views::auth::login_page(incoming.get()), &incoming)
}

pub async fn login(State(server): State<ClinicServer>, Form(form): Form<LoginForm>) -> Response {
    let user = match server
        .identity
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(e) => return flash::redirect(paths::LOGIN, Flash::error(form_message(&e, "login"))),
    };

    let remember = form.remember();
    let session = match server.identity.create_session(user.id, remember).await {
        Ok(session) => session,
        Err(e) => return flash::redirect(paths::LOGIN, Flash::error(form_message(&e, "session"))),
    };

    info!(user_id = user.id, role = %user.role, remember, "User logged in");

    let max_age = remember.then(|| session.expires_at - session.created_at);
    let mut response = flash::redirect(
        paths::INDEX,
        Flash::success(format!("Welcome, {}!", user.username)),
    );
    cookies::append_set_cookie(
        &mut response,
        &cookies::session_cookie(&session.token, max_age, server.config.cookie_secure),
    );
    response
}

pub async fn signup_form(incoming: IncomingFlash) -> Response {
    flash::page(views::auth::signup_page(incoming.get()), &incoming)
}

pub async fn signup(State(server): State<ClinicServer>, Form(form): Form<SignupForm>) -> Response {
    let request = SignupRequest {
        username: form.username,
        password: form.password,
        confirm_password: form.confirm_password,
        role: form.role,
    };

    match server.identity.register_user(request).await {
        Ok(user) => {
            info!(user_id = user.id, role = %user.role, "Signup completed");
            flash::redirect(
                paths::LOGIN,
                Flash::success("Account created successfully. Please log in."),
            )
        }
        Err(e) => {
            if e.is_user_facing() {
                warn!(reason = %e, "Signup rejected");
            }
            flash::redirect(paths::SIGNUP, Flash::error(form_message(&e, "signup")))
        }
    }
}

pub async fn logout(State(server): State<ClinicServer>, auth: AuthContext) -> Response {
    if let Err(e) = server.identity.logout(&auth.session_token).await {
        error!(user_id = auth.user_id, error = %e, "Failed to delete session");
    } else {
        info!(user_id = auth.user_id, "User logged out");
    }

    let mut response = flash::redirect(paths::LOGIN, Flash::info("You have been logged out."));
    cookies::append_set_cookie(&mut response, &cookies::removal_cookie(SESSION_COOKIE));
    response
}
