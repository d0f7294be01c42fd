use askama::Template;
use axum::{
    extract::State,
    routing::get,
    Form, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, SignupForm},
        password::{hash_password, verify_password},
        session,
    },
    error::{AppError, Reply},
    state::AppState,
};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: String,
}

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupTemplate;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/logout", get(logout))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

async fn login_page() -> Result<Reply, AppError> {
    Reply::page(&LoginTemplate {
        error: String::new(),
    })
}

/// Unknown email and wrong password stay distinguishable by message text
/// only; both render the login view with the same status.
#[instrument(skip(state, session, form))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(mut form): Form<LoginForm>,
) -> Result<Reply, AppError> {
    form.email = form.email.trim().to_lowercase();

    let Some(user) = state.users.find_by_email(&form.email).await? else {
        warn!(email = %form.email, "login unknown email");
        return Reply::page(&LoginTemplate {
            error: "Email does not exist.".into(),
        });
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Reply::page(&LoginTemplate {
            error: "Invalid password.".into(),
        });
    }

    session::establish(&session, &user, state.config.session_ttl_minutes).await?;
    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Reply::Redirect("/".into()))
}

async fn signup_page() -> Result<Reply, AppError> {
    Reply::page(&SignupTemplate)
}

#[instrument(skip(state, form))]
async fn signup(
    State(state): State<AppState>,
    Form(mut form): Form<SignupForm>,
) -> Result<Reply, AppError> {
    form.email = form.email.trim().to_lowercase();
    form.username = form.username.trim().to_string();

    if !is_valid_email(&form.email) {
        warn!(email = %form.email, "signup invalid email");
        return Err(AppError::Validation("invalid email".into()));
    }
    if form.username.is_empty() {
        return Err(AppError::Validation("username is required".into()));
    }
    if form.password.len() < 8 {
        warn!("signup password too short");
        return Err(AppError::Validation("password too short".into()));
    }

    if state.users.find_by_email(&form.email).await?.is_some() {
        warn!(email = %form.email, "signup email already registered");
        return Err(AppError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&form.password)?;
    let user = state.users.create(&form.email, &form.username, &hash).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Reply::Redirect("/login".into()))
}

#[instrument(skip(session))]
async fn logout(session: Session) -> Result<Reply, AppError> {
    session::clear(&session).await?;
    Ok(Reply::Redirect("/".into()))
}
