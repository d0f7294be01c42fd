use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use time::{Duration, OffsetDateTime};
use tower_sessions::{Expiry, Session};
use uuid::Uuid;

use crate::auth::repo::User;
use crate::error::AppError;

const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";

/// The authenticated identity carried by a session.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
}

impl CurrentUser {
    /// Identity of the session's user, if any. Public pages use this to
    /// toggle navigation without forcing a login.
    pub async fn from_session(session: &Session) -> Result<Option<Self>, AppError> {
        let Some(user_id) = session.get::<Uuid>(USER_ID_KEY).await? else {
            return Ok(None);
        };
        let Some(username) = session.get::<String>(USERNAME_KEY).await? else {
            return Ok(None);
        };
        Ok(Some(Self { user_id, username }))
    }
}

/// Record a successful login. The session id is cycled and the expiry is
/// fixed at now + TTL; there is no sliding renewal.
pub async fn establish(session: &Session, user: &User, ttl_minutes: i64) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user.id).await?;
    session.insert(USERNAME_KEY, user.username.clone()).await?;
    session.set_expiry(Some(Expiry::AtDateTime(
        OffsetDateTime::now_utc() + Duration::minutes(ttl_minutes),
    )));
    Ok(())
}

/// Destroy the session in the backing store.
pub async fn clear(session: &Session) -> Result<(), AppError> {
    session.flush().await?;
    Ok(())
}

/// Guard for protected routes: extracting `CurrentUser` fails with a
/// redirect to `/login` when no one is signed in. Ownership of resources is
/// checked separately per-route.
#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login"))?;

        match CurrentUser::from_session(&session).await {
            Ok(Some(user)) => Ok(user),
            _ => Err(Redirect::to("/login")),
        }
    }
}
