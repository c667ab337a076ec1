use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use model::entities::{guide, session};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, Set,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::schemas::AppState;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session_token";

const SESSION_TTL_DAYS: i64 = 1;
const REMEMBER_TTL_DAYS: i64 = 30;

/// Insert a session row for a freshly authenticated guide and return it.
/// "Remember me" stretches the expiry from one day to thirty.
pub async fn issue_session(
    db: &DatabaseConnection,
    guide_id: i32,
    remember: bool,
) -> Result<session::Model, DbErr> {
    let ttl_days = if remember {
        REMEMBER_TTL_DAYS
    } else {
        SESSION_TTL_DAYS
    };

    let new_session = session::ActiveModel {
        token: Set(Uuid::new_v4().to_string()),
        guide_id: Set(guide_id),
        expires_at: Set(Utc::now() + Duration::days(ttl_days)),
        ..Default::default()
    };
    new_session.insert(db).await
}

/// Drop a session row (logout). Unknown tokens are a no-op.
pub async fn revoke_session(db: &DatabaseConnection, token: &str) -> Result<(), DbErr> {
    session::Entity::delete_many()
        .filter(session::Column::Token.eq(token))
        .exec(db)
        .await?;
    Ok(())
}

/// Resolve a session token to its guide. Expired rows and rows whose
/// guide no longer exists are both treated as no session.
async fn resolve_session(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<guide::Model>, DbErr> {
    let Some(session_row) = session::Entity::find()
        .filter(session::Column::Token.eq(token))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if session_row.expires_at <= Utc::now() {
        debug!(
            "session {} expired at {}",
            session_row.id, session_row.expires_at
        );
        return Ok(None);
    }

    // The guide may have been deleted since the session was issued.
    session_row.find_related(guide::Entity).one(db).await
}

/// Rejection for guarded routes: send the caller to the login entry
/// point, preserving the originally requested destination.
pub struct LoginRedirect {
    next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&format!("/login?next={}", self.next)).into_response()
    }
}

/// The authenticated guide for this request, resolved from the session
/// cookie. Guarded handlers take this as an argument instead of reading
/// ambient state.
#[derive(Debug)]
pub struct AuthGuide(pub guide::Model);

#[async_trait]
impl<S> FromRequestParts<S> for AuthGuide
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let next = parts.uri.path().to_string();
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Err(LoginRedirect { next });
        };

        match resolve_session(&state.db, cookie.value()).await {
            Ok(Some(guide_model)) => Ok(AuthGuide(guide_model)),
            Ok(None) => Err(LoginRedirect { next }),
            Err(err) => {
                warn!("session lookup failed: {}", err);
                Err(LoginRedirect { next })
            }
        }
    }
}

/// Optional authentication, for routes that only change behavior when a
/// session is present. Register, login, and the reset flow bounce
/// authenticated callers home instead of serving them.
#[derive(Debug)]
pub struct MaybeAuthGuide(pub Option<guide::Model>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthGuide
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(MaybeAuthGuide(None));
        };

        match resolve_session(&state.db, cookie.value()).await {
            Ok(found) => Ok(MaybeAuthGuide(found)),
            Err(err) => {
                warn!("session lookup failed, treating as anonymous: {}", err);
                Ok(MaybeAuthGuide(None))
            }
        }
    }
}
