use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use std::sync::Arc;
use uuid::Uuid;

/// Id of the signed-in user, resolved from the session cookie.
///
/// Rejects with 401 before the handler runs when there is no valid session.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);
        let user_id = state.sessions.resolve(&parts.headers)?;
        Ok(CurrentUser(user_id))
    }
}
