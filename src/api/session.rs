use serde::Serialize;

use super::{success, ApiResult};
use crate::auth::Principal;

#[derive(Debug, Serialize)]
pub struct Session {
    pub authenticated: bool,
    pub username: Option<String>,
}

/// GET /api/session - Who is signed in, for the navigation bar.
pub async fn get_session(principal: Principal) -> ApiResult<Session> {
    success(Session {
        authenticated: principal.username().is_some(),
        username: principal.username().map(str::to_string),
    })
}
