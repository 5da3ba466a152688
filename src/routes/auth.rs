use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::LoginData;
use crate::types::response::{self, AuthMode};

#[instrument(skip_all)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(user_data): Json<LoginData>,
) -> Result<Json<response::Login>, Error> {
    if !state.auth_configured() {
        let token = state.issue_guest_token()?;

        return Ok(Json(response::Login::new(token, AuthMode::Disabled)));
    }

    match state.credentials.lookup(&user_data.username) {
        Some(password) if password == user_data.password => (),
        _ => {
            tracing::warn!(username = %user_data.username, "Rejected login");
            return Err(Error::Unauthorized);
        }
    }

    let token = state.issue_user_token(&user_data.username)?;

    tracing::info!(username = %user_data.username, "Issued token");

    Ok(Json(response::Login::new(token, AuthMode::Enabled)))
}

pub(crate) async fn auth_status(
    State(state): State<AppState>,
) -> Result<Json<response::AuthStatus>, Error> {
    let status = match state.auth_mode() {
        AuthMode::Enabled => response::AuthStatus::enabled(),
        AuthMode::Disabled => response::AuthStatus::disabled(state.issue_guest_token()?),
    };

    Ok(Json(status))
}
