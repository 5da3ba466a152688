use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::token::Identity;

/// Validates the bearer token and stores the caller as
/// `Option<Identity>` in the request extensions.
///
/// While no accounts are configured only guest tokens, or no token at all,
/// are let through; once accounts exist guest tokens are refused.
pub(crate) async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let identity = match request.headers().get(http::header::AUTHORIZATION) {
        Some(header) => {
            let token = bearer_token(header.to_str()?).ok_or(Error::InvalidToken)?;
            Some(state.authority.validate(token)?)
        }
        None => None,
    };

    match &identity {
        None if state.auth_configured() => return Err(Error::NoCredentials),
        Some(identity) if identity.is_guest() == state.auth_configured() => {
            tracing::debug!(role = %identity.role, "Token role not accepted in current auth mode");
            return Err(Error::InvalidToken);
        }
        _ => {}
    }

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn bearer_token(header: &str) -> Option<&str> {
    let mut header = header.split_whitespace();

    match (header.next(), header.next(), header.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Some(token),
        _ => None,
    }
}
