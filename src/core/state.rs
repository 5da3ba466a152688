use std::sync::Arc;

use serde_json::Value;

use crate::core::credentials::CredentialStore;
use crate::core::error::Error;
use crate::token::{GUEST_ROLE, Metadata, TokenAuthority, TokenRequest};
use crate::types::response::AuthMode;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) credentials: Arc<CredentialStore>,
    pub(crate) authority: Arc<TokenAuthority>,
}

impl AppState {
    pub(crate) fn new(credentials: CredentialStore, authority: TokenAuthority) -> Self {
        AppState {
            credentials: Arc::new(credentials),
            authority: Arc::new(authority),
        }
    }

    pub(crate) fn auth_configured(&self) -> bool {
        !self.credentials.is_empty()
    }

    pub(crate) fn auth_mode(&self) -> AuthMode {
        match self.auth_configured() {
            true => AuthMode::Enabled,
            false => AuthMode::Disabled,
        }
    }

    /// Token handed out to everyone while no accounts are configured.
    pub(crate) fn issue_guest_token(&self) -> Result<String, Error> {
        self.authority.issue(
            TokenRequest::new("guest")
                .role(GUEST_ROLE)
                .metadata(auth_mode_metadata(AuthMode::Disabled)),
        )
    }

    pub(crate) fn issue_user_token(&self, username: &str) -> Result<String, Error> {
        self.authority
            .issue(TokenRequest::new(username).metadata(auth_mode_metadata(AuthMode::Enabled)))
    }
}

/// Stamped into every token so clients can tell which mode issued it.
fn auth_mode_metadata(auth_mode: AuthMode) -> Metadata {
    let auth_mode = match auth_mode {
        AuthMode::Enabled => "enabled",
        AuthMode::Disabled => "disabled",
    };

    let mut metadata = Metadata::new();
    metadata.insert("auth_mode".into(), Value::from(auth_mode));
    metadata
}
