use serde::Serialize;
const TOKEN_TYPE: &str = "bearer";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AuthMode {
    Enabled,
    Disabled,
}

#[derive(Serialize)]
pub(crate) struct Login {
    pub(crate) access_token: String,
    pub(crate) token_type: &'static str,
    pub(crate) auth_mode: AuthMode,
}

impl Login {
    pub(crate) fn new(access_token: String, auth_mode: AuthMode) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE,
            auth_mode,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct AuthStatus {
    pub(crate) auth_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) token_type: Option<&'static str>,
    pub(crate) auth_mode: AuthMode,
}

impl AuthStatus {
    pub(crate) fn enabled() -> Self {
        Self {
            auth_configured: true,
            access_token: None,
            token_type: None,
            auth_mode: AuthMode::Enabled,
        }
    }

    pub(crate) fn disabled(access_token: String) -> Self {
        Self {
            auth_configured: false,
            access_token: Some(access_token),
            token_type: Some(TOKEN_TYPE),
            auth_mode: AuthMode::Disabled,
        }
    }
}
