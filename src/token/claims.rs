use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const USER_ROLE: &str = "user";
pub const GUEST_ROLE: &str = "guest";

/// Opaque key/value pairs carried inside a token.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

fn default_role() -> String {
    USER_ROLE.to_owned()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
    #[serde(default = "default_role")]
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) metadata: Metadata,
}

/// The caller a validated token speaks for.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Identity {
    pub username: String,
    pub role: String,
    pub metadata: Metadata,
    pub expiration: DateTime<Utc>,
}

impl Identity {
    pub fn is_guest(&self) -> bool {
        self.role == GUEST_ROLE
    }
}
