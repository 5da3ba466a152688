use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthorityConfig;
use crate::core::error::Error;
use crate::token::claims::{Claims, GUEST_ROLE, Identity, Metadata, USER_ROLE};

/// Parameters for a single [`TokenAuthority::issue`] call.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    username: String,
    role: String,
    expire: Option<Duration>,
    metadata: Option<Metadata>,
}

impl TokenRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: USER_ROLE.to_owned(),
            expire: None,
            metadata: None,
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Overrides the role-based lifetime.
    pub fn expires_in(mut self, expire: Duration) -> Self {
        self.expire = Some(expire);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Issues and verifies signed session tokens.
///
/// Holds nothing but key material and lifetimes, so a single instance can be
/// shared between any number of request handlers.
#[derive(Clone)]
pub struct TokenAuthority {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expire: Duration,
    guest_expire: Duration,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("algorithm", &self.header.alg)
            .field("expire", &self.expire)
            .field("guest_expire", &self.guest_expire)
            .finish()
    }
}

impl TokenAuthority {
    pub fn new(config: &AuthorityConfig) -> Self {
        let mut validation = Validation::new(config.algorithm);
        // Expiry is checked again in `validate` without any grace period.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            header: Header::new(config.algorithm),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            expire: config.expire,
            guest_expire: config.guest_expire,
        }
    }

    pub fn issue(&self, request: TokenRequest) -> Result<String, Error> {
        if request.username.is_empty() {
            return Err(Error::EmptySubject);
        }

        let expire = match request.expire {
            Some(expire) => expire,
            None if request.role == GUEST_ROLE => self.guest_expire,
            None => self.expire,
        };

        let expiration = Utc::now()
            .checked_add_signed(expire)
            .ok_or(Error::Lifetime)?;

        let claims = Claims {
            sub: request.username,
            exp: expiration.timestamp(),
            role: request.role,
            metadata: request.metadata.unwrap_or_default(),
        };

        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key).map_err(Error::Signing)
    }

    /// Every failure, whatever its cause, comes back as
    /// [`Error::InvalidToken`].
    pub fn validate(&self, token: &str) -> Result<Identity, Error> {
        let claims = match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
        {
            Ok(token_data) => token_data.claims,
            Err(e) => {
                tracing::debug!("Rejected token: {}", e);
                return Err(Error::InvalidToken);
            }
        };

        if claims.sub.is_empty() {
            tracing::debug!("Rejected token: empty subject");
            return Err(Error::InvalidToken);
        }

        let expiration = DateTime::from_timestamp(claims.exp, 0).ok_or(Error::InvalidToken)?;

        if Utc::now() >= expiration {
            tracing::debug!("Rejected token: expired at {}", expiration);
            return Err(Error::InvalidToken);
        }

        Ok(Identity {
            username: claims.sub,
            role: claims.role,
            metadata: claims.metadata,
            expiration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn make_authority() -> TokenAuthority {
        TokenAuthority::new(&AuthorityConfig::new(SECRET, "HS256", 48, 24).unwrap())
    }

    fn sign_raw(claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn metadata() -> Metadata {
        json!({
            "auth_mode": "enabled",
            "count": 42,
            "ratio": 1.5,
            "tiny": 1.0715660391465826e-75,
            "huge": -1.603964615428183e143,
            "admin": false,
            "nothing": null,
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_round_trip() {
        let authority = make_authority();

        for role in [USER_ROLE, GUEST_ROLE] {
            let token = authority
                .issue(TokenRequest::new("alice").role(role).metadata(metadata()))
                .unwrap();

            assert_eq!(token.split('.').count(), 3);

            let identity = authority.validate(&token).unwrap();
            assert_eq!(identity.username, "alice");
            assert_eq!(identity.role, role);
            assert_eq!(identity.metadata, metadata());
        }
    }

    #[test]
    fn test_open_ended_role() {
        let authority = make_authority();
        let token = authority
            .issue(TokenRequest::new("alice").role("auditor"))
            .unwrap();

        assert_eq!(authority.validate(&token).unwrap().role, "auditor");
    }

    #[test]
    fn test_default_role() {
        let authority = make_authority();
        let token = authority.issue(TokenRequest::new("carol")).unwrap();

        let identity = authority.validate(&token).unwrap();
        assert_eq!(identity.role, USER_ROLE);
        assert!(identity.metadata.is_empty());
        assert!(!identity.is_guest());
    }

    #[test]
    fn test_role_lifetimes() {
        let authority = make_authority();

        let issued_at = Utc::now();
        let guest = authority
            .issue(TokenRequest::new("dave").role(GUEST_ROLE))
            .unwrap();
        let user = authority.issue(TokenRequest::new("erin")).unwrap();

        let guest = authority.validate(&guest).unwrap();
        let user = authority.validate(&user).unwrap();

        let skew = |expiration: DateTime<Utc>, lifetime: Duration| {
            (expiration - (issued_at + lifetime)).num_seconds().abs()
        };
        assert!(skew(guest.expiration, Duration::hours(24)) <= 5);
        assert!(skew(user.expiration, Duration::hours(48)) <= 5);
    }

    #[test]
    fn test_custom_lifetime_overrides_role() {
        let authority = make_authority();

        let issued_at = Utc::now();
        let token = authority
            .issue(
                TokenRequest::new("dave")
                    .role(GUEST_ROLE)
                    .expires_in(Duration::hours(2)),
            )
            .unwrap();

        let identity = authority.validate(&token).unwrap();
        let skew = (identity.expiration - (issued_at + Duration::hours(2)))
            .num_seconds()
            .abs();
        assert!(skew <= 5);
    }

    #[test]
    fn test_expired_tokens() {
        let authority = make_authority();

        for expire in [Duration::zero(), Duration::hours(-1), Duration::seconds(-1)] {
            let token = authority
                .issue(TokenRequest::new("alice").expires_in(expire))
                .unwrap();

            assert!(matches!(
                authority.validate(&token),
                Err(Error::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_tampered_signature() {
        let authority = make_authority();
        let token = authority.issue(TokenRequest::new("alice")).unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;

        for index in signature_start..token.len() {
            let mut tampered: Vec<char> = token.chars().collect();
            tampered[index] = if tampered[index] == 'A' { 'B' } else { 'A' };
            let tampered: String = tampered.into_iter().collect();

            assert!(matches!(
                authority.validate(&tampered),
                Err(Error::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_foreign_secret() {
        let authority = make_authority();
        let other = TokenAuthority::new(&AuthorityConfig::new("other", "HS256", 48, 24).unwrap());

        let token = other.issue(TokenRequest::new("alice")).unwrap();

        assert!(matches!(
            authority.validate(&token),
            Err(Error::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_input() {
        let authority = make_authority();

        for token in ["", ".", "..", "a.b.c", "not a token", "ü.ü.ü", "Bearer x.y.z"] {
            assert!(matches!(
                authority.validate(token),
                Err(Error::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_missing_optional_claims() {
        let authority = make_authority();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();

        let identity = authority
            .validate(&sign_raw(json!({ "sub": "alice", "exp": exp })))
            .unwrap();

        assert_eq!(identity.role, USER_ROLE);
        assert!(identity.metadata.is_empty());
    }

    #[test]
    fn test_missing_required_claims() {
        let authority = make_authority();
        let exp = (Utc::now() + Duration::hours(1)).timestamp();

        for claims in [
            json!({ "exp": exp }),
            json!({ "sub": "alice" }),
            json!({ "sub": "", "exp": exp }),
            json!({ "sub": "alice", "exp": "tomorrow" }),
        ] {
            assert!(matches!(
                authority.validate(&sign_raw(claims)),
                Err(Error::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_empty_subject_is_internal() {
        let authority = make_authority();

        let err = authority.issue(TokenRequest::new("")).unwrap_err();
        assert!(matches!(err, Error::EmptySubject));
        assert!(err.is_internal());
    }

    #[test]
    fn test_float_metadata_is_exact() {
        let authority = make_authority();

        for value in [1.0715660391465826e-75, -1.603964615428183e143, 0.1 + 0.2] {
            let mut metadata = Metadata::new();
            metadata.insert("v".into(), json!(value));

            let token = authority
                .issue(TokenRequest::new("alice").metadata(metadata.clone()))
                .unwrap();

            let identity = authority.validate(&token).unwrap();
            assert_eq!(identity.metadata, metadata);
            assert_eq!(identity.metadata["v"].as_f64(), Some(value));
        }
    }

    #[test]
    fn test_lifetime_overflow_is_internal() {
        let authority = make_authority();

        for expire in [Duration::MAX, Duration::days(i64::MAX / 86_400_000)] {
            let err = authority
                .issue(TokenRequest::new("alice").expires_in(expire))
                .unwrap_err();

            assert!(matches!(err, Error::Lifetime));
            assert!(err.is_internal());
        }
    }

    #[test]
    fn test_signing_failure_is_internal() {
        // A shared secret cannot produce an RSA signature.
        let authority = TokenAuthority::new(&AuthorityConfig::new(SECRET, "RS256", 48, 24).unwrap());

        let err = authority.issue(TokenRequest::new("alice")).unwrap_err();
        assert!(matches!(err, Error::Signing(_)));
        assert!(err.is_internal());

        let token = make_authority().issue(TokenRequest::new("alice")).unwrap();
        assert!(matches!(
            authority.validate(&token),
            Err(Error::InvalidToken)
        ));
    }

    #[test]
    fn test_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TokenAuthority>();
    }
}
