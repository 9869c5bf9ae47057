//! Stateless bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user id and the role at issue time.
//! There is no server-side session table, so a token stays valid until it
//! expires even if the user's password or role changes in between.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use timeline_policy::Requester;
use timeline_types::models::{Claims, Role};

pub const TOKEN_VALIDITY_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    ExpiredToken,
    #[error("Invalid token format")]
    MalformedClaims,
}

#[derive(Clone)]
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue_token(&self, user_id: i64, role: Role) -> anyhow::Result<String> {
        self.issue_token_at(user_id, role, Utc::now())
    }

    pub fn issue_token_at(
        &self,
        user_id: i64,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            role,
            iat: issued_at.timestamp() as usize,
            exp: (issued_at + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(token)
    }

    pub fn resolve_token(&self, token: &str) -> Result<Requester, TokenError> {
        // Signature, format and expiry first; claim shape second, so a
        // well-signed token with missing fields is told apart from garbage.
        let data = decode::<serde_json::Value>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                ErrorKind::MissingRequiredClaim(_) => TokenError::MalformedClaims,
                _ => TokenError::InvalidToken,
            },
        )?;

        let claims: Claims =
            serde_json::from_value(data.claims).map_err(|_| TokenError::MalformedClaims)?;

        Ok(Requester::new(claims.sub, claims.role))
    }
}
