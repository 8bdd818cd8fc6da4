//! Token Service
//!
//! Issues and validates signed session tokens (HS256 JWT). The issuer claim
//! carries the account email; `exp` is the only other claim.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult, TokenError};

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account email
    pub iss: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Stateless token issuer/validator
///
/// Only HS256 is accepted; tokens naming any other algorithm fail as
/// [`TokenError::BadSignature`].
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
    /// Full check minus expiry, which is compared against an injected clock
    verified: Validation,
    /// Claim parsing without the MAC, used to judge expiry first
    unverified: Validation,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut verified = Validation::new(ALGORITHM);
        verified.validate_exp = false;
        verified.validate_aud = false;
        verified.leeway = 0;
        verified.set_required_spec_claims(&["exp", "iss"]);

        let mut unverified = verified.clone();
        unverified.insecure_disable_signature_validation();

        Self {
            encoding: EncodingKey::from_secret(config.token_secret()),
            decoding: DecodingKey::from_secret(config.token_secret()),
            ttl: chrono::Duration::from_std(config.token_ttl)
                .unwrap_or_else(|_| chrono::Duration::hours(24)),
            verified,
            unverified,
        }
    }

    pub fn issue(&self, email: &Email) -> AuthResult<String> {
        self.issue_at(email, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, email: &Email, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = SessionClaims {
            iss: email.as_str().to_string(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Validate a token and return the email it was issued to
    pub fn validate(&self, token: &str) -> Result<Email, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`
    ///
    /// An expired token reports `Expired` whatever its signature; a token
    /// whose `exp` equals `now` is already expired.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Email, TokenError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| TokenError::Malformed)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::BadSignature);
        }

        let claims = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.unverified)
            .map_err(|_| TokenError::Malformed)?
            .claims;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        let claims = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.verified)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    TokenError::BadSignature
                }
                _ => TokenError::Malformed,
            })?
            .claims;

        Email::new(&claims.iss).map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service(secret: &str) -> TokenService {
        TokenService::new(&AuthConfig::new(secret).unwrap())
    }

    fn email() -> Email {
        Email::new("ada@example.com").unwrap()
    }

    #[test]
    fn test_issue_then_validate() {
        let tokens = service(SECRET);
        let token = tokens.issue(&email()).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), email());
    }

    #[test]
    fn test_token_has_three_segments() {
        let token = service(SECRET).issue(&email()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_expiry_boundary() {
        let tokens = service(SECRET);
        let issued = Utc::now();
        let token = tokens.issue_at(&email(), issued).unwrap();

        let just_before = issued + Duration::hours(24) - Duration::seconds(1);
        assert!(tokens.validate_at(&token, just_before).is_ok());

        let at_expiry = issued + Duration::hours(24);
        assert_eq!(tokens.validate_at(&token, at_expiry), Err(TokenError::Expired));
    }

    #[test]
    fn test_expired_wins_over_bad_signature() {
        let issued = Utc::now() - Duration::hours(48);
        let token = service(SECRET).issue_at(&email(), issued).unwrap();
        let other = service("ffffffffffffffffffffffffffffffff");
        assert_eq!(other.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let token = service(SECRET).issue(&email()).unwrap();
        let other = service("ffffffffffffffffffffffffffffffff");
        assert_eq!(other.validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let tokens = service(SECRET);
        let token = tokens.issue(&email()).unwrap();
        let forged = tokens.issue(&Email::new("eve@example.com").unwrap()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);
        assert_eq!(tokens.validate(&spliced), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = SessionClaims {
            iss: "ada@example.com".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(service(SECRET).validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        // {"alg":"none","typ":"JWT"}
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let token = service(SECRET).issue(&email()).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let unsigned = format!("{header}.{payload}.");
        assert!(service(SECRET).validate(&unsigned).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service(SECRET);
        assert_eq!(tokens.validate(""), Err(TokenError::Malformed));
        assert_eq!(tokens.validate("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(tokens.validate("a.b.c"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_missing_issuer_is_malformed() {
        #[derive(Serialize)]
        struct NoIssuer {
            exp: i64,
        }
        let token = jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            &NoIssuer {
                exp: (Utc::now() + Duration::hours(1)).timestamp(),
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(service(SECRET).validate(&token), Err(TokenError::Malformed));
    }
}
