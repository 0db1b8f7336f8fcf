// ==========================================
// Bearer token service
// ==========================================
// HS256 JWTs carrying the username and granted scopes. Expiry is part
// of the claims and checked on every decode, with no clock leeway, so
// an expired token is rejected the second it lapses.
// ==========================================

use crate::auth::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Scopes granted at issue time
    pub scopes: Vec<String>,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expire_hours: i64,
}

impl TokenService {
    pub fn new(secret: &str, expire_hours: i64) -> Self {
        TokenService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expire_hours,
        }
    }

    /// Issue a token for a user with the given scopes
    pub fn issue(&self, username: &str, scopes: &[String]) -> Result<String, AuthError> {
        let claims = Claims {
            sub: username.to_string(),
            scopes: scopes.to_vec(),
            exp: (Utc::now() + Duration::hours(self.expire_hours)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }

    /// Decode and validate a token, distinguishing expiry from every
    /// other failure mode
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(AuthError::Expired),
            Err(_) => Err(AuthError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", 6)
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let svc = service();
        let token = svc
            .issue("petro", &["catalogue".to_string(), "user_manager".to_string()])
            .unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "petro");
        assert_eq!(claims.scopes, vec!["catalogue", "user_manager"]);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let svc = TokenService::new("unit-test-secret", -1);
        let token = svc.issue("petro", &["catalogue".to_string()]).unwrap();
        assert!(matches!(svc.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let svc = service();
        let mut token = svc.issue("petro", &["catalogue".to_string()]).unwrap();
        token.push('x');
        assert!(matches!(svc.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_invalid() {
        let token = TokenService::new("other-secret", 6)
            .issue("petro", &["catalogue".to_string()])
            .unwrap();
        assert!(matches!(
            service().verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }
}
