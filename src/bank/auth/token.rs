use super::AuthError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "accountNumber")]
    pub account_number: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 tokens bound to an account number.
///
/// Built once at startup from the configured secret and shared by reference.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenService {
    /// # Errors
    /// Returns [`AuthError::Configuration`] if the secret is empty.
    pub fn new(secret: &SecretString, ttl_seconds: u64) -> Result<Self, AuthError> {
        let secret = secret.expose_secret();
        if secret.is_empty() {
            return Err(AuthError::Configuration("token signing secret is empty"));
        }

        // Only HS256 is accepted, whatever the token header claims.
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
        })
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Sign a token for `account_number`.
    ///
    /// # Errors
    /// Returns [`AuthError::Signing`] if the claims cannot be encoded.
    pub fn issue(&self, account_number: i64) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            account_number,
            iat,
            exp: iat.saturating_add(self.ttl_seconds),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding).map_err(|e| {
            error!("Failed to sign token: {e}");
            AuthError::Signing
        })
    }

    /// Verify signature, algorithm and expiry, returning the embedded claims.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidToken`] for malformed, forged, expired or
    /// wrong-algorithm tokens.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {e}");
                AuthError::InvalidToken
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &ALGORITHM)
            .field("secret", &"***")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(
            &SecretString::from(secret.to_string()),
            DEFAULT_TOKEN_TTL_SECONDS,
        )
        .unwrap()
    }

    fn sign_with(header: &Header, claims: &Claims, secret: &str) -> String {
        encode(header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims_for(account_number: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            account_number,
            iat: now,
            exp: now + 60,
        }
    }

    #[test]
    fn empty_secret_is_configuration_error() {
        let result = TokenService::new(&SecretString::from(String::new()), 60);
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn issued_token_verifies_to_same_number() {
        let tokens = service("s3cret");
        for number in [1, 42, 987_654, i64::MAX] {
            let token = tokens.issue(number).unwrap();
            assert!(!token.is_empty());
            assert_eq!(tokens.verify(&token).unwrap().account_number, number);
        }
    }

    #[test]
    fn claims_use_account_number_key() {
        let json = serde_json::to_value(claims_for(7)).unwrap();
        assert_eq!(json["accountNumber"], 7);
    }

    #[test]
    fn expiry_follows_ttl() {
        let tokens = TokenService::new(&SecretString::from("s3cret".to_string()), 120).unwrap();
        let claims = tokens.verify(&tokens.issue(1).unwrap()).unwrap();
        assert_eq!(claims.exp - claims.iat, 120);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = service("other").issue(1).unwrap();
        assert!(matches!(
            service("s3cret").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_other_algorithm_with_same_secret() {
        let token = sign_with(&Header::new(Algorithm::HS512), &claims_for(1), "s3cret");
        assert!(matches!(
            service("s3cret").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            account_number: 1,
            iat: now - 120,
            exp: now - 60,
        };
        let token = sign_with(&Header::new(Algorithm::HS256), &claims, "s3cret");
        assert!(matches!(
            service("s3cret").verify(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let tokens = service("s3cret");
        for token in ["", "not-a-jwt", "a.b.c", "eyJhbGciOiJub25lIn0.e30."] {
            assert!(matches!(
                tokens.verify(token),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[test]
    fn debug_hides_secret() {
        let debug = format!("{:?}", service("s3cret"));
        assert!(!debug.contains("s3cret"));
    }
}
