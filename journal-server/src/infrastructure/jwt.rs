use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// Claims of a token issued by the external identity provider. We only
/// verify; issuance lives elsewhere.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
}

pub(crate) struct JwtService {
    secret: String,
}

impl JwtService {
    pub(crate) fn new(secret: &str) -> Self {
        JwtService {
            secret: secret.into(),
        }
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use super::{Claims, JwtService};

    const SECRET: &str = "test-secret-test-secret-test-secret!";

    fn token_for(sub: &str, exp: i64) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                sub: sub.to_string(),
                exp,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("token must encode")
    }

    #[test]
    fn valid_token_verifies() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let claims = JwtService::new(SECRET)
            .verify_token(&token_for("user-1", exp))
            .expect("token must verify");
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn expired_token_is_rejected() {
        let exp = (Utc::now() - Duration::hours(1)).timestamp();
        JwtService::new(SECRET)
            .verify_token(&token_for("user-1", exp))
            .expect_err("expired token must fail");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        JwtService::new("another-secret-another-secret-32ch")
            .verify_token(&token_for("user-1", exp))
            .expect_err("wrong secret must fail");
    }
}
