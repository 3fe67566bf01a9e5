use std::{
    env,
    future::{ready, Ready},
};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const TOKEN_HEADER: &str = "x-auth-token";
const TOKEN_LIFETIME_SECONDS: i64 = 360_000;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: String,
}

/// Signs and verifies the HS256 tokens issued at registration and login.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_owned()))
    }

    pub fn issue(&self, user_id: &str) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user: TokenUser {
                id: user_id.to_owned(),
            },
            iat: now,
            exp: now + TOKEN_LIFETIME_SECONDS,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::Unauthorized("Token is not valid".to_owned()))
    }
}

/// Caller identity taken from the `x-auth-token` header.
pub struct AuthUser {
    pub id: String,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| ApiError::Internal("token service not configured".to_owned()))?;
    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("No token, authorization denied".to_owned()))?;

    let claims = tokens.verify(token)?;
    Ok(AuthUser {
        id: claims.user.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_and_carry_the_user_id() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue("user-1").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user.id, "user-1");
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_SECONDS);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let token = TokenService::new("other-secret").issue("user-1").unwrap();
        assert!(TokenService::new("test-secret").verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let tokens = TokenService::new("test-secret");
        assert!(tokens.verify("not-a-token").is_err());
    }
}
