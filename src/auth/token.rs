use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

const TOKEN_TTL_MINUTES: i64 = 30;

/// HS256 key pair derived from the configured secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    token_type: &'static str,
}

impl TokenResponse {
    pub(crate) fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

pub fn issue(keys: &TokenKeys, user_id: &str) -> AppResult<String> {
    let claims = Claims {
        sub: user_id.to_owned(),
        exp: (Utc::now() + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
    };
    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|err| AppError::Internal(err.into()))
}

/// Returns the subject (user id) of a valid, unexpired token.
pub fn verify(keys: &TokenKeys, token: &str) -> AppResult<String> {
    decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map(|data| data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid authentication credentials".to_owned()))
}
