use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Self-contained admin session carried in the `jwt` cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub is_admin: bool,
    pub exp: u64,
}

impl Claims {
    pub fn new_admin(ttl: Duration) -> Self {
        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            + ttl.as_secs();

        Self {
            is_admin: true,
            exp,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn encode_with_key(&self, key: &[u8]) -> Result<String> {
        encode(&Header::default(), self, &EncodingKey::from_secret(key))
            .context("Failed to generate token")
    }

    pub fn decode_with_key(token: &str, key: &[u8], validation: &Validation) -> Result<Self> {
        decode::<Self>(token, &DecodingKey::from_secret(key), validation)
            .map(|token_data| token_data.claims)
            .context("Failed to decode JWT token")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fairings::VALIDATION;

    #[test]
    fn test_round_trip_with_same_key() {
        let claims = Claims::new_admin(Duration::from_secs(60));
        let token = claims.encode_with_key(b"secret").unwrap();
        let decoded = Claims::decode_with_key(&token, b"secret", &VALIDATION).unwrap();
        assert_eq!(decoded, claims);
        assert!(decoded.is_admin());
    }

    #[test]
    fn test_other_key_is_rejected() {
        let token = Claims::new_admin(Duration::from_secs(60))
            .encode_with_key(b"secret")
            .unwrap();
        assert!(Claims::decode_with_key(&token, b"another", &VALIDATION).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            is_admin: true,
            exp: 1_000,
        };
        let token = claims.encode_with_key(b"secret").unwrap();
        assert!(Claims::decode_with_key(&token, b"secret", &VALIDATION).is_err());
    }
}
