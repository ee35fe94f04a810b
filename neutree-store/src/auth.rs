//! Signs the short-lived service-role JWT the façade presents to the
//! PostgREST-style front door (spec.md §6: "a signed short-lived service
//! token (JWT signed with a shared secret, `role=service_role`) for
//! control-plane access").

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

const SERVICE_TOKEN_TTL_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct ServiceClaims {
    role: String,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Mints a fresh `role=service_role` bearer token for every request, rather
/// than caching one, so a revoked secret takes effect within the token's
/// 60-second TTL.
pub struct ServiceTokenSigner {
    secret: EncodingKey,
}

impl ServiceTokenSigner {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            secret: EncodingKey::from_secret(jwt_secret.as_bytes()),
        }
    }

    pub fn sign(&self) -> Result<String, StoreError> {
        let now = Utc::now();
        let claims = ServiceClaims {
            role: "service_role".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(SERVICE_TOKEN_TTL_SECS)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.secret)
            .map_err(|e| StoreError::Transport(format!("failed to sign service token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_a_token_with_service_role_claim() {
        let signer = ServiceTokenSigner::new("test-secret");
        let token = signer.sign().expect("sign should succeed");
        assert!(!token.is_empty());
        assert_eq!(token.split('.').count(), 3);
    }
}
