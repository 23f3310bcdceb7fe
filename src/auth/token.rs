use std::fmt;

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// JWT claims. Exactly one of the actor ids is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Business(Uuid),
    Admin(Uuid),
    Customer(Uuid),
}

/// Issues and verifies HS256 tokens
pub struct TokenService {
    secret: String,
    expiration_hours: i64,
}

impl TokenService {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret,
            expiration_hours,
        }
    }

    pub fn issue(&self, subject: Subject) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let mut claims = Claims {
            business_id: None,
            admin_id: None,
            customer_id: None,
            exp: now + self.expiration_hours * 3600,
            iat: now,
        };
        match subject {
            Subject::Business(id) => claims.business_id = Some(id),
            Subject::Admin(id) => claims.admin_id = Some(id),
            Subject::Customer(id) => claims.customer_id = Some(id),
        }

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-with-enough-entropy".into(), 1)
    }

    #[test]
    fn issued_token_carries_only_its_actor() {
        let id = Uuid::new_v4();
        let tokens = service();
        let claims = tokens.verify(&tokens.issue(Subject::Admin(id)).unwrap()).unwrap();

        assert_eq!(claims.admin_id, Some(id));
        assert!(claims.business_id.is_none());
        assert!(claims.customer_id.is_none());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn claims_use_camel_case_names() {
        let id = Uuid::new_v4();
        let claims = Claims {
            business_id: Some(id),
            admin_id: None,
            customer_id: None,
            exp: 10,
            iat: 1,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["businessId"], id.to_string());
        assert!(value.get("adminId").is_none());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = TokenService::new("another-secret".into(), 1);
        let token = other.issue(Subject::Customer(Uuid::new_v4())).unwrap();
        assert!(matches!(service().verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn rejects_expired_token() {
        let expired = TokenService::new("test-secret-with-enough-entropy".into(), -2);
        let token = expired.issue(Subject::Business(Uuid::new_v4())).unwrap();
        assert!(matches!(service().verify(&token), Err(AuthError::ExpiredToken)));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", service());
        assert!(!rendered.contains("test-secret"));
    }
}
