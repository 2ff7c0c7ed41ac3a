use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AuthConfig;
use crate::storage::{Role, User};

const ACCESS_TOKEN_TYPE: &str = "access";

/// Access Token Claims
///
/// `sub` 是用户邮箱，`id`/`role`/`verified` 供守卫直接判断，不用再查库。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub id: i32,
    pub role: Role,
    pub verified: bool,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for generating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
        }
    }

    /// Create JwtService from config
    pub fn from_config(config: &AuthConfig) -> Self {
        // 获取 JWT secret，如果为空则生成一个安全的随机值
        let jwt_secret = if config.jwt_secret.is_empty() {
            warn!("JWT secret not configured or empty, generating secure random token");
            crate::utils::generate_secure_token(32)
        } else {
            config.jwt_secret.clone()
        };

        Self::new(&jwt_secret, config.token_minutes)
    }

    /// 人类可读的有效期，如 "1h" / "90m"
    pub fn expires_in(&self) -> String {
        let minutes = self.access_token_minutes;
        if minutes > 0 && minutes % 60 == 0 {
            format!("{}h", minutes / 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// Generate Access Token for a signed-in user
    pub fn generate_access_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.email.clone(),
            id: user.id,
            role: user.role,
            verified: user.verified,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate Access Token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;

        // Verify token type
        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Needs;

    fn create_test_service() -> JwtService {
        JwtService::new("test_secret_key_32_bytes_long!!", 60)
    }

    fn sample_user() -> User {
        User {
            id: 42,
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Customer,
            picture: "default.jpg".to_string(),
            description: None,
            needs: Needs::Host,
            carte_id: None,
            certificat_scolaire: None,
            verified: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = create_test_service();
        let token = service.generate_access_token(&sample_user()).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "ada@example.com");
        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, Role::Customer);
        assert!(claims.verified);
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expires_in_format() {
        assert_eq!(create_test_service().expires_in(), "1h");
        assert_eq!(JwtService::new("k", 90).expires_in(), "90m");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_access_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", 60);

        let token = service1.generate_access_token(&sample_user()).unwrap();
        assert!(service2.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_non_access_token_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = Claims {
            sub: "ada@example.com".to_string(),
            id: 42,
            role: Role::Admin,
            verified: true,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!"),
        )
        .unwrap();

        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // 手动创建一个已过期的 token
        let service = create_test_service();

        // 过期时间超过默认 leeway
        let now = Utc::now();
        let claims = Claims {
            sub: "ada@example.com".to_string(),
            id: 42,
            role: Role::Customer,
            verified: false,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "access".to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!"),
        )
        .unwrap();

        let result = service.validate_access_token(&token);
        assert!(
            result.is_err(),
            "Expected expired token to be rejected, but got: {:?}",
            result
        );
    }
}
