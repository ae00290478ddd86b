use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{Email, Identity, UserAccount};

/// トークン有効期間の上限（時間）
pub const MAX_TOKEN_LIFETIME_HOURS: u64 = 24 * 366;

/// 有効期間が1時間未満か上限を超えている
#[derive(Debug, thiserror::Error)]
#[error("token lifetime must be between 1 and {max} hours, got {0}", max = MAX_TOKEN_LIFETIME_HOURS)]
pub struct InvalidTokenLifetime(pub u64);

/// 認証済み会員のJWTクレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemberClaims {
    sub: String,
    name: String,
    roles: Vec<String>,
    iat: i64,
    exp: i64,
}

/// ベアラートークン（HS256）の発行と検証
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, ttl_hours: u64) -> Result<Self, InvalidTokenLifetime> {
        let ttl = Some(ttl_hours)
            .filter(|hours| (1..=MAX_TOKEN_LIFETIME_HOURS).contains(hours))
            .and_then(|hours| i64::try_from(hours).ok())
            .and_then(Duration::try_hours)
            .ok_or(InvalidTokenLifetime(ttl_hours))?;

        Ok(Self {
            secret: secret.into(),
            ttl,
        })
    }

    pub fn issue(
        &self,
        account: &UserAccount,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = MemberClaims {
            sub: account.email.as_str().to_string(),
            name: account.full_name.clone(),
            roles: account.roles.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// 署名と有効期限を検証し、呼び出し元の身元を復元する
    pub fn verify(&self, token: &str) -> Result<Identity, jsonwebtoken::errors::Error> {
        let data = decode::<MemberClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        let email = Email::parse(&data.claims.sub)
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject)?;

        Ok(Identity {
            email,
            full_name: data.claims.name,
            roles: data.claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::LIBRARY_MEMBER_ROLE;

    fn account() -> UserAccount {
        UserAccount {
            email: Email::parse("grace@example.com").unwrap(),
            full_name: "Grace Hopper".to_string(),
            password_hash: String::new(),
            enabled: true,
            roles: vec![LIBRARY_MEMBER_ROLE.to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify_restores_identity() {
        let issuer = TokenIssuer::new("secret", 24).unwrap();
        let token = issuer.issue(&account(), Utc::now()).unwrap();

        let identity = issuer.verify(&token).unwrap();
        assert_eq!(identity.email.as_str(), "grace@example.com");
        assert_eq!(identity.full_name, "Grace Hopper");
        assert_eq!(identity.roles, vec![LIBRARY_MEMBER_ROLE.to_string()]);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let token = TokenIssuer::new("secret", 24).unwrap()
            .issue(&account(), Utc::now())
            .unwrap();
        assert!(TokenIssuer::new("other", 24).unwrap().verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let issuer = TokenIssuer::new("secret", 1).unwrap();
        let token = issuer
            .issue(&account(), Utc::now() - Duration::hours(3))
            .unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(TokenIssuer::new("secret", 1).unwrap().verify("not-a-token").is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range_lifetime() {
        for hours in [0, MAX_TOKEN_LIFETIME_HOURS + 1, u64::MAX] {
            assert!(matches!(
                TokenIssuer::new("secret", hours),
                Err(InvalidTokenLifetime(h)) if h == hours
            ));
        }
    }

    #[test]
    fn test_longest_lifetime_still_issues() {
        let issuer = TokenIssuer::new("secret", MAX_TOKEN_LIFETIME_HOURS).unwrap();
        let token = issuer.issue(&account(), Utc::now()).unwrap();
        assert!(issuer.verify(&token).is_ok());
    }
}
