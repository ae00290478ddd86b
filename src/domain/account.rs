use chrono::{DateTime, Utc};
use std::fmt;

use super::Email;

/// 新規登録ユーザーに付与するロール
pub const LIBRARY_MEMBER_ROLE: &str = "Library Member";

/// ログイン用のユーザーアカウント
///
/// パスワードはargon2のPHC文字列としてのみ保持する。
/// `Debug` 出力ではハッシュを伏せる。
#[derive(Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub email: Email,
    pub full_name: String,
    pub password_hash: String,
    pub enabled: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password_hash", &"<redacted>")
            .field("enabled", &self.enabled)
            .field("roles", &self.roles)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password_hash() {
        let account = UserAccount {
            email: Email::parse("ada@example.com").unwrap(),
            full_name: "Ada Lovelace".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            enabled: true,
            roles: vec![LIBRARY_MEMBER_ROLE.to_string()],
            created_at: Utc::now(),
        };

        let printed = format!("{:?}", account);

        assert!(!printed.contains("argon2id"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("ada@example.com"));
    }
}
