use crate::application::dependencies::ServiceDependencies;
use crate::application::errors::{ApplicationError, Result};
use crate::domain::{
    self, Email, Member, UserAccount,
    account::LIBRARY_MEMBER_ROLE,
    commands::{Login, Signup},
};

use super::password::{hash_password, verify_password};

/// ログイン後の既定の遷移先
pub const DEFAULT_REDIRECT: &str = "/home";

/// 登録結果
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub account: UserAccount,
    pub member: Member,
    pub token: String,
    pub redirect_url: String,
}

/// ログイン結果
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: UserAccount,
    pub token: String,
    pub redirect_url: String,
}

/// アカウントを登録し、そのままログインする
///
/// ビジネスルール：
/// - 氏名・メールアドレス・パスワードはすべて必須
/// - 登録済みのメールアドレスは使えない（無効化済みなら別のエラー）
/// - 新しいアカウントには "Library Member" ロールを付与する
/// - 同じメールアドレスの会員レコードを作成する
pub async fn signup(deps: &ServiceDependencies, cmd: Signup) -> Result<SignupOutcome> {
    let full_name = cmd.full_name.trim();
    let raw_email = cmd.email.trim();
    if full_name.is_empty() || raw_email.is_empty() || cmd.password.is_empty() {
        return Err(ApplicationError::InvalidInput(
            "Full name, email, and password are required.".to_string(),
        ));
    }
    let email = parse_email(raw_email)?;

    let account = UserAccount {
        email: email.clone(),
        full_name: full_name.to_string(),
        password_hash: hash_password(&cmd.password)?,
        enabled: true,
        roles: vec![LIBRARY_MEMBER_ROLE.to_string()],
        created_at: cmd.now,
    };
    let token = deps
        .tokens
        .issue(&account, cmd.now)
        .map_err(ApplicationError::TokenError)?;
    let candidate = domain::member::register_member(full_name, email.clone(), cmd.now);

    // アカウントと会員は同じ作業単位で確定させる
    let mut uow = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    if let Some(existing) = uow
        .account(&email)
        .await
        .map_err(ApplicationError::StoreError)?
    {
        return Err(already_registered(&existing));
    }

    if !uow
        .insert_account(&account)
        .await
        .map_err(ApplicationError::StoreError)?
    {
        // 同時に登録された。先行側の状態で判定する
        let existing = uow
            .account(&email)
            .await
            .map_err(ApplicationError::StoreError)?;
        return Err(existing
            .as_ref()
            .map(already_registered)
            .unwrap_or(ApplicationError::EmailAlreadyRegistered));
    }

    let member = uow
        .insert_member_if_absent(&candidate)
        .await
        .map_err(ApplicationError::StoreError)?;

    uow.commit().await.map_err(ApplicationError::StoreError)?;

    tracing::info!(
        email = %account.email,
        member_id = %member.member_id,
        "Account created"
    );

    Ok(SignupOutcome {
        account,
        member,
        token,
        redirect_url: redirect_or_default(cmd.redirect_to),
    })
}

/// メールアドレスとパスワードで認証し、トークンを発行する
pub async fn login(deps: &ServiceDependencies, cmd: Login) -> Result<LoginOutcome> {
    let raw_email = cmd.email.trim();
    if raw_email.is_empty() || cmd.password.is_empty() {
        return Err(ApplicationError::InvalidInput(
            "Email and password are required.".to_string(),
        ));
    }
    let email = Email::parse(raw_email).map_err(|_| ApplicationError::UserNotFound)?;

    let account = deps
        .accounts
        .find_by_email(&email)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::UserNotFound)?;

    if !account.enabled {
        return Err(ApplicationError::InvalidCredentials(
            "This account is disabled.".to_string(),
        ));
    }

    if !verify_password(&cmd.password, &account.password_hash)? {
        tracing::debug!(email = %account.email, "Login rejected");
        return Err(ApplicationError::InvalidCredentials(
            "Invalid password.".to_string(),
        ));
    }

    let token = deps
        .tokens
        .issue(&account, cmd.now)
        .map_err(ApplicationError::TokenError)?;

    tracing::info!(email = %account.email, "User logged in");

    Ok(LoginOutcome {
        account,
        token,
        redirect_url: redirect_or_default(cmd.next),
    })
}

fn already_registered(existing: &UserAccount) -> ApplicationError {
    if existing.enabled {
        ApplicationError::EmailAlreadyRegistered
    } else {
        ApplicationError::AccountDisabled
    }
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(raw)
        .map_err(|_| ApplicationError::InvalidInput("Please enter a valid email address.".to_string()))
}

fn redirect_or_default(redirect: Option<String>) -> String {
    redirect
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_defaults_to_home() {
        assert_eq!(redirect_or_default(None), "/home");
        assert_eq!(redirect_or_default(Some("  ".to_string())), "/home");
        assert_eq!(redirect_or_default(Some("/rentals".to_string())), "/rentals");
    }

    #[test]
    fn test_parse_email_rejects_missing_at_sign() {
        assert!(matches!(
            parse_email("not-an-email"),
            Err(ApplicationError::InvalidInput(_))
        ));
    }
}
