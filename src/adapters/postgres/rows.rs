use crate::domain::{
    Article, ArticleId, ArticleStatus, Email, Member, MemberId, Membership, MembershipId,
    Transaction, TransactionId, TransactionType, UserAccount,
};
use crate::ports::PortError;
use sqlx::{Row, postgres::PgRow};
use std::str::FromStr;

type Result<T> = std::result::Result<T, PortError>;

fn invalid_data(message: String) -> PortError {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

fn email_column(row: &PgRow) -> Result<Email> {
    let raw: &str = row.get("email");
    Email::parse(raw).map_err(|e| invalid_data(format!("invalid stored email {}: {:?}", raw, e)))
}

/// 会員の行をドメインに変換する
pub(super) fn map_row_to_member(row: &PgRow) -> Result<Member> {
    Ok(Member {
        member_id: MemberId::from_uuid(row.get("member_id")),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: email_column(row)?,
        created_at: row.get("created_at"),
    })
}

pub(super) fn map_row_to_membership(row: &PgRow) -> Result<Membership> {
    Ok(Membership {
        membership_id: MembershipId::from_uuid(row.get("membership_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        from_date: row.get("from_date"),
        to_date: row.get("to_date"),
        created_at: row.get("created_at"),
    })
}

/// 資料の行をドメインに変換する
///
/// 状態は文字列で保存されているため、不正な値はエラーにする。
pub(super) fn map_row_to_article(row: &PgRow) -> Result<Article> {
    let status_str: &str = row.get("status");
    let status = ArticleStatus::from_str(status_str).map_err(invalid_data)?;

    Ok(Article {
        article_id: ArticleId::from_uuid(row.get("article_id")),
        title: row.get("title"),
        author: row.get("author"),
        publisher: row.get("publisher"),
        isbn: row.get("isbn"),
        description: row.get("description"),
        image: row.get("image"),
        route: row.get("route"),
        status,
        created_at: row.get("created_at"),
    })
}

pub(super) fn map_row_to_transaction(row: &PgRow) -> Result<Transaction> {
    let type_str: &str = row.get("transaction_type");
    let transaction_type = TransactionType::from_str(type_str).map_err(invalid_data)?;

    Ok(Transaction {
        transaction_id: TransactionId::from_uuid(row.get("transaction_id")),
        article_id: ArticleId::from_uuid(row.get("article_id")),
        member_id: MemberId::from_uuid(row.get("member_id")),
        transaction_type,
        date: row.get("date"),
        submitted: row.get("submitted"),
        created_at: row.get("created_at"),
    })
}

pub(super) fn map_row_to_account(row: &PgRow) -> Result<UserAccount> {
    Ok(UserAccount {
        email: email_column(row)?,
        full_name: row.get("full_name"),
        password_hash: row.get("password_hash"),
        enabled: row.get("enabled"),
        roles: row.get("roles"),
        created_at: row.get("created_at"),
    })
}

/// 設定値（INTEGER）を正の値のみ受け付けて変換する
pub(super) fn positive_setting(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}
