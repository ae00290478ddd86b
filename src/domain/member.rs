use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, JoinMembershipError, MemberId, MembershipId};

/// 会員資格の有効期間（日数）
pub const MEMBERSHIP_VALIDITY_DAYS: i64 = 365;

/// 会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// 表示名（姓が空なら名のみ）
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

/// 会員資格 - 貸出を許可する期間付きの権利
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub membership_id: MembershipId,
    pub member_id: MemberId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// `from_date <= today <= to_date` のとき有効
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.from_date <= today && today <= self.to_date
    }
}

/// 純粋関数：氏名から会員を作成する
///
/// 先頭の語を名、残りを姓とする。氏名が空ならメールアドレスを名に使う。
pub fn register_member(full_name: &str, email: Email, now: DateTime<Utc>) -> Member {
    let mut words = full_name.split_whitespace();
    let first_name = words
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| email.as_str().to_string());
    let last_name = words.collect::<Vec<_>>().join(" ");

    Member {
        member_id: MemberId::new(),
        first_name,
        last_name,
        email,
        created_at: now,
    }
}

/// 純粋関数：会員資格に加入する
///
/// ビジネスルール：
/// - 有効な会員資格がある間は加入できない
/// - 期間は今日から365日間
/// - 期限切れ後は再加入できる
pub fn join_membership(
    member_id: MemberId,
    existing: &[Membership],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Membership, JoinMembershipError> {
    if existing.iter().any(|m| m.is_active_on(today)) {
        return Err(JoinMembershipError::AlreadyActive);
    }

    Ok(Membership {
        membership_id: MembershipId::new(),
        member_id,
        from_date: today,
        to_date: today + Duration::days(MEMBERSHIP_VALIDITY_DAYS),
        created_at: now,
    })
}
