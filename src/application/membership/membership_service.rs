use chrono::NaiveDate;

use crate::application::dependencies::{
    ServiceDependencies, find_member, find_or_register_member, require_identity,
};
use crate::application::errors::{ApplicationError, Result};
use crate::domain::{self, Caller, Member, Membership, Transaction, commands::JoinMembership};

/// 会員資格への加入可否
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// 有効な会員資格がなく、加入できる
    pub eligible: bool,
    /// 会員レコードをまず作成する必要がある
    pub needs_member_creation: bool,
}

/// 有効な会員資格の一覧
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipStatus {
    pub member: Option<Member>,
    pub active: Vec<Membership>,
}

impl MembershipStatus {
    pub fn has_membership(&self) -> bool {
        !self.active.is_empty()
    }
}

/// 会員の全履歴（管理・調査用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberActivity {
    pub member: Member,
    /// 取引（日付の新しい順）
    pub transactions: Vec<Transaction>,
    /// 会員資格（開始日の新しい順）
    pub memberships: Vec<Membership>,
}

/// 会員資格に加入する
///
/// ビジネスルール：
/// - ゲストは加入できない
/// - 会員レコードがなければ先に作成する
/// - 有効な会員資格があれば加入できない
/// - 期間は今日から365日間
///
/// 会員をロックした作業単位の中で確認と登録を行い、二重加入を防ぐ。
pub async fn join_membership(deps: &ServiceDependencies, cmd: JoinMembership) -> Result<Membership> {
    let identity = require_identity(&cmd.caller)?;
    find_or_register_member(deps, identity, cmd.now).await?;

    let mut uow = deps
        .unit_of_work
        .begin()
        .await
        .map_err(ApplicationError::StoreError)?;

    let member = uow
        .lock_member(&identity.email)
        .await
        .map_err(ApplicationError::StoreError)?
        .ok_or(ApplicationError::MemberNotFound)?;

    let existing = uow
        .memberships(member.member_id)
        .await
        .map_err(ApplicationError::StoreError)?;

    let membership =
        domain::member::join_membership(member.member_id, &existing, cmd.today, cmd.now)?;

    uow.insert_membership(&membership)
        .await
        .map_err(ApplicationError::StoreError)?;
    uow.commit().await.map_err(ApplicationError::StoreError)?;

    tracing::info!(
        member_id = %member.member_id,
        membership_id = %membership.membership_id,
        to_date = %membership.to_date,
        "Membership created"
    );

    Ok(membership)
}

/// 会員資格への加入可否を確認する（読み取りのみ）
pub async fn check_membership_eligibility(
    deps: &ServiceDependencies,
    caller: &Caller,
    today: NaiveDate,
) -> Result<Eligibility> {
    let identity = require_identity(caller)?;

    let Some(member) = find_member(deps, identity).await? else {
        return Ok(Eligibility {
            eligible: true,
            needs_member_creation: true,
        });
    };

    let active = deps
        .memberships
        .find_active(member.member_id, today)
        .await
        .map_err(ApplicationError::StoreError)?;

    Ok(Eligibility {
        eligible: active.is_empty(),
        needs_member_creation: false,
    })
}

/// 有効な会員資格を取得する
///
/// 会員が未登録の場合は空の結果を返す（エラーにはしない）。
pub async fn get_membership_status(
    deps: &ServiceDependencies,
    caller: &Caller,
    today: NaiveDate,
) -> Result<MembershipStatus> {
    let identity = require_identity(caller)?;

    let Some(member) = find_member(deps, identity).await? else {
        return Ok(MembershipStatus {
            member: None,
            active: Vec::new(),
        });
    };

    let active = deps
        .memberships
        .find_active(member.member_id, today)
        .await
        .map_err(ApplicationError::StoreError)?;

    Ok(MembershipStatus {
        member: Some(member),
        active,
    })
}

/// 会員の全取引と全会員資格を取得する
pub async fn get_member_activity(
    deps: &ServiceDependencies,
    caller: &Caller,
) -> Result<MemberActivity> {
    let identity = require_identity(caller)?;
    let member = find_member(deps, identity)
        .await?
        .ok_or(ApplicationError::MemberNotFound)?;

    let mut transactions = deps
        .transactions
        .find_by_member(member.member_id)
        .await
        .map_err(ApplicationError::StoreError)?;
    // 挿入順から新しい順へ（同日は後の取引を先に）
    transactions.reverse();
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    let memberships = deps
        .memberships
        .find_by_member(member.member_id)
        .await
        .map_err(ApplicationError::StoreError)?;

    Ok(MemberActivity {
        member,
        transactions,
        memberships,
    })
}

