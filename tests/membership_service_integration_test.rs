use chrono::{Duration, Utc};
use library_rental::application::ApplicationError;
use library_rental::application::membership::{
    check_membership_eligibility, get_member_activity, get_membership_status, join_membership,
};
use library_rental::application::rental::{rent_article, return_article};
use library_rental::domain::commands::{JoinMembership, RentArticle, ReturnArticle};
use library_rental::domain::{Caller, TransactionType};
use library_rental::ports::{MemberRepository, MembershipRepository};

mod common;

use common::{
    caller, memory_deps, membership_for, seed_active_member, seed_article, seed_member, today,
};

fn join(caller: &Caller) -> JoinMembership {
    JoinMembership {
        caller: caller.clone(),
        today: today(),
        now: Utc::now(),
    }
}

// ============================================================================
// JoinMembership
// ============================================================================

#[tokio::test]
async fn test_join_membership_creates_member_and_year_long_membership() {
    // Arrange
    let (_store, deps) = memory_deps();
    let ada = caller("ada@example.com", "Ada Lovelace");

    // Act
    let membership = join_membership(&deps, join(&ada)).await.unwrap();

    // Assert
    assert_eq!(membership.from_date, today());
    assert_eq!(membership.to_date, today() + Duration::days(365));

    let member = deps
        .members
        .find_by_email(&ada.identity().unwrap().email)
        .await
        .unwrap()
        .expect("member should be created on join");
    assert_eq!(member.member_id, membership.member_id);
    assert_eq!(member.first_name, "Ada");
    assert_eq!(member.last_name, "Lovelace");

    let stored = deps.memberships.find_by_member(member.member_id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_join_membership_twice_is_rejected() {
    let (_store, deps) = memory_deps();
    let ada = caller("ada@example.com", "Ada Lovelace");
    join_membership(&deps, join(&ada)).await.unwrap();

    let result = join_membership(&deps, join(&ada)).await;

    assert!(matches!(result, Err(ApplicationError::AlreadyActive)));
}

#[tokio::test]
async fn test_join_membership_after_expiry() {
    let (store, deps) = memory_deps();
    let member = seed_member(&deps, "ada@example.com", "Ada Lovelace").await;
    store
        .add_membership(membership_for(
            &member,
            today() - Duration::days(400),
            today() - Duration::days(35),
        ))
        .await;

    let membership = join_membership(&deps, join(&caller("ada@example.com", "Ada Lovelace")))
        .await
        .unwrap();

    assert_eq!(membership.member_id, member.member_id);
    let stored = deps.memberships.find_by_member(member.member_id).await.unwrap();
    assert_eq!(stored.len(), 2);
    // 開始日の新しい順
    assert_eq!(stored[0].membership_id, membership.membership_id);
}

#[tokio::test]
async fn test_join_membership_guest_is_unauthenticated() {
    let (_store, deps) = memory_deps();

    let result = join_membership(&deps, join(&Caller::Guest)).await;

    assert!(matches!(result, Err(ApplicationError::Unauthenticated)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_join_creates_one_membership() {
    let (_store, deps) = memory_deps();
    let ada = caller("ada@example.com", "Ada Lovelace");

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let deps = deps.clone();
            let ada = ada.clone();
            tokio::spawn(async move { join_membership(&deps, join(&ada)).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(ApplicationError::AlreadyActive) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
}

// ============================================================================
// CheckMembershipEligibility
// ============================================================================

#[tokio::test]
async fn test_eligibility_without_member_record() {
    let (_store, deps) = memory_deps();

    let eligibility =
        check_membership_eligibility(&deps, &caller("ada@example.com", "Ada Lovelace"), today())
            .await
            .unwrap();

    assert!(eligibility.eligible);
    assert!(eligibility.needs_member_creation);
}

#[tokio::test]
async fn test_eligibility_with_active_membership() {
    let (store, deps) = memory_deps();
    seed_active_member(&store, &deps, "ada@example.com", "Ada Lovelace").await;

    let eligibility =
        check_membership_eligibility(&deps, &caller("ada@example.com", "Ada Lovelace"), today())
            .await
            .unwrap();

    assert!(!eligibility.eligible);
    assert!(!eligibility.needs_member_creation);
}

#[tokio::test]
async fn test_eligibility_with_member_but_no_membership() {
    let (_store, deps) = memory_deps();
    seed_member(&deps, "ada@example.com", "Ada Lovelace").await;

    let eligibility =
        check_membership_eligibility(&deps, &caller("ada@example.com", "Ada Lovelace"), today())
            .await
            .unwrap();

    assert!(eligibility.eligible);
    assert!(!eligibility.needs_member_creation);
}

#[tokio::test]
async fn test_eligibility_does_not_create_member() {
    let (_store, deps) = memory_deps();
    let ada = caller("ada@example.com", "Ada Lovelace");

    check_membership_eligibility(&deps, &ada, today()).await.unwrap();

    let member = deps
        .members
        .find_by_email(&ada.identity().unwrap().email)
        .await
        .unwrap();
    assert!(member.is_none());
}

#[tokio::test]
async fn test_eligibility_guest_is_unauthenticated() {
    let (_store, deps) = memory_deps();

    let result = check_membership_eligibility(&deps, &Caller::Guest, today()).await;

    assert!(matches!(result, Err(ApplicationError::Unauthenticated)));
}

// ============================================================================
// GetMembershipStatus
// ============================================================================

#[tokio::test]
async fn test_membership_status_lists_only_active() {
    let (store, deps) = memory_deps();
    let member = seed_active_member(&store, &deps, "ada@example.com", "Ada Lovelace").await;
    store
        .add_membership(membership_for(
            &member,
            today() - Duration::days(800),
            today() - Duration::days(435),
        ))
        .await;

    let status = get_membership_status(&deps, &caller("ada@example.com", "Ada Lovelace"), today())
        .await
        .unwrap();

    assert!(status.has_membership());
    assert_eq!(status.active.len(), 1);
    assert_eq!(status.member.map(|m| m.member_id), Some(member.member_id));
}

#[tokio::test]
async fn test_membership_status_without_member_is_empty() {
    let (_store, deps) = memory_deps();

    let status = get_membership_status(&deps, &caller("ada@example.com", "Ada Lovelace"), today())
        .await
        .unwrap();

    assert!(!status.has_membership());
    assert!(status.member.is_none());
}

#[tokio::test]
async fn test_membership_boundary_days_are_active() {
    let (store, deps) = memory_deps();
    let member = seed_member(&deps, "ada@example.com", "Ada Lovelace").await;
    store
        .add_membership(membership_for(&member, today() - Duration::days(365), today()))
        .await;

    let status = get_membership_status(&deps, &caller("ada@example.com", "Ada Lovelace"), today())
        .await
        .unwrap();
    assert!(status.has_membership());

    let tomorrow = get_membership_status(
        &deps,
        &caller("ada@example.com", "Ada Lovelace"),
        today() + Duration::days(1),
    )
    .await
    .unwrap();
    assert!(!tomorrow.has_membership());
}

// ============================================================================
// GetMemberActivity
// ============================================================================

#[tokio::test]
async fn test_member_activity_includes_all_history() {
    // Arrange
    let (store, deps) = memory_deps();
    seed_active_member(&store, &deps, "ada@example.com", "Ada Lovelace").await;
    let ada = caller("ada@example.com", "Ada Lovelace");
    let article = seed_article(&deps, "Dune").await;

    let receipt = rent_article(
        &deps,
        RentArticle {
            caller: ada.clone(),
            article_id: Some(article.article_id),
            today: today(),
            now: Utc::now(),
        },
    )
    .await
    .unwrap();
    return_article(
        &deps,
        ReturnArticle {
            caller: ada.clone(),
            transaction_id: Some(receipt.transaction_id),
            today: today(),
            now: Utc::now(),
        },
    )
    .await
    .unwrap();

    // Act
    let activity = get_member_activity(&deps, &ada).await.unwrap();

    // Assert
    assert_eq!(activity.transactions.len(), 2);
    assert_eq!(activity.transactions[0].transaction_type, TransactionType::Return);
    assert_eq!(activity.transactions[1].transaction_type, TransactionType::Issue);
    assert_eq!(activity.memberships.len(), 1);
}

#[tokio::test]
async fn test_member_activity_unknown_member() {
    let (_store, deps) = memory_deps();

    let result = get_member_activity(&deps, &caller("ghost@example.com", "Ghost")).await;

    assert!(matches!(result, Err(ApplicationError::MemberNotFound)));
}
