//! End-to-end behaviour of `ReviewService` over the in-memory store.

use std::sync::Arc;

use review_core::{AppError, ApprovalConfig, ReviewCandidate, ReviewId, ReviewService, UserId};
use review_store_memory::MemoryReviewRepo;

fn service(repo: &MemoryReviewRepo, min_approvals: u32) -> ReviewService {
    ReviewService::new(
        Arc::new(repo.clone()),
        Arc::new(ApprovalConfig::new(min_approvals).unwrap()),
    )
}

#[tokio::test]
async fn quorum_of_two_approves_after_second_approval() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 2);
    let u1 = repo.create_user("u1").await;
    let u2 = repo.create_user("u2").await;
    let u3 = repo.create_user("u3").await;
    let p1 = repo.create_pos("Cafeteria").await;

    let created = svc
        .upsert_review(ReviewCandidate::new(p1.id, u1.id, "Solid filter coffee"))
        .await
        .unwrap();
    assert_eq!(created.approval_count, 0);
    assert!(!created.approved);
    let id = created.id.unwrap();

    let once = svc.approve_review(id, u2.id).await.unwrap();
    assert_eq!(once.approval_count, 1);
    assert!(!once.approved);

    let twice = svc.approve_review(id, u3.id).await.unwrap();
    assert_eq!(twice.approval_count, 2);
    assert!(twice.approved);
}

#[tokio::test]
async fn new_review_ignores_supplied_approval_count() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 3);
    let u1 = repo.create_user("u1").await;
    let p1 = repo.create_pos("Kiosk am Bahnhof").await;
    let candidate = ReviewCandidate {
        approval_count: Some(5),
        ..ReviewCandidate::new(p1.id, u1.id, "Best pretzels in town")
    };

    let created = svc.upsert_review(candidate).await.unwrap();
    let stored = svc.get_review(created.id.unwrap()).await.unwrap();

    assert_eq!(stored.approval_count, 0);
    assert!(!stored.approved);
}

#[tokio::test]
async fn duplicate_create_conflicts_but_edit_succeeds() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 3);
    let u1 = repo.create_user("u1").await;
    let p1 = repo.create_pos("Mensa").await;

    let first = svc
        .upsert_review(ReviewCandidate::new(p1.id, u1.id, "Too sweet"))
        .await
        .unwrap();
    let id = first.id.unwrap();

    let err = svc
        .upsert_review(ReviewCandidate::new(p1.id, u1.id, "Still too sweet"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let edited = svc
        .upsert_review(ReviewCandidate::edit(id, p1.id, u1.id, "Better since the new barista"))
        .await
        .unwrap();
    assert_eq!(edited.id, Some(id));
    assert_eq!(edited.text, "Better since the new barista");
    assert_eq!(edited.created_at, first.created_at);
    assert_eq!(repo.review_count().await, 1);
}

#[tokio::test]
async fn edit_does_not_reset_approvals() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 1);
    let author = repo.create_user("author").await;
    let fan = repo.create_user("fan").await;
    let pos = repo.create_pos("Kiosk").await;

    let id = svc
        .upsert_review(ReviewCandidate::new(pos.id, author.id, "Good"))
        .await
        .unwrap()
        .id
        .unwrap();
    svc.approve_review(id, fan.id).await.unwrap();

    let edited = svc
        .upsert_review(ReviewCandidate::edit(id, pos.id, author.id, "Very good"))
        .await
        .unwrap();

    assert_eq!(edited.approval_count, 1);
    assert!(edited.approved);
}

#[tokio::test]
async fn self_approval_is_forbidden() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 1);
    let author = repo.create_user("author").await;
    let pos = repo.create_pos("Bakery").await;
    let id = svc
        .upsert_review(ReviewCandidate::new(pos.id, author.id, "Mine is the best"))
        .await
        .unwrap()
        .id
        .unwrap();

    let err = svc.approve_review(id, author.id).await.unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(svc.get_review(id).await.unwrap().approval_count, 0);
}

#[tokio::test]
async fn approving_unknown_review_has_no_side_effect() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 1);
    let user = repo.create_user("someone").await;

    let err = svc.approve_review(ReviewId::new(), user.id).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(..)));
    assert_eq!(repo.review_count().await, 0);
}

#[tokio::test]
async fn unknown_author_is_rejected_without_insert() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 1);
    let pos = repo.create_pos("Bakery").await;

    let err = svc
        .upsert_review(ReviewCandidate::new(pos.id, UserId::new(), "Who am I"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(..)));
    assert_eq!(repo.review_count().await, 0);
}

#[tokio::test]
async fn list_filters_by_approval_state() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 1);
    let a = repo.create_user("a").await;
    let b = repo.create_user("b").await;
    let pos = repo.create_pos("Roastery").await;
    let other_pos = repo.create_pos("Tea house").await;

    let ra = svc
        .upsert_review(ReviewCandidate::new(pos.id, a.id, "Fruity"))
        .await
        .unwrap();
    svc.upsert_review(ReviewCandidate::new(pos.id, b.id, "Bitter"))
        .await
        .unwrap();
    svc.upsert_review(ReviewCandidate::new(other_pos.id, a.id, "Green"))
        .await
        .unwrap();
    svc.approve_review(ra.id.unwrap(), b.id).await.unwrap();

    let approved = svc.list_reviews(pos.id, true).await.unwrap();
    let pending = svc.list_reviews(pos.id, false).await.unwrap();

    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, ra.id);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].author_id, b.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_approvals_are_not_lost() {
    let repo = MemoryReviewRepo::new();
    let svc = service(&repo, 5);
    let author = repo.create_user("author").await;
    let pos = repo.create_pos("Station").await;
    let id = svc
        .upsert_review(ReviewCandidate::new(pos.id, author.id, "Fast service"))
        .await
        .unwrap()
        .id
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..10 {
        let approver = repo.create_user(&format!("approver-{i}")).await;
        let svc = svc.clone();
        handles.push(tokio::spawn(async move { svc.approve_review(id, approver.id).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let review = svc.get_review(id).await.unwrap();
    assert_eq!(review.approval_count, 10);
    assert!(review.approved);
}
