//! Service properties against PostgreSQL
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test postgres_tests

use futures::future::join_all;
use integration_tests::{
    actor, assert_counters_consistent, check_test_env, postgres_context, unique_id, Comment, Post,
};
use likeable_core::{OwnerRef, ReactionType};
use likeable_service::{Likeable, LikeableService, ReactionOutcome};

#[tokio::test]
async fn test_two_user_scenario() {
    if !check_test_env() {
        return;
    }

    let ctx = postgres_context().await.expect("Failed to connect");
    let service = LikeableService::new(&ctx);
    let owner = Post::unique();
    let o = service.record(&owner);
    let (a, b) = (actor(unique_id()), actor(unique_id()));

    o.like(a).await.unwrap();
    assert_eq!(o.like_count().await.unwrap(), 1);
    assert!(o.liked(a).await.unwrap());
    assert!(!o.liked(b).await.unwrap());

    o.like(b).await.unwrap();
    assert_eq!(o.like_count().await.unwrap(), 2);

    o.unlike(a).await.unwrap();
    assert_eq!(o.like_count().await.unwrap(), 1);
    assert!(!o.liked(a).await.unwrap());

    o.unlike(b).await.unwrap();
    assert_eq!(o.like_count().await.unwrap(), 0);
    assert!(ctx
        .store()
        .counters()
        .find(&owner.owner_ref(), &ReactionType::like())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_from_distinct_actors() {
    if !check_test_env() {
        return;
    }

    let ctx = postgres_context().await.expect("Failed to connect");
    let post = Post::unique();
    let base = unique_id();

    let tasks = (0..25_i64).map(|i| {
        let ctx = ctx.clone();
        let owner = post.owner_ref();
        tokio::spawn(async move {
            LikeableService::new(&ctx)
                .like(&owner, actor(base + i), &ReactionType::like())
                .await
        })
    });
    for result in join_all(tasks).await {
        assert_eq!(result.unwrap().unwrap(), ReactionOutcome::Applied);
    }

    let service = LikeableService::new(&ctx);
    assert_eq!(service.record(&post).like_count().await.unwrap(), 25);
    assert_counters_consistent(&ctx, &[post.owner_ref()], &ReactionType::like())
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_likes_count_once() {
    if !check_test_env() {
        return;
    }

    let ctx = postgres_context().await.expect("Failed to connect");
    let post = Post::unique();
    let user = actor(unique_id());

    let tasks = (0..10).map(|_| {
        let ctx = ctx.clone();
        let owner = post.owner_ref();
        tokio::spawn(async move {
            LikeableService::new(&ctx)
                .like(&owner, user, &ReactionType::like())
                .await
        })
    });
    let applied = join_all(tasks)
        .await
        .into_iter()
        .filter(|r| matches!(r, Ok(Ok(ReactionOutcome::Applied))))
        .count();

    assert_eq!(applied, 1);
    assert_eq!(
        LikeableService::new(&ctx)
            .record(&post)
            .like_count()
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_rebuild_removes_stale_counters() {
    if !check_test_env() {
        return;
    }

    let ctx = postgres_context().await.expect("Failed to connect");
    let service = LikeableService::new(&ctx);
    let like = ReactionType::like();
    // private owner type so the rebuild never touches other tests' rows
    let owner_type = format!("rebuild_{}", unique_id());
    let liked = OwnerRef::new(&owner_type, 1);
    let stale = OwnerRef::new(&owner_type, 2);

    service.like(&liked, actor(1), &like).await.unwrap();
    service.like(&liked, actor(2), &like).await.unwrap();
    ctx.store().counters().increment(&stale, &like).await.unwrap();

    let report = service.rebuild(&owner_type, &like).await.unwrap();
    assert_eq!(report.counters, 1);
    assert_eq!(report.reactions, 2);

    assert_counters_consistent(&ctx, &[liked, stale], &like)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_owner_deletion_cascade() {
    if !check_test_env() {
        return;
    }

    let ctx = postgres_context().await.expect("Failed to connect");
    let service = LikeableService::new(&ctx);
    let post = service.record(&Post::unique());
    let comment = service.record(&Comment::unique());

    post.like(actor(1)).await.unwrap();
    post.dislike(actor(2)).await.unwrap();
    comment.like(actor(1)).await.unwrap();

    assert_eq!(post.deleted().await.unwrap(), 2);
    assert_eq!(post.like_count().await.unwrap(), 0);
    assert_eq!(post.dislike_count().await.unwrap(), 0);

    assert_eq!(comment.deleted().await.unwrap(), 0);
    assert_eq!(comment.like_count().await.unwrap(), 1);
    assert_eq!(Comment::OWNER_TYPE, comment.owner().owner_type);
}
