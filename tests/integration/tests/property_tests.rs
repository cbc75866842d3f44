//! Service properties against the in-memory store
//!
//! Run with: cargo test -p integration-tests --test property_tests

use futures::future::join_all;
use integration_tests::{
    actor, assert_counters_consistent, memory_context, memory_context_with, test_registry,
    Comment, Post, Script,
};
use likeable_common::CascadeConfig;
use likeable_core::{ActorId, OwnerRef, ReactionType};
use likeable_service::{with_actor, Likeable, LikeableService, OwnerRegistry, ReactionOutcome};

// ============================================================================
// Idempotence & Symmetry
// ============================================================================

#[tokio::test]
async fn test_repeated_like_counts_once() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let post = Post::unique();
    let record = service.record(&post);

    assert_eq!(record.like(actor(1)).await.unwrap(), ReactionOutcome::Applied);
    for _ in 0..3 {
        assert_eq!(record.like(actor(1)).await.unwrap(), ReactionOutcome::Unchanged);
    }

    assert_eq!(record.like_count().await.unwrap(), 1);
    assert_eq!(record.likes(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unlike_without_like_is_noop() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let record = service.record(&Post::unique());

    assert_eq!(record.unlike(actor(1)).await.unwrap(), ReactionOutcome::Unchanged);
    assert_eq!(record.like_count().await.unwrap(), 0);
    assert!(ctx
        .store()
        .counters()
        .find(record.owner(), &ReactionType::like())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_like_unlike_restores_state() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let record = service.record(&Post::unique());

    record.like(actor(2)).await.unwrap();
    record.like(actor(1)).await.unwrap();
    record.unlike(actor(1)).await.unwrap();

    assert_eq!(record.like_count().await.unwrap(), 1);
    assert!(!record.liked(actor(1)).await.unwrap());
    assert!(record.liked(actor(2)).await.unwrap());
}

// ============================================================================
// Scenario
// ============================================================================

#[tokio::test]
async fn test_two_user_scenario() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let owner = Post::unique();
    let o = service.record(&owner);
    let (a, b) = (actor(10), actor(20));

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

// ============================================================================
// Invariant under scripted sequences
// ============================================================================

#[tokio::test]
async fn test_counter_matches_reactions_after_scripted_sequence() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let owners: Vec<OwnerRef> = (0..4).map(|_| Post::unique().owner_ref()).collect();
    let types = [ReactionType::like(), ReactionType::dislike()];
    let mut script = Script::new(0x5eed);

    for _ in 0..400 {
        let owner = &owners[script.next_below(owners.len() as u64) as usize];
        let reaction_type = &types[script.next_below(2) as usize];
        let user = actor(script.next_below(6) as i64);

        match script.next_below(3) {
            0 | 1 => service.like(owner, user, reaction_type).await.unwrap(),
            _ => service.unlike(owner, user, reaction_type).await.unwrap(),
        };
    }

    for reaction_type in &types {
        assert_counters_consistent(&ctx, &owners, reaction_type)
            .await
            .unwrap();
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_from_distinct_actors() {
    let ctx = memory_context();
    let post = Post::unique();
    let n = 50;

    let tasks = (0..n).map(|i| {
        let ctx = ctx.clone();
        let owner = post.owner_ref();
        tokio::spawn(async move {
            LikeableService::new(&ctx)
                .like(&owner, actor(i), &ReactionType::like())
                .await
        })
    });
    for result in join_all(tasks).await {
        assert_eq!(result.unwrap().unwrap(), ReactionOutcome::Applied);
    }

    let service = LikeableService::new(&ctx);
    assert_eq!(service.record(&post).like_count().await.unwrap(), n);
    assert_eq!(service.record(&post).likes(100).await.unwrap().len(), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_likes_count_once() {
    let ctx = memory_context();
    let post = Post::unique();

    let tasks = (0..20).map(|_| {
        let ctx = ctx.clone();
        let owner = post.owner_ref();
        tokio::spawn(async move {
            LikeableService::new(&ctx)
                .like(&owner, actor(1), &ReactionType::like())
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

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_like_unlike_keeps_invariant() {
    let ctx = memory_context();
    let post = Post::unique();

    let tasks = (0..40_i64).map(|i| {
        let ctx = ctx.clone();
        let owner = post.owner_ref();
        tokio::spawn(async move {
            let service = LikeableService::new(&ctx);
            let like = ReactionType::like();
            service.like(&owner, actor(i % 8), &like).await?;
            service.unlike(&owner, actor((i + 3) % 8), &like).await
        })
    });
    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_counters_consistent(&ctx, &[post.owner_ref()], &ReactionType::like())
        .await
        .unwrap();
}

// ============================================================================
// Rebuild
// ============================================================================

#[tokio::test]
async fn test_rebuild_restores_drifted_counters() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let like = ReactionType::like();
    let liked = Post::unique();
    let stale = Post::unique();

    for user in 1..=3 {
        service.record(&liked).like(actor(user)).await.unwrap();
    }
    // simulate drift left behind by an out-of-band write
    ctx.store()
        .counters()
        .decrement(&liked.owner_ref(), &like)
        .await
        .unwrap();
    ctx.store()
        .counters()
        .increment(&stale.owner_ref(), &like)
        .await
        .unwrap();

    let report = service.rebuild(Post::OWNER_TYPE, &like).await.unwrap();
    assert_eq!(report.counters, 1);
    assert_eq!(report.reactions, 3);

    assert_counters_consistent(&ctx, &[liked.owner_ref(), stale.owner_ref()], &like)
        .await
        .unwrap();
    assert_eq!(service.record(&liked).like_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_rebuild_leaves_other_types_alone() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let post = Post::unique();
    let comment = Comment::unique();

    service.record(&post).dislike(actor(1)).await.unwrap();
    service.record(&comment).like(actor(1)).await.unwrap();

    service
        .rebuild(Post::OWNER_TYPE, &ReactionType::like())
        .await
        .unwrap();

    assert_eq!(service.record(&post).dislike_count().await.unwrap(), 1);
    assert_eq!(service.record(&comment).like_count().await.unwrap(), 1);
}

// ============================================================================
// Cascade
// ============================================================================

#[tokio::test]
async fn test_owner_deletion_cascades_by_default() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let post = Post::unique();
    let record = service.record(&post);

    record.like(actor(1)).await.unwrap();
    record.like(actor(2)).await.unwrap();
    record.dislike(actor(3)).await.unwrap();

    assert_eq!(record.deleted().await.unwrap(), 3);
    assert_eq!(record.like_count().await.unwrap(), 0);
    assert_eq!(record.dislike_count().await.unwrap(), 0);
    assert!(record.likes(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_owner_deletion_keeps_opted_out_types() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let record = service.record(&Comment::unique());

    record.like(actor(1)).await.unwrap();
    assert_eq!(record.deleted().await.unwrap(), 0);
    assert_eq!(record.like_count().await.unwrap(), 1);
    assert!(record.liked(actor(1)).await.unwrap());
}

#[tokio::test]
async fn test_unregistered_type_keeps_its_declared_opt_out() {
    let ctx = memory_context_with(OwnerRegistry::new().register_likeable::<Post>());
    let service = LikeableService::new(&ctx);
    let comment = Comment::unique();
    let record = service.record(&comment);

    assert!(!ctx.registry().is_registered(Comment::OWNER_TYPE));
    record.like(actor(1)).await.unwrap();

    assert_eq!(record.deleted().await.unwrap(), 0);
    assert_eq!(service.on_record_deleted(&comment).await.unwrap(), 0);
    assert_eq!(record.like_count().await.unwrap(), 1);
    assert!(record.liked(actor(1)).await.unwrap());
}

#[tokio::test]
async fn test_cascade_disabled_globally() {
    let config = CascadeConfig {
        enabled: false,
        ..CascadeConfig::default()
    };
    let ctx = memory_context_with(OwnerRegistry::from_config(&config).unwrap());
    let service = LikeableService::new(&ctx);
    let record = service.record(&Post::unique());

    record.like(actor(1)).await.unwrap();
    assert_eq!(record.deleted().await.unwrap(), 0);
    assert_eq!(record.like_count().await.unwrap(), 1);

    // explicit removal still works
    assert_eq!(
        service
            .remove_all(record.owner(), &ReactionType::like())
            .await
            .unwrap(),
        1
    );
    assert_eq!(record.like_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cascade_types_are_configurable() {
    let registry = test_registry().with_cascade_types(vec![ReactionType::like()]);
    let ctx = memory_context_with(registry);
    let service = LikeableService::new(&ctx);
    let record = service.record(&Post::unique());

    record.like(actor(1)).await.unwrap();
    record.dislike(actor(1)).await.unwrap();

    assert_eq!(record.deleted().await.unwrap(), 1);
    assert_eq!(record.like_count().await.unwrap(), 0);
    assert_eq!(record.dislike_count().await.unwrap(), 1);
}

// ============================================================================
// Actor resolution & scopes
// ============================================================================

#[tokio::test]
async fn test_scoped_actor_is_used_when_none_passed() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let record = service.record(&Post::unique());

    assert_eq!(record.like(None).await.unwrap(), ReactionOutcome::Skipped);
    assert_eq!(record.like_count().await.unwrap(), 0);

    let outcome = with_actor(ActorId::new(77), record.like(None)).await.unwrap();
    assert_eq!(outcome, ReactionOutcome::Applied);
    assert!(record.liked(actor(77)).await.unwrap());
    assert!(with_actor(ActorId::new(77), record.liked(None)).await.unwrap());
}

#[tokio::test]
async fn test_liked_by_queries() {
    let ctx = memory_context();
    let service = LikeableService::new(&ctx);
    let posts: Vec<Post> = (0..5).map(|_| Post::unique()).collect();
    let like = ReactionType::like();

    for post in posts.iter().step_by(2) {
        service.record(post).like(actor(5)).await.unwrap();
    }
    service.record(&posts[1]).like(actor(6)).await.unwrap();

    let liked = service
        .filter_records_liked_by(&posts, actor(5), &like)
        .await
        .unwrap();
    assert_eq!(liked, vec![&posts[0], &posts[2], &posts[4]]);

    let ids = service
        .owner_ids_liked_by(Post::OWNER_TYPE, actor(5), &like)
        .await
        .unwrap();
    let expected: Vec<i64> = posts.iter().step_by(2).map(|p| p.id).collect();
    assert_eq!(ids, expected);

    assert!(service
        .filter_records_liked_by(&posts, None, &like)
        .await
        .unwrap()
        .is_empty());
}
