//! Reaction flow tests
//!
//! Add, change and remove reactions end to end against the in-memory board.
//!
//! Run with: cargo test -p integration-tests --test reaction_tests

use integration_tests::fixtures::*;
use integration_tests::{error_code, Board};
use reactions_cache::SubscriberBuilder;
use reactions_common::{ReactionsConfig, Zones};
use reactions_core::entities::{PostVisibility, ReactionWrite};
use reactions_core::traits::LedgerRepository;
use reactions_core::{Id, Permissions};
use reactions_service::dto::KindInput;
use reactions_service::{CatalogAdmin, IndexService, ReactionService, ScoreService};

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_add_change_remove_keeps_score_in_step() {
    let board = Board::new();

    let req = board.request(ALICE);
    let outcome = ReactionService::new(&req).add(REPLY, ALICE, LIKE).await.unwrap();
    assert_eq!(outcome.delta, 1);
    assert_eq!(outcome.mine, Some(LIKE));
    assert_eq!(board.store.post_score(REPLY), 1);

    let req = board.request(BOB);
    let outcome = ReactionService::new(&req).add(REPLY, BOB, ANGRY).await.unwrap();
    assert_eq!(outcome.delta, -1);
    assert_eq!(board.store.post_score(REPLY), 0);

    let req = board.request(ALICE);
    let outcome = ReactionService::new(&req).add(REPLY, ALICE, ANGRY).await.unwrap();
    assert_eq!(outcome.delta, -2);
    assert_eq!(board.store.post_score(REPLY), -2);

    let req = board.request(BOB);
    let outcome = ReactionService::new(&req).remove(REPLY, BOB).await.unwrap();
    assert_eq!(outcome.delta, 1);
    assert_eq!(outcome.mine, None);
    assert_eq!(board.store.post_score(REPLY), -1);

    let remaining = board.store.reactions_on(REPLY);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, ALICE);
    assert_eq!(remaining[0].kind_id, ANGRY);

    assert_eq!(board.store.user_score(AUTHOR), Some(-1));
    board.assert_ledger();
}

#[tokio::test]
async fn test_disabling_kind_hides_reactions_but_keeps_score() {
    let board = Board::new();

    for (user, kind) in [(ALICE, LIKE), (BOB, ANGRY), (ALICE, ANGRY)] {
        let req = board.request(user);
        ReactionService::new(&req).add(REPLY, user, kind).await.unwrap();
    }
    let req = board.request(BOB);
    ReactionService::new(&req).remove(REPLY, BOB).await.unwrap();

    let mut input = KindInput::new("REACTION_ANGRY", -1);
    input.enabled = false;
    CatalogAdmin::new(&board.services)
        .update_kind(ANGRY, input)
        .await
        .unwrap();

    let req = board.request(CAROL);
    let reactions = IndexService::new(&req).get_one(REPLY).await.unwrap();
    assert_eq!(reactions.total, 0);
    assert!(reactions.by_kind.is_empty());
    assert_eq!(board.store.post_score(REPLY), -1);

    // The stored reaction is still there and still counts
    assert_eq!(board.store.reactions_on(REPLY).len(), 1);
    board.assert_ledger();
}

// ============================================================================
// Ledger Rules
// ============================================================================

#[tokio::test]
async fn test_one_reaction_per_user_and_post() {
    let board = Board::new();
    let req = board.request(ALICE);
    let reactions = ReactionService::new(&req);

    reactions.add(REPLY, ALICE, LIKE).await.unwrap();
    assert_eq!(
        error_code(reactions.add(REPLY, ALICE, LIKE).await),
        "DUPLICATE_REACTION"
    );

    reactions.add(REPLY, ALICE, LOVE).await.unwrap();
    reactions.add(REPLY, ALICE, SAD).await.unwrap();

    let events = board.store.reactions_on(REPLY);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind_id, SAD);
    assert_eq!(board.store.post_score(REPLY), 0);
    board.assert_ledger();
}

#[tokio::test]
async fn test_writes_from_a_stale_kind_are_rejected() {
    let board = Board::new();
    let req = board.request(ALICE);
    ReactionService::new(&req).add(REPLY, ALICE, LIKE).await.unwrap();

    // Two writers both read LIKE; the first one lands
    let post = board.store.post_context(REPLY).await.unwrap().unwrap();
    let mut angry = board.store.reactions_on(REPLY).remove(0);
    angry.kind_id = ANGRY;

    let scores = ScoreService::new(&req);
    let replace = ReactionWrite::Replace {
        event: angry,
        from: LIKE,
    };
    assert_eq!(scores.apply(&replace, &post).await.unwrap(), -2);

    let stale_delete = ReactionWrite::Delete {
        post_id: REPLY,
        user_id: ALICE,
        from: LIKE,
    };
    assert_eq!(
        error_code(scores.apply(&stale_delete, &post).await),
        "REACTION_CONFLICT"
    );
    assert_eq!(error_code(scores.apply(&replace, &post).await), "REACTION_CONFLICT");

    assert_eq!(board.store.post_score(REPLY), -1);
    assert_eq!(board.store.user_score(AUTHOR), Some(-1));
    let remaining = board.store.reactions_on(REPLY);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].kind_id, ANGRY);
    board.assert_ledger();

    // Deleting from a reaction that is already gone conflicts as well
    let req = board.request(ALICE);
    ReactionService::new(&req).remove(REPLY, ALICE).await.unwrap();
    let gone = ReactionWrite::Delete {
        post_id: REPLY,
        user_id: ALICE,
        from: ANGRY,
    };
    let err = ScoreService::new(&req).apply(&gone, &post).await.unwrap_err();
    assert_eq!(err.error_code(), "REACTION_CONFLICT");
    assert_eq!(err.status_code(), 409);
    assert_eq!(board.store.post_score(REPLY), 0);
    board.assert_ledger();
}

#[tokio::test]
async fn test_resync_rebuilds_drifted_post_scores() {
    let board = Board::new();
    for (user, post, kind) in [(ALICE, FIRST_POST, LOVE), (BOB, REPLY, ANGRY)] {
        let req = board.request(user);
        ReactionService::new(&req).add(post, user, kind).await.unwrap();
    }
    board.store.set_post_score(FIRST_POST, 40);
    board.store.set_post_score(REPLY, 7);

    let req = board.request(MODERATOR);
    ScoreService::new(&req).resync(&[FIRST_POST, REPLY]).await.unwrap();

    assert_eq!(board.store.post_score(FIRST_POST), 1);
    assert_eq!(board.store.post_score(REPLY), -1);
    assert_eq!(board.store.topic_score(TOPIC), 1);
    assert_eq!(board.store.user_score(AUTHOR), None);
    board.assert_ledger();
}

#[tokio::test]
async fn test_first_post_score_mirrors_onto_topic() {
    let board = Board::new();

    let req = board.request(ALICE);
    ReactionService::new(&req).add(FIRST_POST, ALICE, LOVE).await.unwrap();
    let req = board.request(BOB);
    ReactionService::new(&req).add(FIRST_POST, BOB, MATTER).await.unwrap();
    assert_eq!(board.store.topic_score(TOPIC), 2);

    ReactionService::new(&req).add(REPLY, BOB, LIKE).await.unwrap();
    assert_eq!(board.store.topic_score(TOPIC), 2);

    ReactionService::new(&req).add(FIRST_POST, BOB, ANGRY).await.unwrap();
    assert_eq!(board.store.topic_score(TOPIC), 0);
    assert_eq!(board.store.post_score(FIRST_POST), 0);
    board.assert_ledger();
}

#[tokio::test]
async fn test_stale_poster_score_is_rebuilt() {
    let board = Board::new();

    let req = board.request(ALICE);
    ReactionService::new(&req).add(FIRST_POST, ALICE, LIKE).await.unwrap();
    board.store.set_user_score(AUTHOR, None);

    let req = board.request(BOB);
    ReactionService::new(&req).add(REPLY, BOB, LOVE).await.unwrap();

    assert_eq!(board.store.user_score(AUTHOR), Some(2));
    board.assert_ledger();
}

#[tokio::test]
async fn test_stale_poster_score_is_not_moved_blindly() {
    let board = Board::new();
    board.store.set_user_score(AUTHOR, None);

    // A zero-score kind leaves the post untouched but still rebuilds the poster
    let req = board.request(ALICE);
    ReactionService::new(&req).add(REPLY, ALICE, ENJOY).await.unwrap();
    assert_eq!(board.store.user_score(AUTHOR), Some(0));
    board.assert_ledger();
}

#[tokio::test]
async fn test_score_conservation_over_mixed_sequence() {
    let board = Board::with_config(ReactionsConfig {
        allow_myself: true,
        ..ReactionsConfig::default()
    });

    let users = [AUTHOR, ALICE, BOB, CAROL, MODERATOR];
    let posts = [FIRST_POST, REPLY, ALICE_REPLY];
    let kinds = [LIKE, LOVE, MATTER, ENJOY, SURPRISE, SAD, ANGRY];

    // Small linear congruential sequence; reproducible across runs
    let mut seed: u64 = 0x5eed;
    let mut next = |bound: usize| {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        ((seed >> 33) as usize) % bound
    };

    for step in 0..200 {
        let user = users[next(users.len())];
        let post = posts[next(posts.len())];
        let req = board.request(user);
        let reactions = ReactionService::new(&req);

        if next(4) == 0 {
            let _ = reactions.remove(post, user).await;
        } else {
            let _ = reactions.add(post, user, kinds[next(kinds.len())]).await;
        }

        let violations = board.store.ledger_violations();
        assert!(violations.is_empty(), "step {step}: {violations:#?}");
    }

    for post in posts {
        assert_eq!(board.observer.delta_sum(post), board.store.post_score(post));
    }
}

// ============================================================================
// Policy
// ============================================================================

#[tokio::test]
async fn test_self_reaction() {
    let board = Board::new();
    let req = board.request(AUTHOR);
    assert_eq!(
        error_code(ReactionService::new(&req).add(REPLY, AUTHOR, LIKE).await),
        "SELF_REACTION_NOT_ALLOWED"
    );

    let board = Board::with_config(ReactionsConfig {
        allow_myself: true,
        ..ReactionsConfig::default()
    });
    let req = board.request(AUTHOR);
    ReactionService::new(&req).add(REPLY, AUTHOR, LIKE).await.unwrap();

    // No notification about one's own reaction
    assert!(board.store.notifications().is_empty());
    board.assert_ledger();
}

#[tokio::test]
async fn test_change_not_allowed() {
    let board = Board::with_config(ReactionsConfig {
        allow_change: false,
        ..ReactionsConfig::default()
    });

    let req = board.request(ALICE);
    let reactions = ReactionService::new(&req);
    reactions.add(REPLY, ALICE, LIKE).await.unwrap();

    assert_eq!(
        error_code(reactions.add(REPLY, ALICE, LOVE).await),
        "CHANGE_NOT_ALLOWED"
    );
    assert_eq!(
        error_code(reactions.remove(REPLY, ALICE).await),
        "CHANGE_NOT_ALLOWED"
    );
    assert_eq!(board.store.reactions_on(REPLY)[0].kind_id, LIKE);

    // Moderators may still take it down
    let req = board.request(MODERATOR);
    ReactionService::new(&req).remove(REPLY, ALICE).await.unwrap();
    assert!(board.store.reactions_on(REPLY).is_empty());
    board.assert_ledger();
}

#[tokio::test]
async fn test_acting_for_another_user() {
    let board = Board::new();

    let req = board.request(BOB);
    assert_eq!(
        error_code(ReactionService::new(&req).add(REPLY, ALICE, LIKE).await),
        "MISSING_PERMISSIONS"
    );

    let req = board.request(MODERATOR);
    let outcome = ReactionService::new(&req).add(REPLY, ALICE, LIKE).await.unwrap();
    assert_eq!(outcome.mine, Some(LIKE));

    let stored = &board.store.reactions_on(REPLY)[0];
    assert_eq!(stored.user_id, ALICE);
    assert_eq!(stored.username, "Alice");
}

#[tokio::test]
async fn test_viewer_without_use_permission() {
    let board = Board::new();
    let req = board.request_as(board.viewer(ALICE, Permissions::VIEW));
    assert_eq!(
        error_code(ReactionService::new(&req).add(REPLY, ALICE, LIKE).await),
        "MISSING_PERMISSIONS"
    );
}

#[tokio::test]
async fn test_invalid_and_unknown_targets() {
    let board = Board::new();
    let req = board.request(ALICE);
    let reactions = ReactionService::new(&req);

    assert_eq!(error_code(reactions.add(Id::NONE, ALICE, LIKE).await), "INVALID_ID");
    assert_eq!(error_code(reactions.add(REPLY, ALICE, Id::NONE).await), "INVALID_ID");
    assert_eq!(
        error_code(reactions.add(Id::new(9999), ALICE, LIKE).await),
        "UNKNOWN_POST"
    );
    assert_eq!(
        error_code(reactions.add(REPLY, ALICE, Id::new(99)).await),
        "UNKNOWN_KIND"
    );
    assert_eq!(
        error_code(reactions.remove(REPLY, ALICE).await),
        "UNKNOWN_REACTION"
    );

    assert!(board.store.reactions().is_empty());
    assert!(board.store.notifications().is_empty());
    assert!(board.observer.events().is_empty());
}

#[tokio::test]
async fn test_disabled_kind_is_rejected() {
    let board = Board::new();
    board.store.set_kind_enabled(SAD, false);

    let req = board.request(ALICE);
    assert_eq!(
        error_code(ReactionService::new(&req).add(REPLY, ALICE, SAD).await),
        "UNKNOWN_KIND"
    );
}

#[tokio::test]
async fn test_posts_closed_to_reactions() {
    let board = Board::new();
    let req = board.request(ALICE);
    let reactions = ReactionService::new(&req);

    board.store.set_reported(REPLY, true);
    assert_eq!(error_code(reactions.add(REPLY, ALICE, LIKE).await), "POST_LOCKED");
    board.store.set_reported(REPLY, false);

    board.store.set_visibility(REPLY, PostVisibility::Unapproved);
    assert_eq!(error_code(reactions.add(REPLY, ALICE, LIKE).await), "POST_LOCKED");
    board.store.set_visibility(REPLY, PostVisibility::Approved);

    reactions.add(REPLY, ALICE, LIKE).await.unwrap();

    let board = Board::with_config(ReactionsConfig {
        forums: vec![OTHER_FORUM],
        ..ReactionsConfig::default()
    });
    let req = board.request(ALICE);
    assert_eq!(
        error_code(ReactionService::new(&req).add(REPLY, ALICE, LIKE).await),
        "POST_LOCKED"
    );
}

#[tokio::test]
async fn test_zones() {
    let board = Board::with_config(ReactionsConfig {
        zones: Zones::FirstPost,
        ..ReactionsConfig::default()
    });
    let req = board.request(ALICE);
    let reactions = ReactionService::new(&req);
    assert_eq!(error_code(reactions.add(REPLY, ALICE, LIKE).await), "POST_LOCKED");
    reactions.add(FIRST_POST, ALICE, LIKE).await.unwrap();

    let board = Board::with_config(ReactionsConfig {
        zones: Zones::Replies,
        ..ReactionsConfig::default()
    });
    let req = board.request(ALICE);
    let reactions = ReactionService::new(&req);
    assert_eq!(
        error_code(reactions.add(FIRST_POST, ALICE, LIKE).await),
        "POST_LOCKED"
    );
    reactions.add(REPLY, ALICE, LIKE).await.unwrap();
}

// ============================================================================
// Outcome and Events
// ============================================================================

#[tokio::test]
async fn test_outcome_summary_follows_view_permission() {
    let board = Board::new();

    let req = board.request(ALICE);
    let outcome = ReactionService::new(&req).add(REPLY, ALICE, LIKE).await.unwrap();
    let summary = outcome.summary.expect("viewer may see reactions");
    assert_eq!(summary.total, 1);
    assert!(summary.kinds[0].me);

    let req = board.request_as(board.viewer(BOB, Permissions::USE));
    let outcome = ReactionService::new(&req).add(REPLY, BOB, LOVE).await.unwrap();
    assert!(outcome.summary.is_none());
}

#[tokio::test]
async fn test_events_are_observed_and_published() {
    let board = Board::new();
    let req = board.request(ALICE);
    let reactions = ReactionService::new(&req);

    reactions.add(REPLY, ALICE, LIKE).await.unwrap();
    reactions.add(REPLY, ALICE, LOVE).await.unwrap();
    reactions.remove(REPLY, ALICE).await.unwrap();

    let expected = vec!["REACTION_ADDED", "REACTION_CHANGED", "REACTION_REMOVED"];
    assert_eq!(board.observer.event_types(), expected);
    assert_eq!(board.publisher.event_types(), expected);
}

#[tokio::test]
async fn test_publish_failure_does_not_fail_the_reaction() {
    let board = Board::new();
    board.publisher.break_down();

    let req = board.request(ALICE);
    ReactionService::new(&req).add(REPLY, ALICE, LIKE).await.unwrap();

    assert_eq!(board.store.post_score(REPLY), 1);
    assert_eq!(board.observer.event_types(), vec!["REACTION_ADDED"]);
    assert!(board.publisher.event_types().is_empty());
}

#[tokio::test]
async fn test_remote_events_are_followed() {
    let board = Board::new();
    let subscriber = SubscriberBuilder::new()
        .redis_url("redis://127.0.0.1:1")
        .reconnect_delay_ms(50)
        .build()
        .await
        .unwrap();

    let tasks = board
        .services
        .follow_remote(&subscriber, &[REPLY])
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);

    subscriber.shutdown().await.unwrap();
    tasks.iter().for_each(|task| task.abort());
}
