//! Host hook tests
//!
//! Run with: cargo test -p integration-tests --test hooks_tests

use integration_tests::fixtures::*;
use integration_tests::{error_code, Board};
use reactions_common::{ReactionsConfig, Zones};
use reactions_core::{Id, Permissions};
use reactions_service::dto::{
    DeleteUsersRequest, PostingAuthRequest, PostingMode, TopicPost, TopicView, TopicViewRequest,
    UserDeleteMode, UsernameChangeRequest,
};
use reactions_service::{HooksService, IndexService, ReactionService};

async fn react(board: &Board, user: Id, post: Id, kind: Id) {
    let req = board.request(user);
    ReactionService::new(&req).add(post, user, kind).await.unwrap();
}

fn topic_page() -> TopicViewRequest {
    let post = |post_id, poster_id| TopicPost {
        post_id,
        poster_id,
        visibility: Default::default(),
        reported: false,
        has_attachments: false,
        has_inline_attachments: false,
    };

    let mut reply = post(REPLY, AUTHOR);
    reply.has_attachments = true;

    TopicViewRequest {
        forum_id: FORUM,
        topic_first_post_id: FIRST_POST,
        posts: vec![post(FIRST_POST, AUTHOR), reply, post(ALICE_REPLY, ALICE)],
    }
}

fn reply_check(mode: PostingMode) -> PostingAuthRequest {
    PostingAuthRequest {
        mode,
        forum_id: FORUM,
        topic_poster_id: AUTHOR,
        topic_first_post_id: FIRST_POST,
    }
}

// ============================================================================
// Topic View
// ============================================================================

#[tokio::test]
async fn test_topic_view_rows() {
    let board = Board::new();
    react(&board, ALICE, REPLY, LIKE).await;

    let req = board.request(ALICE);
    let view = HooksService::new(&req).topic_view(topic_page()).await.unwrap();

    assert_eq!(view.kinds.len(), 7);
    assert!(view.options.allow_change);
    assert!(!view.options.simple_list);
    assert_eq!(view.options.default_kind, None);

    let first = view.row(FIRST_POST).unwrap();
    assert!(first.can_use);
    assert!(!first.has_mine);
    assert!(first.summary.is_none());
    assert_eq!(first.poster_score, Some(1));

    let reply = view.row(REPLY).unwrap();
    assert_eq!(reply.mine, Some(LIKE));
    assert!(reply.has_mine);
    assert_eq!(reply.summary.as_ref().map(|s| s.total), Some(1));

    // Own post, reacting to oneself is off
    let own = view.row(ALICE_REPLY).unwrap();
    assert!(!own.can_use);
    assert_eq!(own.poster_score, Some(0));
}

#[tokio::test]
async fn test_topic_view_default_kind_and_profile_scores() {
    let board = Board::with_config(ReactionsConfig {
        default_kind: Some(LOVE),
        score_on_profile: false,
        anonymous: true,
        ..ReactionsConfig::default()
    });

    let req = board.request(BOB);
    let view = HooksService::new(&req).topic_view(topic_page()).await.unwrap();
    assert_eq!(view.options.default_kind, Some(LOVE));
    assert!(view.options.simple_list);
    assert!(view.rows.iter().all(|row| row.poster_score.is_none()));
}

#[tokio::test]
async fn test_topic_view_hides_attachments_until_reacted() {
    let board = Board::with_config(ReactionsConfig {
        force_attach: true,
        ..ReactionsConfig::default()
    });

    let req = board.request(BOB);
    let view = HooksService::new(&req).topic_view(topic_page()).await.unwrap();
    assert!(view.row(REPLY).unwrap().hide_attachments);
    assert!(!view.row(FIRST_POST).unwrap().hide_attachments);

    react(&board, BOB, REPLY, ENJOY).await;
    let req = board.request(BOB);
    let view = HooksService::new(&req).topic_view(topic_page()).await.unwrap();
    assert!(!view.row(REPLY).unwrap().hide_attachments);

    // The poster always sees their attachments
    let req = board.request(AUTHOR);
    let view = HooksService::new(&req).topic_view(topic_page()).await.unwrap();
    assert!(!view.row(REPLY).unwrap().hide_attachments);

    // Nothing to unlock for viewers who cannot react
    let req = board.request_as(board.viewer(CAROL, Permissions::VIEW));
    let view = HooksService::new(&req).topic_view(topic_page()).await.unwrap();
    let reply = view.row(REPLY).unwrap();
    assert!(!reply.can_use);
    assert!(!reply.hide_attachments);
}

#[tokio::test]
async fn test_topic_view_outside_enabled_forums() {
    let board = Board::with_config(ReactionsConfig {
        forums: vec![OTHER_FORUM],
        ..ReactionsConfig::default()
    });
    let req = board.request(ALICE);
    let view = HooksService::new(&req).topic_view(topic_page()).await.unwrap();
    assert_eq!(view, TopicView::disabled());
}

// ============================================================================
// Posting Authorization
// ============================================================================

#[tokio::test]
async fn test_force_reply_requires_first_post_reaction() {
    let board = Board::with_config(ReactionsConfig {
        force_reply: true,
        ..ReactionsConfig::default()
    });

    let req = board.request(BOB);
    let hooks = HooksService::new(&req);
    assert_eq!(
        error_code(hooks.posting_auth(reply_check(PostingMode::Reply)).await),
        "FIRST_POST_REACTION_REQUIRED"
    );
    hooks.posting_auth(reply_check(PostingMode::Quote)).await.unwrap();
    hooks.posting_auth(reply_check(PostingMode::Edit)).await.unwrap();

    react(&board, BOB, FIRST_POST, SURPRISE).await;
    hooks.posting_auth(reply_check(PostingMode::Reply)).await.unwrap();

    // The topic starter replies freely
    let req = board.request(AUTHOR);
    HooksService::new(&req)
        .posting_auth(reply_check(PostingMode::Reply))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_force_reply_off_when_only_replies_take_reactions() {
    let board = Board::with_config(ReactionsConfig {
        force_reply: true,
        zones: Zones::Replies,
        ..ReactionsConfig::default()
    });
    let req = board.request(BOB);
    HooksService::new(&req)
        .posting_auth(reply_check(PostingMode::Reply))
        .await
        .unwrap();
}

// ============================================================================
// Deletion Hooks
// ============================================================================

#[tokio::test]
async fn test_delete_users_rescores_their_posts() {
    let board = Board::new();
    react(&board, ALICE, FIRST_POST, LIKE).await;
    react(&board, ALICE, REPLY, LOVE).await;
    react(&board, BOB, FIRST_POST, ANGRY).await;
    react(&board, BOB, ALICE_REPLY, LIKE).await;

    let req = board.request(MODERATOR);
    let purged = HooksService::new(&req)
        .delete_users(DeleteUsersRequest {
            user_ids: vec![ALICE],
            mode: UserDeleteMode::Retain,
        })
        .await
        .unwrap();

    assert_eq!(purged.reactions_removed, 2);
    assert_eq!(purged.posts_rescored, 2);
    assert_eq!(board.store.post_score(FIRST_POST), -1);
    assert_eq!(board.store.post_score(REPLY), 0);
    assert_eq!(board.store.topic_score(TOPIC), -1);
    assert_eq!(board.store.user_score(AUTHOR), None);

    // Alice's posts stay, the notifications addressed to her go
    assert!(board
        .store
        .notifications()
        .iter()
        .all(|n| n.recipient_id != ALICE));
    assert!(board.observer.event_types().contains(&"REACTIONS_PURGED"));
    board.assert_ledger();

    let profile = HooksService::new(&req).profile_view(AUTHOR).await.unwrap();
    assert_eq!(profile.score, Some(-1));
}

#[tokio::test]
async fn test_delete_users_with_their_posts_keeps_notifications() {
    let board = Board::new();
    react(&board, BOB, ALICE_REPLY, LIKE).await;

    let req = board.request(MODERATOR);
    let purged = HooksService::new(&req)
        .delete_users(DeleteUsersRequest {
            user_ids: vec![ALICE],
            mode: UserDeleteMode::Remove,
        })
        .await
        .unwrap();

    assert_eq!(purged.reactions_removed, 0);
    assert_eq!(purged.posts_rescored, 0);
    assert_eq!(board.store.notifications().len(), 1);
}

#[tokio::test]
async fn test_delete_posts_drops_reactions_and_notifications() {
    let board = Board::new();
    react(&board, ALICE, REPLY, LIKE).await;
    react(&board, BOB, REPLY, LOVE).await;
    react(&board, ALICE, FIRST_POST, LIKE).await;

    let req = board.request(MODERATOR);
    let hooks = HooksService::new(&req);
    let purged = hooks.delete_posts(&[REPLY]).await.unwrap();

    assert_eq!(purged.reactions_removed, 2);
    assert_eq!(purged.notifications_removed, 1);
    assert_eq!(board.store.reactions().len(), 1);
    assert_eq!(board.store.user_score(AUTHOR), None);

    board.store.remove_posts(&[REPLY]);
    board.assert_ledger();

    let profile = hooks.profile_view(AUTHOR).await.unwrap();
    assert_eq!(profile.score, Some(1));
    assert_eq!(board.store.user_score(AUTHOR), Some(1));
}

#[tokio::test]
async fn test_failed_post_delete_leaves_everything() {
    let board = Board::new();
    react(&board, ALICE, REPLY, LIKE).await;
    react(&board, BOB, REPLY, LOVE).await;

    let req = board.request(MODERATOR);
    let hooks = HooksService::new(&req);

    board.store.fail_after(0);
    assert_eq!(error_code(hooks.delete_posts(&[REPLY]).await), "DATABASE_ERROR");
    board.store.heal();

    assert_eq!(board.store.reactions().len(), 2);
    assert_eq!(board.store.notifications().len(), 1);
    assert_eq!(board.store.user_score(AUTHOR), Some(2));
    board.assert_ledger();

    let purged = hooks.delete_posts(&[REPLY]).await.unwrap();
    assert_eq!(purged.reactions_removed, 2);
    assert_eq!(purged.notifications_removed, 1);
    assert!(board.store.reactions().is_empty());
    assert_eq!(board.store.user_score(AUTHOR), None);
}

// ============================================================================
// Profile and Names
// ============================================================================

#[tokio::test]
async fn test_profile_view() {
    let board = Board::new();
    react(&board, ALICE, FIRST_POST, LIKE).await;
    react(&board, ALICE, REPLY, MATTER).await;

    let req = board.request(BOB);
    let hooks = HooksService::new(&req);

    let alice = hooks.profile_view(ALICE).await.unwrap();
    assert_eq!(alice.total_reactions, 2);
    assert_eq!(alice.score, Some(0));

    let author = hooks.profile_view(AUTHOR).await.unwrap();
    assert_eq!(author.total_reactions, 0);
    assert_eq!(author.score, Some(2));

    let board = Board::with_config(ReactionsConfig {
        score_on_profile: false,
        ..ReactionsConfig::default()
    });
    let req = board.request(BOB);
    let profile = HooksService::new(&req).profile_view(AUTHOR).await.unwrap();
    assert_eq!(profile.score, None);
}

#[tokio::test]
async fn test_username_change() {
    let board = Board::new();
    react(&board, ALICE, FIRST_POST, LIKE).await;
    react(&board, ALICE, REPLY, LIKE).await;

    let req = board.request(MODERATOR);
    let hooks = HooksService::new(&req);
    let renamed = hooks
        .username_change(UsernameChangeRequest {
            old_name: "Alice".to_string(),
            new_name: "Alicia".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(renamed, 2);

    let reactions = IndexService::new(&req).get_one(REPLY).await.unwrap();
    assert_eq!(reactions.by_kind[0].reactors[0].username, "Alicia");

    assert_eq!(
        error_code(
            hooks
                .username_change(UsernameChangeRequest {
                    old_name: "Alicia".to_string(),
                    new_name: String::new(),
                })
                .await
        ),
        "VALIDATION_ERROR"
    );
}
