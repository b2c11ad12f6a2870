//! Reaction index, summary and listing tests
//!
//! Run with: cargo test -p integration-tests --test index_tests

use chrono::Duration;

use integration_tests::fixtures::*;
use integration_tests::{error_code, Board};
use reactions_common::ReactionsConfig;
use reactions_core::{Id, ListOrder, Permissions, SummaryLabel};
use reactions_service::dto::KindInput;
use reactions_service::{CatalogAdmin, IndexService, ReactionService};

/// Alice and bob like the reply, Carol loves it, a minute apart
async fn seed_reply(board: &Board) {
    for (user, kind) in [(ALICE, LIKE), (BOB, LIKE), (CAROL, LOVE)] {
        let req = board.request(user);
        ReactionService::new(&req).add(REPLY, user, kind).await.unwrap();
        board.advance(Duration::minutes(1));
    }
}

#[tokio::test]
async fn test_index_in_input_order() {
    let board = Board::new();
    seed_reply(&board).await;

    let req = board.request(ALICE);
    let index = IndexService::new(&req)
        .get(&[FIRST_POST, REPLY])
        .await
        .unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index[0].post_id, FIRST_POST);
    assert!(index[0].is_empty());

    let reply = &index[1];
    assert_eq!(reply.total, 3);
    assert_eq!(reply.mine, Some(LIKE));
    assert_eq!(reply.by_kind.len(), 2);
    assert_eq!(reply.by_kind[0].kind_id, LIKE);
    let likes: Vec<Id> = reply.by_kind[0].reactors.iter().map(|r| r.user_id).collect();
    assert_eq!(likes, vec![ALICE, BOB]);
    assert_eq!(reply.by_kind[1].kind_id, LOVE);
}

#[tokio::test]
async fn test_summary_names_viewer_first() {
    let board = Board::new();
    seed_reply(&board).await;

    let req = board.request(CAROL);
    let index = IndexService::new(&req);
    let reactions = index.get_one(REPLY).await.unwrap();
    let summary = index.summary(&reactions).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(
        summary.label,
        SummaryLabel::Count {
            names: vec!["Carol".to_string(), "Alice".to_string()],
            others: 1,
        }
    );
    assert_eq!(summary.label.to_string(), "Carol, Alice and another user");
    assert!(summary.kinds.iter().any(|k| k.kind_id == LOVE && k.me));
}

#[tokio::test]
async fn test_summary_in_anonymous_mode() {
    let board = Board::with_config(ReactionsConfig {
        anonymous: true,
        ..ReactionsConfig::default()
    });
    seed_reply(&board).await;

    let req = board.request(BOB);
    let index = IndexService::new(&req);
    let summary = index.summary(&index.get_one(REPLY).await.unwrap()).await.unwrap();
    assert_eq!(summary.label, SummaryLabel::Anonymous { count: 3 });
    assert_eq!(summary.label.to_string(), "3 users have reacted");

    let req = board.request(MODERATOR);
    let index = IndexService::new(&req);
    let summary = index.summary(&index.get_one(REPLY).await.unwrap()).await.unwrap();
    assert!(matches!(summary.label, SummaryLabel::Count { .. }));
}

#[tokio::test]
async fn test_listing_tabs_and_delete_rights() {
    let board = Board::new();
    seed_reply(&board).await;

    let req = board.request(ALICE);
    let listing = IndexService::new(&req).listing(REPLY, None).await.unwrap();

    assert!(listing.show_names);
    let tabs: Vec<(Option<Id>, usize)> = listing.tabs.iter().map(|t| (t.kind_id, t.count())).collect();
    assert_eq!(tabs, vec![(None, 3), (Some(LIKE), 2), (Some(LOVE), 1)]);
    assert!(listing.tabs[0].active);

    let all = &listing.tabs[0].rows;
    assert_eq!(all[0].user_id, ALICE);
    assert!(all[0].can_delete);
    assert!(all[1..].iter().all(|row| !row.can_delete));

    let req = board.request(MODERATOR);
    let listing = IndexService::new(&req).listing(REPLY, Some(LOVE)).await.unwrap();
    assert!(listing.tabs[0].rows.iter().all(|row| row.can_delete));
    assert!(listing.tabs[2].active);
    assert!(!listing.tabs[0].active);
}

#[tokio::test]
async fn test_listing_without_change_rights() {
    let board = Board::with_config(ReactionsConfig {
        allow_change: false,
        ..ReactionsConfig::default()
    });
    seed_reply(&board).await;

    let req = board.request(ALICE);
    let listing = IndexService::new(&req).listing(REPLY, None).await.unwrap();
    assert!(listing.tabs[0].rows.iter().all(|row| !row.can_delete));
}

#[tokio::test]
async fn test_listing_by_username() {
    let board = Board::with_config(ReactionsConfig {
        list_order: ListOrder::Username,
        ..ReactionsConfig::default()
    });
    for (user, kind) in [(CAROL, LIKE), (BOB, LIKE), (ALICE, LOVE)] {
        let req = board.request(user);
        ReactionService::new(&req).add(REPLY, user, kind).await.unwrap();
        board.advance(Duration::minutes(1));
    }

    let req = board.request(MODERATOR);
    let listing = IndexService::new(&req).listing(REPLY, None).await.unwrap();
    let names: Vec<&str> = listing.tabs[0].rows.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, vec!["Alice", "bob", "Carol"]);
}

#[tokio::test]
async fn test_listing_rejections() {
    let board = Board::new();

    let req = board.request_as(board.viewer(ALICE, Permissions::USE));
    assert_eq!(
        error_code(IndexService::new(&req).listing(REPLY, None).await),
        "MISSING_PERMISSIONS"
    );

    let req = board.request(ALICE);
    let index = IndexService::new(&req);
    assert_eq!(error_code(index.listing(Id::NONE, None).await), "INVALID_ID");
    assert_eq!(
        error_code(index.listing(Id::new(9999), None).await),
        "UNKNOWN_POST"
    );

    let empty = index.listing(FIRST_POST, None).await.unwrap();
    assert!(empty.tabs.is_empty());
}

#[tokio::test]
async fn test_disabled_kind_leaves_listing() {
    let board = Board::new();
    seed_reply(&board).await;

    let mut input = KindInput::new("REACTION_LOVE", 1);
    input.enabled = false;
    CatalogAdmin::new(&board.services).update_kind(LOVE, input).await.unwrap();

    let req = board.request(ALICE);
    let listing = IndexService::new(&req).listing(REPLY, None).await.unwrap();
    let tabs: Vec<Option<Id>> = listing.tabs.iter().map(|t| t.kind_id).collect();
    assert_eq!(tabs, vec![None, Some(LIKE)]);
    assert_eq!(listing.tabs[0].count(), 2);
}

#[tokio::test]
async fn test_reaction_count_by_user() {
    let board = Board::new();
    seed_reply(&board).await;
    let req = board.request(ALICE);
    ReactionService::new(&req).add(FIRST_POST, ALICE, LIKE).await.unwrap();

    let index = IndexService::new(&req);
    assert_eq!(index.reaction_count_by_user(ALICE).await.unwrap(), 2);
    assert_eq!(index.reaction_count_by_user(AUTHOR).await.unwrap(), 0);
}
