//! Notification coalescing tests
//!
//! Run with: cargo test -p integration-tests --test notification_tests

use chrono::{DateTime, Duration};

use integration_tests::fixtures::*;
use integration_tests::Board;
use reactions_common::ReactionsConfig;
use reactions_core::{Id, NotificationKind};
use reactions_service::{NotificationService, ReactionService};

async fn react(board: &Board, user: Id, post: Id, kind: Id) {
    let req = board.request(user);
    ReactionService::new(&req).add(post, user, kind).await.unwrap();
}

async fn withdraw(board: &Board, user: Id, post: Id) {
    let req = board.request(user);
    ReactionService::new(&req).remove(post, user).await.unwrap();
}

#[tokio::test]
async fn test_same_day_reactions_share_one_record() {
    let board = Board::new();

    react(&board, ALICE, REPLY, LIKE).await;
    board.advance(Duration::minutes(5));
    react(&board, BOB, REPLY, LOVE).await;

    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_ids, vec![ALICE, BOB]);
    assert_eq!(records[0].recipient_id, AUTHOR);
    assert_eq!(records[0].key.item_id, REPLY);
    assert_eq!(records[0].key.item_parent_id, TOPIC);
    assert_eq!(records[0].created_at, board.now());

    let title = NotificationService::new(&board.services)
        .title(&NotificationKind::REACTION_POST, &records[0])
        .await
        .unwrap();
    assert_eq!(
        title.to_string(),
        "bob and Alice have reacted to a message you posted"
    );

    withdraw(&board, ALICE, REPLY).await;
    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_ids, vec![BOB]);

    withdraw(&board, BOB, REPLY).await;
    assert!(board.store.notifications().is_empty());
}

#[tokio::test]
async fn test_day_boundary_opens_a_new_record() {
    let board = Board::new();

    react(&board, ALICE, REPLY, LIKE).await;
    react(&board, BOB, REPLY, LIKE).await;
    board.advance(Duration::days(1));
    react(&board, CAROL, REPLY, LIKE).await;

    let records = board.store.notifications();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_ids, vec![ALICE, BOB]);
    assert_eq!(records[1].user_ids, vec![CAROL]);

    // Only the latest record is looked at on removal
    withdraw(&board, ALICE, REPLY).await;
    let records = board.store.notifications();
    assert_eq!(records[0].user_ids, vec![ALICE, BOB]);
    assert_eq!(records[1].user_ids, vec![CAROL]);

    withdraw(&board, CAROL, REPLY).await;
    withdraw(&board, BOB, REPLY).await;
    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_ids, vec![ALICE]);
}

#[tokio::test]
async fn test_day_bucket_follows_board_timezone() {
    let late_evening = DateTime::parse_from_rfc3339("2025-07-01T21:30:00Z")
        .unwrap()
        .to_utc();

    // UTC board: 21:30 and 22:30 fall on the same day
    let board = Board::new();
    board.clock.set(late_evening);
    react(&board, ALICE, REPLY, LIKE).await;
    board.advance(Duration::hours(1));
    react(&board, BOB, REPLY, LIKE).await;
    assert_eq!(board.store.notifications().len(), 1);

    // UTC+2 board: 23:30 then 00:30 the next day
    let board = Board::with_config(ReactionsConfig {
        utc_offset_minutes: 120,
        ..ReactionsConfig::default()
    });
    board.clock.set(late_evening);
    react(&board, ALICE, REPLY, LIKE).await;
    board.advance(Duration::hours(1));
    react(&board, BOB, REPLY, LIKE).await;
    assert_eq!(board.store.notifications().len(), 2);
}

#[tokio::test]
async fn test_repeat_contributor_is_not_duplicated() {
    let board = Board::new();
    let notifications = NotificationService::new(&board.services);
    let kind = NotificationKind::REACTION_POST;

    let first = notifications
        .add(&kind, REPLY, TOPIC, ALICE, AUTHOR, "first")
        .await
        .unwrap();
    board.advance(Duration::minutes(1));
    let second = notifications
        .add(&kind, REPLY, TOPIC, ALICE, AUTHOR, "second")
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_ids, vec![ALICE]);
    assert_eq!(records[0].resume, "second");
    assert_eq!(records[0].created_at, board.now());
}

#[tokio::test]
async fn test_repeat_contributor_keeps_read_flag() {
    let board = Board::new();
    let notifications = NotificationService::new(&board.services);
    let kind = NotificationKind::REACTION_POST;

    let first = notifications
        .add(&kind, REPLY, TOPIC, ALICE, AUTHOR, "first")
        .await
        .unwrap();
    board.store.mark_read(first.id);
    board.advance(Duration::minutes(5));
    notifications
        .add(&kind, REPLY, TOPIC, ALICE, AUTHOR, "edited")
        .await
        .unwrap();

    let record = &board.store.notifications()[0];
    assert!(record.read);
    assert_eq!(record.created_at, board.now());
    assert_eq!(record.resume, "edited");

    // A new contributor brings it back as unread
    notifications
        .add(&kind, REPLY, TOPIC, BOB, AUTHOR, "edited")
        .await
        .unwrap();
    let record = &board.store.notifications()[0];
    assert!(!record.read);
    assert_eq!(record.user_ids, vec![ALICE, BOB]);
}

#[tokio::test]
async fn test_new_contributor_refreshes_record() {
    let board = Board::new();

    react(&board, ALICE, FIRST_POST, LIKE).await;
    board.advance(Duration::hours(2));
    react(&board, BOB, FIRST_POST, LIKE).await;

    let record = &board.store.notifications()[0];
    assert_eq!(record.created_at, board.now());
    assert!(!record.read);
    assert_eq!(record.resume, FIRST_POST_TEXT);
}

#[tokio::test]
async fn test_rejoining_contributor_goes_last() {
    let board = Board::new();

    react(&board, ALICE, REPLY, LIKE).await;
    react(&board, BOB, REPLY, LIKE).await;
    withdraw(&board, ALICE, REPLY).await;
    react(&board, ALICE, REPLY, LOVE).await;

    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_ids, vec![BOB, ALICE]);
}

#[tokio::test]
async fn test_changing_kind_does_not_notify_again() {
    let board = Board::new();

    react(&board, ALICE, REPLY, LIKE).await;
    react(&board, ALICE, REPLY, LOVE).await;
    react(&board, ALICE, REPLY, ANGRY).await;

    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_ids, vec![ALICE]);
}

#[tokio::test]
async fn test_removing_absent_contributor_is_a_no_op() {
    let board = Board::new();
    react(&board, ALICE, REPLY, LIKE).await;
    let before = board.store.notifications();

    let notifications = NotificationService::new(&board.services);
    let kind = NotificationKind::REACTION_POST;
    notifications.remove(&kind, REPLY, TOPIC, CAROL).await.unwrap();
    notifications.remove(&kind, FIRST_POST, TOPIC, ALICE).await.unwrap();

    assert_eq!(board.store.notifications(), before);
}

#[tokio::test]
async fn test_title_of_vanished_contributor() {
    let board = Board::new();
    let notifications = NotificationService::new(&board.services);
    let kind = NotificationKind::REACTION_POST;

    notifications
        .add(&kind, REPLY, TOPIC, Id::new(77), AUTHOR, "")
        .await
        .unwrap();
    let record = notifications
        .add(&kind, REPLY, TOPIC, CAROL, AUTHOR, "")
        .await
        .unwrap();

    let title = notifications.title(&kind, &record).await.unwrap();
    assert_eq!(title.names, vec!["Carol", "Anonymous"]);
}

#[tokio::test]
async fn test_long_post_text_is_shortened() {
    let board = Board::new();
    let long_text = "word ".repeat(100);
    board.store.add_post(Id::new(1003), TOPIC, AUTHOR, &long_text);

    react(&board, ALICE, Id::new(1003), LIKE).await;

    let record = &board.store.notifications()[0];
    assert!(record.resume.ends_with("..."));
    assert!(record.resume.chars().count() < long_text.len());
}

#[tokio::test]
async fn test_delete_for_recipients() {
    let board = Board::new();
    react(&board, BOB, REPLY, LIKE).await;
    react(&board, BOB, ALICE_REPLY, LIKE).await;

    let removed = NotificationService::new(&board.services)
        .delete_for_recipients(&NotificationKind::REACTION_POST, &[ALICE])
        .await
        .unwrap();

    assert_eq!(removed, 1);
    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].recipient_id, AUTHOR);
}

#[tokio::test]
async fn test_delete_for_items() {
    let board = Board::new();
    react(&board, BOB, REPLY, LIKE).await;
    react(&board, CAROL, REPLY, LOVE).await;
    react(&board, BOB, ALICE_REPLY, LIKE).await;

    let notifications = NotificationService::new(&board.services);
    let removed = notifications
        .delete_for_items(&NotificationKind::REACTION_POST, &[REPLY])
        .await
        .unwrap();

    assert_eq!(removed, 1);
    let records = board.store.notifications();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key.item_id, ALICE_REPLY);

    let removed = notifications
        .delete_for_items(&NotificationKind::REACTION_POST, &[])
        .await
        .unwrap();
    assert_eq!(removed, 0);
}
