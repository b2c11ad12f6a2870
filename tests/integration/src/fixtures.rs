//! Test fixtures
//!
//! A small board: the stock reaction kinds, a handful of members and one
//! topic with a first post and two replies.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use reactions_common::ReactionsConfig;
use reactions_core::{Clock, Id, Permissions, TestClock};
use reactions_service::{RequestContext, ServiceContext, ServiceContextBuilder, Viewer};

use crate::memory::{EventRecorder, MemoryCatalogCache, MemoryStore, RecordingPublisher};

pub const FORUM: Id = Id::new(1);
pub const OTHER_FORUM: Id = Id::new(2);
pub const TOPIC: Id = Id::new(100);
pub const FIRST_POST: Id = Id::new(1000);
pub const REPLY: Id = Id::new(1001);
/// Reply written by Alice
pub const ALICE_REPLY: Id = Id::new(1002);

pub const AUTHOR: Id = Id::new(2);
pub const ALICE: Id = Id::new(3);
pub const BOB: Id = Id::new(4);
pub const CAROL: Id = Id::new(5);
pub const MODERATOR: Id = Id::new(9);

pub const LIKE: Id = Id::new(1);
pub const LOVE: Id = Id::new(2);
pub const MATTER: Id = Id::new(3);
pub const ENJOY: Id = Id::new(4);
pub const SURPRISE: Id = Id::new(5);
pub const SAD: Id = Id::new(6);
pub const ANGRY: Id = Id::new(7);

pub const FIRST_POST_TEXT: &str = "Welcome to the board! Please introduce yourself in this topic.";

/// Start of the test clock: mid-morning, well inside one day bucket
pub fn start_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-07-01T10:00:00Z")
        .map(|t| t.to_utc())
        .unwrap_or_default()
}

/// In-memory board with its service context
pub struct Board {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCatalogCache>,
    pub publisher: Arc<RecordingPublisher>,
    pub observer: Arc<EventRecorder>,
    pub clock: Arc<TestClock>,
    pub services: ServiceContext,
}

impl Board {
    pub fn new() -> Self {
        Self::with_config(ReactionsConfig::default())
    }

    pub fn with_config(config: ReactionsConfig) -> Self {
        let store = Arc::new(seeded_store());
        let cache = Arc::new(MemoryCatalogCache::new());
        let publisher = Arc::new(RecordingPublisher::new());
        let observer = Arc::new(EventRecorder::new());
        let clock = Arc::new(TestClock::new(start_time()));

        let services = ServiceContextBuilder::new()
            .kind_repo(store.clone())
            .reaction_repo(store.clone())
            .ledger_repo(store.clone())
            .user_repo(store.clone())
            .notification_repo(store.clone())
            .catalog_cache(cache.clone())
            .publisher(publisher.clone())
            .observer(observer.clone())
            .clock(clock.clone())
            .config(config)
            .build()
            .expect("all ports are set");

        Self {
            store,
            cache,
            publisher,
            observer,
            clock,
            services,
        }
    }

    /// A registered member with the default grant
    pub fn member(&self, user_id: Id) -> Viewer {
        let permissions = if user_id == MODERATOR {
            Permissions::DEFAULT | Permissions::MODERATE
        } else {
            Permissions::DEFAULT
        };
        self.viewer(user_id, permissions)
    }

    pub fn viewer(&self, user_id: Id, permissions: Permissions) -> Viewer {
        Viewer::new(user_id, username(user_id), permissions)
    }

    /// A fresh request on behalf of a member
    pub fn request(&self, user_id: Id) -> RequestContext<'_> {
        RequestContext::new(&self.services, self.member(user_id))
    }

    pub fn request_as(&self, viewer: Viewer) -> RequestContext<'_> {
        RequestContext::new(&self.services, viewer)
    }

    pub fn advance(&self, duration: Duration) {
        self.clock.advance(duration);
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc_now()
    }

    /// Fail the test on any broken ledger rule
    pub fn assert_ledger(&self) {
        let violations = self.store.ledger_violations();
        assert!(violations.is_empty(), "ledger violations: {violations:#?}");
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

pub fn username(user_id: Id) -> &'static str {
    match user_id.into_inner() {
        2 => "Author",
        3 => "Alice",
        4 => "bob",
        5 => "Carol",
        9 => "Moderator",
        _ => "Guest",
    }
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    for (title, score) in [
        ("REACTION_LIKE", 1),
        ("REACTION_LOVE", 1),
        ("REACTION_MATTER", 1),
        ("REACTION_ENJOY", 0),
        ("REACTION_SURPRISE", 0),
        ("REACTION_SAD", 0),
        ("REACTION_ANGRY", -1),
    ] {
        store.add_kind(title, score);
    }

    for user_id in [AUTHOR, ALICE, BOB, CAROL, MODERATOR] {
        store.add_user(user_id, username(user_id), Some(0));
    }

    store.add_topic(TOPIC, FORUM, FIRST_POST);
    store.add_post(FIRST_POST, TOPIC, AUTHOR, FIRST_POST_TEXT);
    store.add_post(REPLY, TOPIC, AUTHOR, "Thanks everyone for joining.");
    store.add_post(ALICE_REPLY, TOPIC, ALICE, "Hi, I am Alice.");

    store
}
