//! # reactions-cache
//!
//! Redis layer for the reaction catalog cache and reaction event pub/sub.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Catalog Cache**: The reaction kind list shared across requests
//! - **Pub/Sub**: Reaction events published per post, followed by other instances
//!
//! ## Example
//!
//! ```ignore
//! use reactions_cache::{Publisher, RedisCatalogCache, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let cache = RedisCatalogCache::new(pool.clone(), 3600);
//! let publisher = Publisher::new(pool);
//! ```

pub mod catalog;
pub mod pool;
pub mod pubsub;

pub use catalog::{RedisCatalogCache, CATALOG_KEY};

// Re-export pool types
pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, ReceivedMessage, Subscriber, SubscriberBuilder,
    SubscriberConfig, SubscriberError, SubscriberResult, CATALOG_CHANNEL, POST_CHANNEL_PREFIX,
};
