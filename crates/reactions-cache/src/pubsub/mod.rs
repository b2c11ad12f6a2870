//! Redis Pub/Sub module.
//!
//! Publishes reaction events per post and lets other processes follow them.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, CATALOG_CHANNEL, POST_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};
