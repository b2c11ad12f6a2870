//! Domain events

mod domain_event;

pub use domain_event::{
    CatalogChangedEvent, DomainEvent, ReactionAddedEvent, ReactionChangedEvent,
    ReactionRemovedEvent, ReactionsPurgedEvent,
};
