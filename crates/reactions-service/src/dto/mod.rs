//! Data transfer objects for service inputs and outputs
//!
//! This module provides:
//! - Request DTOs with validation for admin and hook inputs
//! - Response DTOs handed back to the host

pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    DeleteUsersRequest, KindInput, PostingAuthRequest, PostingMode, ReorderKindsRequest,
    TopicPost, TopicViewRequest, UserDeleteMode, UsernameChangeRequest,
};

// Re-export commonly used response types
pub use responses::{
    PostsPurged, ProfileReactions, ReactionOutcome, SortOption, TopicRow, TopicView, UsersPurged,
    WidgetOptions,
};
