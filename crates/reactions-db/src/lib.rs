//! # reactions-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `reactions-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reactions_db::pool::{create_pool, run_migrations, DatabaseConfig, MIGRATIONS_DIR};
//! use reactions_db::repositories::PgReactionRepository;
//! use reactions_core::traits::ReactionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool, MIGRATIONS_DIR).await?;
//!     let reactions = PgReactionRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{
    create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool, MIGRATIONS_DIR,
};
pub use repositories::{
    PgLedgerRepository, PgNotificationRepository, PgReactionKindRepository, PgReactionRepository,
    PgUserRepository,
};
