//! Feedback storage for the Whisker inference backend.
//!
//! Every prediction attempt, successful or not, becomes one row in the
//! `prediction_feedback` table. This crate owns that table: its Diesel schema,
//! the embedded migrations and two [`FeedbackStore`](whisker_interface::FeedbackStore)
//! implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use whisker_database::{PostgresFeedbackStore, create_pool};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("postgres://localhost/whisker", 10);
//! let store = PostgresFeedbackStore::new(pool);
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod feedback_repository;
mod memory;
mod models;

pub mod schema;

pub use connection::{PgPool, create_pool, establish_connection, run_migrations};
pub use feedback_repository::PostgresFeedbackStore;
pub use memory::InMemoryFeedbackStore;
pub use models::{FeedbackChangeset, FeedbackRow, NewFeedbackRow};

use whisker_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
