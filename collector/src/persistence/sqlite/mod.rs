//! SQLite-backed repository implementation.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode**: one writer and concurrent readers.
//! - **Embedded migrations**: `sqlx::migrate!` runs `migrations/001_initial_schema.sql`
//!   when [`Database::open`] is called.
//!
//! ## Layout
//!
//! One `games` row per record. Tallies are flattened into twenty
//! `{category}_{white|black}` columns; result and source are stored as
//! `TEXT` constrained by CHECKs and round-tripped through [`helpers`].

mod database;
mod game_repo;
#[cfg(test)]
mod integration_tests;
pub(crate) mod helpers;

pub use database::Database;
pub use game_repo::SqliteGameRepository;
