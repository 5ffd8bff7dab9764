//! Source parsing, validation, and the batch import engine for the
//! calabash recipe catalog.
//!
//! The server and CLI crates provide persistence; everything here works
//! against the [`CatalogStore`] trait so the import pipeline can be
//! exercised without a database.

pub mod batch;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod json;
pub mod normalize;
pub mod pdf;
pub mod record;
pub mod scrape;
pub mod slug;
pub mod store;

pub use batch::{BatchReport, Candidate, Failure};
pub use error::ImportError;
pub use record::RecipeDraft;
pub use store::{CatalogStore, EntityRef, StoreError, UpsertOutcome};
