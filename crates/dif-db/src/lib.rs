//! DIF cache layer.
//!
//! Durable storage for everything a run pulls from the graph store:
//! interactor and druggable rows, drug patents, products and clinical trials,
//! and per-gene edge counts. Reads are filtered by natural identifiers; writes
//! only ever append.
//!
//! # Example
//!
//! ```rust,no_run
//! use dif_db::{CacheRepository, SqliteCache};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteCache::open("./cache/dif.db")?;
//! let cache = CacheRepository::new(Arc::new(store));
//! let rows = cache.interactors("MAPT", "protein").await?;
//! # Ok(())
//! # }
//! ```

pub mod bioassay;
pub mod error;
pub mod memory;
pub mod repository;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use bioassay::{BioassayCache, BioassayCounts};
pub use error::{DbError, Result};
pub use memory::MemoryCache;
pub use repository::{CacheRepository, EdgeCountRow, PatentRow, ProductRow, TrialRow};
pub use schema::{CacheTable, ColumnKind};
pub use sqlite::SqliteCache;
pub use store::CacheStore;
