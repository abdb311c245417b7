//! dif-graph: Knowledge graph access through the query collaborator and the query builder.

pub mod mock;
pub mod query;
pub mod rest;
pub mod store;

pub use mock::MockGraphStore;
pub use rest::RestGraphStore;
pub use store::{first_count, GraphStore};
