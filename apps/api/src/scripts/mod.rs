// Saved scripts: Postgres persistence, the per-user recent list, markdown export.

pub mod export;
pub mod handlers;
pub mod recent;
pub mod store;
