//! The job lifecycle engine.
//!
//! - `store`: the job map and its lock, the single source of truth.
//! - `service`: validation and status-gated mutations on top of the store.
//! - `processor`: the background loop that drains `Created` jobs.
//! - `cleanup`: the background loop that drops expired terminal jobs.
//! - `shutdown`: the stop flag both loops observe.

pub mod cleanup;
pub mod error;
pub mod processor;
pub mod service;
pub mod shutdown;
pub mod store;
