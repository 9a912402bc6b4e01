//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Expiry purge: Removes expired entries and orphaned deadlines at a fixed interval

mod purge;

pub use purge::spawn_purge_task;
