//! Stateful collection views used by the presentation layer.
//!
//! # Responsibility
//! - Mirror each store collection in memory, recency-sorted.
//! - Apply writes optimistically to the mirror around store writes.
//! - Derive read-only projections (today's task, goal progress).
//!
//! # Invariants
//! - Reads never hit the store; only `load` refreshes the mirror from it.
//! - Service instances never share their mirrors.

pub mod goal_service;
pub mod progress;
pub mod task_service;
