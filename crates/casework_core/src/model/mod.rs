//! Relational domain model for cases and their tasks.
//!
//! # Responsibility
//! - Define the persisted Case and Task records.
//! - Define paging and timestamp primitives shared by every layer.
//!
//! # Invariants
//! - Task -> Case is the only persisted relation; Case -> Tasks is derived.

pub mod case;
pub mod page;
pub mod task;
pub mod timestamp;
