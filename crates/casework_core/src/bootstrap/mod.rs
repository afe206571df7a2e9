//! Example dataset bootstrap.
//!
//! # Responsibility
//! - Read the example case list and per-case task groups.
//! - Seed and tear down that dataset through the domain service only.
//!
//! # Invariants
//! - Loading twice never duplicates a case.
//! - Clearing touches only cases whose number is in the dataset.
//! - Unreadable or malformed dataset files are fatal and write nothing.

pub mod dataset;
pub mod loader;
