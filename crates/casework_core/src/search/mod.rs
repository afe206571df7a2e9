//! Search entry points shared by case and task repositories.
//!
//! # Responsibility
//! - Keep search-string interpretation in one place so case and task search
//!   apply the same id-or-substring policy.

pub mod filter;
