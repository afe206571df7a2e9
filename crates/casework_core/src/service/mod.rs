//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs over DTOs.
//! - Classify failures into caller-facing error kinds.

pub mod casework_service;
pub mod error;
pub mod property;
