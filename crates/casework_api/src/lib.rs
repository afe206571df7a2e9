//! Boundary adapter translating casework core results into status-coded
//! responses, one function per route.

pub mod api;

pub use api::{status_for, ApiResponse, CaseworkApi};
