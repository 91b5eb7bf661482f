//! # Domain Models
//!
//! Pure domain types for the infrastructure survey with a single dependency (`serde`).
//! Keep it lean: no I/O, networking, or heavy logic. Just data and simple helpers.

pub mod config;
pub mod constants;
pub mod facility;
pub mod registry;
