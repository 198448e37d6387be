//! Use-case services over the roster.
//!
//! # Responsibility
//! - Host the ordered-list mutation engine and reminder selection.

pub mod reminder;
pub mod roster_service;
