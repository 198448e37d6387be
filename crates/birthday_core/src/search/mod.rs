//! View-level search and filtering.
//!
//! # Responsibility
//! - Produce the visible subset of the roster for a search term and an
//!   optional tag filter.
//!
//! # Invariants
//! - Filtering is pure: it never mutates or reorders the roster.

pub mod filter;
