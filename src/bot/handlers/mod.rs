//! Discord interaction handlers
//!
//! Autocomplete providers and the admission guard every view runs first.

/// Autocomplete handlers for withdrawal ids and influencer usernames
pub mod autocomplete;
/// Admission guard shared by all views
pub mod guard;
