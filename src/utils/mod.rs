//! Utility functions.
//!
//! - [`short_id`] - Short id derivation and short URL construction

pub mod short_id;
