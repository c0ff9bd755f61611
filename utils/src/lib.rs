//! Shared utilities for voteweb.

pub mod slug;

pub use slug::slugify;
