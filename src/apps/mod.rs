//! Application identity mapping
//!
//! Roku devices identify installed channels by opaque string tokens, while the
//! host platform wants small numeric input identifiers that survive restarts.
//! This module derives the numeric identifiers and keeps a per-session index
//! that can be searched in both directions.

pub mod index;
pub mod types;

pub use index::{AppIndex, derive_numeric_id};
pub use types::{HOME_APP_ID, MappedApp, RawApp};
