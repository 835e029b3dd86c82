//! Pure functions for the cover module
//!
//! No I/O; everything here is deterministic over its inputs.

pub mod extract;
pub mod matcher;
pub mod ranking;
pub mod search;
pub mod walker;

pub use extract::extract_candidates;
pub use matcher::classify;
pub use ranking::select_best;
pub use walker::walk;
