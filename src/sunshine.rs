//! Sunshine application list
//!
//! ## Module Structure
//! - `types.rs`: SunshineApp, DetachedApp, AppEntry
//! - `operations/`: apps.json file handling, fixed launcher entries
//! - `pipelines/`: the full import run

mod operations;
mod pipelines;
mod types;

pub use pipelines::{run_import, ImportOptions};
