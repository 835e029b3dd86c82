//! Cover image materialization
//!
//! Turns a resolved cover source (remote URL, `file://` URI or absolute path)
//! into a canonical PNG at a fixed size.
//!
//! ## Module Structure
//! - `types.rs`: CanonicalSpec, ImageSource
//! - `operations/`: fetch to temp file, conversion strategies, validation
//! - `pipelines/`: Materializer (idempotent fetch + ordered conversion)

pub(crate) mod operations;
mod pipelines;
mod types;

pub use pipelines::Materializer;
pub use types::CanonicalSpec;
