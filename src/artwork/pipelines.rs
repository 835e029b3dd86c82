//! Artwork pipelines - high-level orchestration

mod materialize;

pub use materialize::Materializer;
