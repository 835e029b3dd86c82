//! Cover pipelines - high-level orchestration

mod resolve;

pub use resolve::{find_cover_url, resolve_cover, CoverContext};
