//! Cover art resolution
//!
//! Finds the best cover URL for a game by searching the JSON documents a
//! launcher leaves on disk, falling back to a SteamGridDB name search.
//!
//! ## Module Structure
//! - `types.rs`: UrlCandidate, CoverRules, SearchAlias, RemoteSearchConfig
//! - `pure/`: tree walker, identifier matcher, URL extractor, ranking, search helpers
//! - `operations/`: corpus scanner, SteamGridDB client
//! - `pipelines/`: per-game resolution across every source

mod operations;
mod pipelines;
mod pure;
mod types;

pub use pipelines::{find_cover_url, resolve_cover, CoverContext};
pub use types::{default_search_aliases, CoverRules, RemoteSearchConfig, SearchAlias};
