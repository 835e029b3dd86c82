//! Cover operations - filesystem and network side effects

pub mod corpus;
pub mod sgdb;

pub use corpus::scan_corpus;
pub use sgdb::{remote_cover_url, SgdbClient};
