//! Artwork operations - atomic side effects
//!
//! Fetching bytes, converting files, validating existing output.

pub mod convert;
pub mod fetch;
pub mod validate;

pub use convert::{default_strategies, ConvertStrategy};
pub use fetch::fetch_to_temp;
pub use validate::is_canonical;
