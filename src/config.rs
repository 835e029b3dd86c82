pub mod operations;
pub mod types;

// Re-export types
pub use types::ImportSettings;

// Re-export operations
pub use operations::load_cover_config;
