// Estate Register - Core Library
// Exposes the parsing, loading, and query modules for the CLI and tests

pub mod listing;
pub mod loader;
pub mod parser;
pub mod registry;

// Re-export commonly used types
pub use listing::{Listing, ListingError};
pub use loader::{
    load_file, load_from_reader, FileSource, ListingSource, LoadError, LoadReport, SkippedLine,
};
pub use parser::{LineParser, ParseFailure};
pub use registry::ListingRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
