//! Type definitions for the process runner.

pub mod error;

// Re-export commonly used types
pub use error::{Error, Result};
