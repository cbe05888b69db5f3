//! Error types for the uf2merge tool

use std::path::PathBuf;

use thiserror::Error;

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Failures at the filesystem boundary.
///
/// The merge itself has no error cases; everything that can go wrong happens
/// before or after it, around file access.
#[derive(Error, Debug)]
pub enum ToolError {
    /// An input path does not exist
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Reading an input file failed
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        /// Path of the file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the output file failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Path of the file that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
