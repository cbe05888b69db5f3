//! uf2merge library
//!
//! This library provides the filesystem layer for the `uf2merge` CLI tool.
//! The merge itself lives in the `uf2-formats` crate and only ever sees
//! in-memory buffers.

#![warn(missing_docs)]

pub mod error;
pub mod io;

pub use error::{Result, ToolError};
