//! File access for the merge tool
//!
//! All filesystem traffic lives here. Input validation runs before any file
//! is read, and the output is written only after the merge has fully
//! succeeded, so a failed run never leaves a partial file behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, ToolError};

/// Check that every input path exists before any file is read.
///
/// A missing file aborts the run. A missing `.uf2` extension only logs a
/// warning; valid images are sometimes named differently.
pub fn validate_inputs(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        if !path.is_file() {
            return Err(ToolError::FileNotFound(path.clone()));
        }
        let has_uf2_ext = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("uf2"));
        if !has_uf2_ext {
            warn!("{} does not have a .uf2 extension", path.display());
        }
    }
    Ok(())
}

/// Read one input file, reporting a missing path distinctly from other I/O
/// failures.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ToolError::FileNotFound(path.to_path_buf()),
        _ => ToolError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Write the merged output file.
pub fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|source| ToolError::Write {
        path: path.to_path_buf(),
        source,
    })
}
