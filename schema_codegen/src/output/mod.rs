//! Generated artifacts and the writer that puts them on disk

pub mod writer;

use std::path::PathBuf;

pub use writer::ArtifactWriter;

/// How an artifact meets an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file
    Overwrite,
    /// Add to the end of the file, creating it if needed
    Append,
}

/// A rendered output unit: a class file or a documentation page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the output directory
    pub path: PathBuf,
    pub contents: String,
    pub mode: WriteMode,
}

impl Artifact {
    pub fn overwrite(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
            mode: WriteMode::Overwrite,
        }
    }

    pub fn append(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
            mode: WriteMode::Append,
        }
    }
}
