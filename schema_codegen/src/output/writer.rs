//! Artifact writer
//!
//! Writes are not transactional: an error aborts the remaining artifacts and
//! leaves whatever was already written in place.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::output::{Artifact, WriteMode};

/// Writes artifacts below an output directory
pub struct ArtifactWriter {
    root: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one artifact, creating missing parent directories
    pub fn write(&self, artifact: &Artifact) -> Result<PathBuf> {
        let path = self.root.join(&artifact.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        match artifact.mode {
            WriteMode::Overwrite => fs::write(&path, &artifact.contents)?,
            WriteMode::Append => {
                let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
                file.write_all(artifact.contents.as_bytes())?;
            }
        }

        tracing::debug!(path = %path.display(), mode = ?artifact.mode, "Wrote artifact");
        Ok(path)
    }

    /// Write artifacts in order, stopping at the first failure
    pub fn write_all(&self, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
        artifacts.iter().map(|artifact| self.write(artifact)).collect()
    }
}
