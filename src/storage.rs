//! Peer manifests and downloaded files on disk.
//!
//! ```text
//! <input_dir>/in<rank>.txt         manifest of the peer with that rank
//! <output_dir>/client<rank>.<name> chunk hashes of a downloaded file, one per line
//! ```
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use swarmshare_peer_core::manifest::ParseError;
use swarmshare_peer_core::{FileSink, Manifest};
use swarmshare_primitives::{FileDescriptor, Rank};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to read manifest {path}: {source}")]
    UnreadableManifest { path: PathBuf, source: io::Error },

    #[error("Invalid manifest {path}: {source}")]
    InvalidManifest { path: PathBuf, source: ParseError },
}

#[must_use]
pub fn manifest_path(input_dir: &Path, rank: Rank) -> PathBuf {
    input_dir.join(format!("in{rank}.txt"))
}

#[must_use]
pub fn output_path(output_dir: &Path, rank: Rank, name: &str) -> PathBuf {
    output_dir.join(format!("client{rank}.{name}"))
}

/// Reads and parses the manifest of the peer with rank `rank`.
///
/// # Errors
///
/// Will return an error if the file can't be read or is not a valid manifest.
pub fn read_manifest(input_dir: &Path, rank: Rank) -> Result<Manifest, Error> {
    let path = manifest_path(input_dir, rank);

    let text = fs::read_to_string(&path).map_err(|source| Error::UnreadableManifest {
        path: path.clone(),
        source,
    })?;

    text.parse().map_err(|source| Error::InvalidManifest { path, source })
}

/// Writes every completed file under one directory.
#[derive(Debug, Clone)]
pub struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSink for OutputDirectory {
    fn persist(&self, owner: Rank, file: &FileDescriptor) -> io::Result<()> {
        let path = output_path(&self.path, owner, file.name());
        let mut out = BufWriter::new(File::create(&path)?);

        for chunk in file.chunks() {
            writeln!(out, "{chunk}")?;
        }

        out.flush()?;

        tracing::debug!(path = %path.display(), chunks = file.total_chunks(), "file written");

        Ok(())
    }
}
