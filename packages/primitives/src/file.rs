//! File descriptors.
use serde::{Deserialize, Serialize};

use crate::{ChunkId, Error};

/// Maximum number of bytes in a file name.
pub const MAX_FILE_NAME_LEN: usize = 14;

/// A file name plus its ordered chunk hashes.
///
/// A descriptor is either complete (it lists every chunk of the file) or it is
/// known only by name, as it is for a file a peer wants but has not yet seen
/// in a swarm. In both cases `total_chunks` equals the number of listed
/// chunks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFileDescriptor", into = "RawFileDescriptor")]
pub struct FileDescriptor {
    name: String,
    chunks: Vec<ChunkId>,
}

impl FileDescriptor {
    /// Builds a complete descriptor.
    ///
    /// # Errors
    ///
    /// Will return an [`Error::InvalidFileName`] if the name is empty or too long.
    pub fn new(name: impl Into<String>, chunks: Vec<ChunkId>) -> Result<Self, Error> {
        let name = validate_name(name.into())?;
        Ok(Self { name, chunks })
    }

    /// Builds a descriptor known only by name.
    ///
    /// # Errors
    ///
    /// Will return an [`Error::InvalidFileName`] if the name is empty or too long.
    pub fn named(name: impl Into<String>) -> Result<Self, Error> {
        Self::new(name, Vec::new())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn chunks(&self) -> &[ChunkId] {
        &self.chunks
    }

    #[must_use]
    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// The expected hash of the chunk at `index`, if the file has one.
    #[must_use]
    pub fn chunk(&self, index: usize) -> Option<&ChunkId> {
        self.chunks.get(index)
    }

    #[must_use]
    pub fn is_known_by_name_only(&self) -> bool {
        self.chunks.is_empty()
    }
}

fn validate_name(name: String) -> Result<String, Error> {
    if name.is_empty() || name.len() > MAX_FILE_NAME_LEN || name.chars().any(char::is_whitespace) {
        return Err(Error::InvalidFileName { name });
    }
    Ok(name)
}

/// The wire and storage shape of a descriptor, with the chunk count spelled out.
#[derive(Serialize, Deserialize)]
struct RawFileDescriptor {
    name: String,
    chunks: Vec<ChunkId>,
    total_chunks: usize,
}

impl TryFrom<RawFileDescriptor> for FileDescriptor {
    type Error = Error;

    fn try_from(raw: RawFileDescriptor) -> Result<Self, Self::Error> {
        if raw.total_chunks != raw.chunks.len() {
            return Err(Error::ChunkCountMismatch {
                name: raw.name,
                declared: raw.total_chunks,
                listed: raw.chunks.len(),
            });
        }
        FileDescriptor::new(raw.name, raw.chunks)
    }
}

impl From<FileDescriptor> for RawFileDescriptor {
    fn from(descriptor: FileDescriptor) -> Self {
        let total_chunks = descriptor.chunks.len();
        Self {
            name: descriptor.name,
            chunks: descriptor.chunks,
            total_chunks,
        }
    }
}
