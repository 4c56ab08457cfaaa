//! Content-addressed chunk identifiers.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Number of bytes in a chunk hash.
pub const HASH_SIZE: usize = 32;

/// The content hash of one chunk.
///
/// Two chunks are the same chunk if and only if their ids are byte-equal. The
/// hash stands in for the chunk data itself: transferring a chunk means
/// transferring its id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId([u8; HASH_SIZE]);

impl ChunkId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl TryFrom<&[u8]> for ChunkId {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; HASH_SIZE] = value
            .try_into()
            .map_err(|_| Error::InvalidChunkId { len: value.len() })?;
        Ok(Self(bytes))
    }
}

/// Chunk ids are written in manifests and output files as the raw hash text.
impl FromStr for ChunkId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.as_bytes())
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({self})")
    }
}
