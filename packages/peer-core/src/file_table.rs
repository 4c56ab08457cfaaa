//! The files a peer holds, in whole or in part.
//!
//! The table is shared by the downloader, which fills it, and the uploader,
//! which reads it to answer chunk requests. Every access locks the table for
//! the duration of one method call only; no lock is ever held across a
//! transport operation.
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use swarmshare_primitives::{ChunkId, FileDescriptor};

use crate::error::Error;

/// What a peer knows and holds of one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerFileState {
    name: String,
    /// `None` while the file is known only by name.
    total_chunks: Option<usize>,
    held: Vec<Option<ChunkId>>,
}

impl PeerFileState {
    /// A file the peer owns entirely.
    #[must_use]
    pub fn owned(descriptor: &FileDescriptor) -> Self {
        Self {
            name: descriptor.name().to_string(),
            total_chunks: Some(descriptor.total_chunks()),
            held: descriptor.chunks().iter().copied().map(Some).collect(),
        }
    }

    /// A file the peer wants but knows only by name.
    #[must_use]
    pub fn wanted(name: &str) -> Self {
        Self {
            name: name.to_string(),
            total_chunks: None,
            held: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Learns the chunk count of the file. Chunks already held are kept.
    pub fn expect(&mut self, total_chunks: usize) {
        self.total_chunks = Some(total_chunks);
        self.held.resize(total_chunks, None);
    }

    #[must_use]
    pub fn chunk(&self, index: usize) -> Option<&ChunkId> {
        self.held.get(index).and_then(Option::as_ref)
    }

    /// Stores a received chunk. Returns `false` if the index is out of range.
    pub fn store(&mut self, index: usize, chunk: ChunkId) -> bool {
        match self.held.get_mut(index) {
            Some(slot) => {
                *slot = Some(chunk);
                true
            }
            None => false,
        }
    }

    /// The lowest index of a chunk the peer does not hold yet.
    #[must_use]
    pub fn first_missing(&self) -> Option<usize> {
        self.held.iter().position(Option::is_none)
    }

    #[must_use]
    pub fn held_count(&self) -> usize {
        self.held.iter().filter(|chunk| chunk.is_some()).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_chunks.is_some() && self.first_missing().is_none()
    }

    /// The full descriptor of the file, once every chunk is held.
    #[must_use]
    pub fn descriptor(&self) -> Option<FileDescriptor> {
        if !self.is_complete() {
            return None;
        }
        let chunks = self.held.iter().flatten().copied().collect();
        FileDescriptor::new(self.name.clone(), chunks).ok()
    }
}

/// The file table of one peer, shared between its workers.
#[derive(Clone, Debug, Default)]
pub struct FileTable {
    files: Arc<Mutex<HashMap<String, PeerFileState>>>,
}

impl FileTable {
    /// A table with the owned files complete and the wanted ones known by name.
    #[must_use]
    pub fn new<'a>(owned: &[FileDescriptor], wanted: impl IntoIterator<Item = &'a str>) -> Self {
        let mut files: HashMap<String, PeerFileState> = owned
            .iter()
            .map(|descriptor| (descriptor.name().to_string(), PeerFileState::owned(descriptor)))
            .collect();

        for name in wanted {
            files
                .entry(name.to_string())
                .or_insert_with(|| PeerFileState::wanted(name));
        }

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<PeerFileState> {
        self.files.lock().get(name).cloned()
    }

    /// The hash of a chunk the peer can hand out, if it holds it.
    #[must_use]
    pub fn chunk(&self, name: &str, index: usize) -> Option<ChunkId> {
        self.files.lock().get(name).and_then(|file| file.chunk(index).copied())
    }

    /// Sets the chunk count of a file, adding it to the table if needed.
    pub fn expect(&self, name: &str, total_chunks: usize) {
        self.files
            .lock()
            .entry(name.to_string())
            .or_insert_with(|| PeerFileState::wanted(name))
            .expect(total_chunks);
    }

    /// Stores a received chunk.
    ///
    /// # Errors
    ///
    /// Will return an error if the file is unknown or the index is past its
    /// end.
    pub fn store(&self, name: &str, index: usize, chunk: ChunkId) -> Result<(), Error> {
        let stored = self
            .files
            .lock()
            .get_mut(name)
            .is_some_and(|file| file.store(index, chunk));

        if stored {
            Ok(())
        } else {
            Err(Error::UnstorableChunk {
                name: name.to_string(),
                index,
            })
        }
    }

    #[must_use]
    pub fn first_missing(&self, name: &str) -> Option<usize> {
        self.files.lock().get(name).and_then(PeerFileState::first_missing)
    }

    #[must_use]
    pub fn is_complete(&self, name: &str) -> bool {
        self.files.lock().get(name).is_some_and(PeerFileState::is_complete)
    }

    #[must_use]
    pub fn descriptor(&self, name: &str) -> Option<FileDescriptor> {
        self.files.lock().get(name).and_then(PeerFileState::descriptor)
    }
}
