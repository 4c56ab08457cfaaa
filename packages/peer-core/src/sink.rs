//! Where completed files go.
use std::io;

use mockall::automock;
use swarmshare_primitives::{FileDescriptor, Rank};

/// Persists the files a peer finished downloading.
///
/// A failure is fatal for the peer: the file is not reported as complete.
#[automock]
pub trait FileSink: Send + Sync {
    /// Writes out `file`, downloaded by the peer with rank `owner`.
    ///
    /// # Errors
    ///
    /// Will return an error if the file can't be written.
    fn persist(&self, owner: Rank, file: &FileDescriptor) -> io::Result<()>;
}
