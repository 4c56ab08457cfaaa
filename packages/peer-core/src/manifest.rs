//! The initial holdings and wishlist of a peer.
//!
//! A manifest is a list of whitespace separated tokens:
//!
//! ```text
//! <owned file count>
//! <name> <chunk count>
//! <hash 1>
//! ...
//! <wanted file count>
//! <name>
//! ...
//! ```
//!
//! Line breaks carry no meaning. Every hash is exactly
//! [`HASH_SIZE`](swarmshare_primitives::HASH_SIZE) bytes of text.
use std::str::{FromStr, SplitWhitespace};

use swarmshare_primitives::{ChunkId, FileDescriptor};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of manifest, expected {expected}")]
    MissingToken { expected: &'static str },

    #[error("Invalid {field}: {token:?} is not a count")]
    InvalidCount { field: &'static str, token: String },

    #[error("Invalid entry in manifest: {0}")]
    InvalidEntry(#[from] swarmshare_primitives::Error),

    #[error("Unexpected trailing token in manifest: {token:?}")]
    TrailingToken { token: String },
}

/// What a peer owns when it starts and what it wants to download.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub owned: Vec<FileDescriptor>,
    pub wanted: Vec<String>,
}

impl Manifest {
    #[must_use]
    pub fn owns(&self, name: &str) -> bool {
        self.owned.iter().any(|file| file.name() == name)
    }

    /// The wanted files the peer does not already own, in manifest order.
    pub fn to_download(&self) -> impl Iterator<Item = &str> {
        self.wanted
            .iter()
            .map(String::as_str)
            .filter(|name| !self.owns(name))
    }
}

impl FromStr for Manifest {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens(s.split_whitespace());

        let owned_count = tokens.count("owned file count")?;
        let mut owned = Vec::with_capacity(owned_count.min(64));

        for _ in 0..owned_count {
            let name = tokens.next("owned file name")?;
            let chunk_count = tokens.count("chunk count")?;

            let chunks = (0..chunk_count)
                .map(|_| tokens.next("chunk hash").and_then(|hash| ChunkId::from_str(hash).map_err(ParseError::from)))
                .collect::<Result<Vec<_>, _>>()?;

            owned.push(FileDescriptor::new(name, chunks)?);
        }

        let wanted_count = tokens.count("wanted file count")?;
        let mut wanted = Vec::with_capacity(wanted_count.min(64));

        for _ in 0..wanted_count {
            let name = tokens.next("wanted file name")?;
            wanted.push(FileDescriptor::named(name)?.name().to_string());
        }

        if let Some(token) = tokens.0.next() {
            return Err(ParseError::TrailingToken {
                token: token.to_string(),
            });
        }

        Ok(Self { owned, wanted })
    }
}

struct Tokens<'a>(SplitWhitespace<'a>);

impl<'a> Tokens<'a> {
    fn next(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        self.0.next().ok_or(ParseError::MissingToken { expected })
    }

    fn count(&mut self, field: &'static str) -> Result<usize, ParseError> {
        let token = self.next(field)?;
        token.parse().map_err(|_| ParseError::InvalidCount {
            field,
            token: token.to_string(),
        })
    }
}
