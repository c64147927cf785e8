//! # table-tournament-store
//!
//! The persistence boundary for tournament brackets. The bracket engine in
//! `table-tournament-core` operates on an in-memory value only; this crate
//! provides the pieces its caller injects to keep that value durable:
//!
//! - [`RecordStore`]: a key-value adapter trait, reached through
//!   create/read/update/delete of opaque documents keyed by
//!   [`TournamentId`].
//! - [`MemoryStore`]: the in-process reference implementation.
//! - [`to_document`]/[`from_document`]: the codec between a [`Bracket`] and
//!   its plain nested storage document.
//! - [`Tournaments`]: a thin service translating lineup changes and match
//!   results into a single engine call followed by a full-document persist.
//!
//! The design assumes single-writer-at-a-time semantics per tournament;
//! callers serialize writes themselves and the service re-fetches the latest
//! document before every mutation.
//!
//! [`Bracket`]: table_tournament_core::Bracket

mod document;
mod memory;
mod service;

pub use document::{from_document, to_document};
pub use memory::MemoryStore;
pub use service::Tournaments;

use std::fmt::{self, Display, Formatter};
use std::result;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A unique tournament identifier, the key of the record store.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct TournamentId(pub u64);

impl Display for TournamentId {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<u64> for TournamentId {
    #[inline]
    fn as_ref(&self) -> &u64 {
        &self.0
    }
}

impl PartialEq<u64> for TournamentId {
    #[inline]
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

impl From<u64> for TournamentId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for TournamentId {
    type Err = <u64 as FromStr>::Err;

    #[inline]
    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        Ok(Self(s.parse::<u64>()?))
    }
}

/// A stored bracket document. Opaque to the record store.
pub type Document = serde_json::Value;

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A document is already stored under the given key.
    #[error("tournament {0} already exists")]
    AlreadyExists(TournamentId),
    /// No document is stored under the given key.
    #[error("tournament {0} not found")]
    NotFound(TournamentId),
    /// The tournament exists but holds no usable bracket data; the caller
    /// should prompt for a bracket regeneration.
    #[error("tournament {0} has no bracket data")]
    NoBracket(TournamentId),
    /// An error from the bracket engine.
    #[error(transparent)]
    Bracket(#[from] table_tournament_core::Error),
    /// A document failed to serialize.
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),
}

/// A key-value record store holding one bracket document per tournament.
///
/// Implementations own durability and nothing else; documents pass through
/// unchanged and uninterpreted. The engine itself never touches storage.
pub trait RecordStore {
    /// Stores `document` under a new key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if a document is already stored
    /// under `id`.
    fn create(&self, id: TournamentId, document: Document) -> Result<()>;

    /// Returns the document stored under `id`, or `None`.
    fn read(&self, id: TournamentId) -> Result<Option<Document>>;

    /// Replaces the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document is stored under `id`.
    fn update(&self, id: TournamentId, document: Document) -> Result<()>;

    /// Removes the document stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document is stored under `id`.
    fn delete(&self, id: TournamentId) -> Result<()>;
}
