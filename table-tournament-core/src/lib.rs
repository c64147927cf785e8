//! # table-tournament-core
//!
//! This crate contains the bracket engine for single elimination tournaments
//! played across multiple concurrent tables. It builds a tree of rounds and
//! matches from an ordered team lineup, advances winners as results arrive
//! and answers queries about the current state of the tournament.
//!
//! Important types:
//! - [`Bracket`]: the full tournament tree for one tournament instance.
//! - [`Round`]: an ordered sequence of matches sharing a round number.
//! - [`Match`]: a single pairing, carrying its table assignment.
//! - [`MatchId`]: a stable identifier derived from round and position.
//! - [`Team`]/[`TeamId`]: a roster entry and the opaque identifier the
//!   engine works with.
//!
//! An odd team count is balanced through a bye-determination round: the
//! lineup's last team is granted an automatic win in round 0 and re-enters
//! the bracket later, once the regular winners have caught up.
//!
//! The engine is synchronous and storage-agnostic. It only ever mutates the
//! in-memory [`Bracket`] value it owns; serializing the bracket to a
//! document and writing it somewhere is the caller's concern.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to all bracket types.
//!

mod bracket;
mod transition;
mod utils;

pub use bracket::{Bracket, Match, MatchId, ParseMatchIdError, Round};

use std::convert::Infallible;
use std::fmt::{self, Display, Formatter};
use std::result;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque team identifier.
///
/// The engine never inspects the contents; it only compares and copies
/// identifiers around the bracket. Display attributes live on [`Team`] and
/// are never embedded in a bracket.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TeamId(pub String);

impl Display for TeamId {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for TeamId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for TeamId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'a> From<&'a str> for TeamId {
    #[inline]
    fn from(id: &'a str) -> Self {
        Self(id.to_owned())
    }
}

impl FromStr for TeamId {
    type Err = Infallible;

    #[inline]
    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl PartialEq<str> for TeamId {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<'a> PartialEq<&'a str> for TeamId {
    #[inline]
    fn eq(&self, other: &&'a str) -> bool {
        self.0 == *other
    }
}

/// A single team in the lineup of a tournament.
///
/// Immutable once referenced by a bracket. Brackets reference teams by
/// [`TeamId`] only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub player_one: String,
    pub player_two: String,
    pub mascot: Option<String>,
}

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The referenced match does not exist anywhere in the bracket. This
    /// indicates a stale or malformed reference; the operation is not
    /// retryable.
    #[error("match {id} not found in the bracket")]
    MatchNotFound { id: MatchId },
    /// The referenced match already has a winner recorded and the submitted
    /// winner differs. Decided matches are immutable; there is no undo of a
    /// propagated advancement.
    #[error("match {id} is already decided with winner {winner}")]
    MatchAlreadyDecided { id: MatchId, winner: TeamId },
    /// Fewer than 2 teams were supplied where a non-empty bracket is
    /// required.
    #[error("insufficient teams: a bracket requires at least 2 teams, found {found}")]
    InsufficientTeams { found: usize },
}
