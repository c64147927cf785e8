//! Storage-backed tournament operations.
//!
//! [`Tournaments`] is the glue the request layer calls into: every action
//! translates into at most one engine call followed by a persist of the full
//! bracket document. Writes for one tournament must be serialized by the
//! caller; each mutation re-fetches the latest document first.

use table_tournament_core::{Bracket, Error as BracketError, MatchId, Team, TeamId};

use crate::{document, Error, RecordStore, Result, TournamentId};

/// Storage-backed operations on tournament brackets.
#[derive(Debug)]
pub struct Tournaments<S> {
    store: S,
}

impl<S> Tournaments<S>
where
    S: RecordStore,
{
    /// Creates a new `Tournaments` service on top of `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying record store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Builds a fresh bracket from `teams` and replaces the stored one.
    ///
    /// This is destructive: any results already recorded for the tournament
    /// are lost, which is why callers ask for explicit confirmation before
    /// invoking it.
    ///
    /// # Errors
    ///
    /// Returns [`BracketError::InsufficientTeams`] when fewer than 2 teams
    /// are supplied, without touching the stored document.
    pub fn regenerate(
        &self,
        id: TournamentId,
        teams: &[Team],
        table_count: usize,
    ) -> Result<Bracket> {
        if teams.len() < 2 {
            return Err(BracketError::InsufficientTeams { found: teams.len() }.into());
        }

        let bracket = Bracket::new(teams.iter().map(|team| team.id.clone()), table_count);
        let document = document::to_document(&bracket)?;

        log::debug!("Replacing bracket document for tournament {}", id);

        match self.store.update(id, document.clone()) {
            Ok(()) => {}
            Err(Error::NotFound(_)) => self.store.create(id, document)?,
            Err(err) => return Err(err),
        }

        Ok(bracket)
    }

    /// Returns the stored bracket.
    ///
    /// Returns `None` when no document is stored or the stored document is
    /// malformed.
    pub fn bracket(&self, id: TournamentId) -> Result<Option<Bracket>> {
        let document = match self.store.read(id)? {
            Some(document) => document,
            None => return Ok(None),
        };

        Ok(document::from_document(&document))
    }

    /// Records a match winner and persists the advanced bracket.
    ///
    /// The latest document is re-fetched before the result is applied, then
    /// the whole bracket is written back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoBracket`] when the tournament has no usable
    /// bracket data, and any error of the underlying engine call unchanged.
    pub fn record_result(
        &self,
        id: TournamentId,
        match_id: &MatchId,
        winner: TeamId,
    ) -> Result<Bracket> {
        let mut bracket = self.bracket(id)?.ok_or(Error::NoBracket(id))?;

        bracket.process_match_result(match_id, winner)?;
        self.store.update(id, document::to_document(&bracket)?)?;

        Ok(bracket)
    }

    /// Returns the tournament winner, if decided.
    pub fn winner(&self, id: TournamentId) -> Result<Option<TeamId>> {
        Ok(self
            .bracket(id)?
            .and_then(|bracket| bracket.winner().cloned()))
    }

    /// Deletes the stored bracket document.
    pub fn remove(&self, id: TournamentId) -> Result<()> {
        self.store.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use table_tournament_core::{Error as BracketError, Team, TeamId};

    use super::Tournaments;
    use crate::{Error, MemoryStore, RecordStore, TournamentId};

    fn team(id: &str) -> Team {
        Team {
            id: TeamId::from(id),
            name: id.to_uppercase(),
            player_one: format!("{} one", id),
            player_two: format!("{} two", id),
            mascot: None,
        }
    }

    fn teams(n: usize) -> Vec<Team> {
        (1..=n).map(|i| team(&format!("team{}", i))).collect()
    }

    #[test]
    fn test_regenerate_requires_teams() {
        let tournaments = Tournaments::new(MemoryStore::new());
        let id = TournamentId(1);

        assert!(matches!(
            tournaments.regenerate(id, &[], 1),
            Err(Error::Bracket(BracketError::InsufficientTeams { found: 0 }))
        ));
        assert!(matches!(
            tournaments.regenerate(id, &teams(1), 1),
            Err(Error::Bracket(BracketError::InsufficientTeams { found: 1 }))
        ));

        // Nothing was persisted.
        assert!(tournaments.store().is_empty());
    }

    #[test]
    fn test_regenerate_replaces_wholesale() {
        let tournaments = Tournaments::new(MemoryStore::new());
        let id = TournamentId(1);

        tournaments.regenerate(id, &teams(4), 1).unwrap();
        tournaments
            .record_result(id, &"match-0-0".parse().unwrap(), TeamId::from("team1"))
            .unwrap();

        // Regeneration discards the recorded result.
        let bracket = tournaments.regenerate(id, &teams(4), 2).unwrap();
        assert_eq!(bracket.active_matches().count(), 2);
        assert_eq!(tournaments.bracket(id).unwrap(), Some(bracket));
    }

    #[test]
    fn test_record_result_round_trip() {
        let tournaments = Tournaments::new(MemoryStore::new());
        let id = TournamentId(7);

        tournaments.regenerate(id, &teams(5), 1).unwrap();

        tournaments
            .record_result(id, &"bye-match-0".parse().unwrap(), TeamId::from("team1"))
            .unwrap();
        tournaments
            .record_result(id, &"bye-match-1".parse().unwrap(), TeamId::from("team3"))
            .unwrap();
        tournaments
            .record_result(id, &"match-1-0".parse().unwrap(), TeamId::from("team1"))
            .unwrap();

        assert_eq!(tournaments.winner(id).unwrap(), None);

        let bracket = tournaments
            .record_result(id, &"match-2-0".parse().unwrap(), TeamId::from("team1"))
            .unwrap();

        assert!(bracket.is_complete());
        assert_eq!(tournaments.winner(id).unwrap(), Some(TeamId::from("team1")));

        // The persisted document reflects the final state.
        let stored = tournaments.bracket(id).unwrap().unwrap();
        assert_eq!(stored, bracket);
    }

    #[test]
    fn test_record_result_engine_errors_pass_through() {
        let tournaments = Tournaments::new(MemoryStore::new());
        let id = TournamentId(1);

        tournaments.regenerate(id, &teams(4), 1).unwrap();

        let missing = "match-9-9".parse().unwrap();
        assert!(matches!(
            tournaments.record_result(id, &missing, TeamId::from("team1")),
            Err(Error::Bracket(BracketError::MatchNotFound { .. }))
        ));
    }

    #[test]
    fn test_no_bracket_data() {
        let tournaments = Tournaments::new(MemoryStore::new());
        let id = TournamentId(3);

        // Missing document.
        assert!(matches!(
            tournaments.record_result(id, &"match-0-0".parse().unwrap(), TeamId::from("team1")),
            Err(Error::NoBracket(_))
        ));

        // Malformed document falls back to "no bracket data" as well.
        tournaments
            .store()
            .create(id, json!({ "rounds": "garbage" }))
            .unwrap();

        assert_eq!(tournaments.bracket(id).unwrap(), None);
        assert!(matches!(
            tournaments.record_result(id, &"match-0-0".parse().unwrap(), TeamId::from("team1")),
            Err(Error::NoBracket(_))
        ));
    }

    #[test]
    fn test_remove() {
        let tournaments = Tournaments::new(MemoryStore::new());
        let id = TournamentId(1);

        assert!(matches!(tournaments.remove(id), Err(Error::NotFound(_))));

        tournaments.regenerate(id, &teams(2), 1).unwrap();
        tournaments.remove(id).unwrap();
        assert_eq!(tournaments.bracket(id).unwrap(), None);
    }
}
