use crate::transition::{advance_rule, Advance};
use crate::utils::NumExt;
use crate::{Error, Result, TeamId};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A stable match identifier, deterministically derived from the position of
/// the match in the bracket.
///
/// Rendered as `match-<round>-<position>` for main rounds and as
/// `bye-match-<position>` for all matches of the bye-determination round,
/// including its real pairings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchId {
    /// A match in a main tournament round.
    Main { round: usize, position: usize },
    /// A match in the bye-determination round of an odd bracket.
    Bye { position: usize },
}

impl MatchId {
    /// Returns the round number encoded in the identifier. Bye-determination
    /// matches always belong to round 0.
    #[inline]
    pub fn round(&self) -> usize {
        match self {
            Self::Main { round, .. } => *round,
            Self::Bye { .. } => 0,
        }
    }

    /// Returns the position within the round encoded in the identifier.
    #[inline]
    pub fn position(&self) -> usize {
        match self {
            Self::Main { position, .. } => *position,
            Self::Bye { position } => *position,
        }
    }
}

impl Display for MatchId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main { round, position } => write!(f, "match-{}-{}", round, position),
            Self::Bye { position } => write!(f, "bye-match-{}", position),
        }
    }
}

/// The error returned when parsing a [`MatchId`] fails.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid match id: {0}")]
pub struct ParseMatchIdError(String);

impl FromStr for MatchId {
    type Err = ParseMatchIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(position) = s.strip_prefix("bye-match-") {
            let position = position
                .parse()
                .map_err(|_| ParseMatchIdError(s.to_owned()))?;

            return Ok(Self::Bye { position });
        }

        if let Some(rest) = s.strip_prefix("match-") {
            if let Some((round, position)) = rest.split_once('-') {
                let round = round.parse().map_err(|_| ParseMatchIdError(s.to_owned()))?;
                let position = position
                    .parse()
                    .map_err(|_| ParseMatchIdError(s.to_owned()))?;

                return Ok(Self::Main { round, position });
            }
        }

        Err(ParseMatchIdError(s.to_owned()))
    }
}

#[cfg(feature = "serde")]
impl Serialize for MatchId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A single pairing of two teams, the atomic unit of competition.
///
/// A match with both teams known and no winner recorded is *active*
/// (playable). A match with a winner recorded is *complete* and immutable
/// thereafter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Match {
    pub id: MatchId,
    pub round: usize,
    pub position: usize,
    /// The first team, absent while awaiting an earlier winner.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "team1Id", skip_serializing_if = "Option::is_none")
    )]
    pub team1: Option<TeamId>,
    /// The second team. Permanently absent on the auto-advanced bye.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "team2Id", skip_serializing_if = "Option::is_none")
    )]
    pub team2: Option<TeamId>,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "winnerId", skip_serializing_if = "Option::is_none")
    )]
    pub winner: Option<TeamId>,
    /// The table the match is played on, starting at 1.
    pub table_id: usize,
}

impl Match {
    /// Creates a new match with no teams assigned. Tables are assigned
    /// round-robin by position.
    fn pending(id: MatchId, round: usize, position: usize, table_count: usize) -> Self {
        Self {
            id,
            round,
            position,
            team1: None,
            team2: None,
            winner: None,
            table_id: position % table_count + 1,
        }
    }

    /// Returns `true` if both teams are known and no winner has been
    /// recorded yet.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.winner.is_none() && self.team1.is_some() && self.team2.is_some()
    }

    /// Returns `true` if a winner has been recorded.
    #[inline]
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    /// Returns `true` if this is the auto-advanced bye: a bye-determination
    /// match holding a single team with no opponent.
    #[inline]
    pub fn is_auto_bye(&self) -> bool {
        matches!(self.id, MatchId::Bye { .. }) && self.team2.is_none()
    }
}

/// An ordered sequence of matches sharing a round number.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Round {
    pub round: usize,
    pub matches: Vec<Match>,
}

/// The full tournament tree for one tournament instance.
///
/// Created once from a team lineup and a table count, then mutated in place
/// as match results arrive. A lineup or table-count change replaces the
/// whole bracket; there is no merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bracket {
    rounds: Vec<Round>,
}

impl Bracket {
    /// Creates a new `Bracket` from an ordered team lineup.
    ///
    /// Construction is a pure function of its inputs: identical lineups and
    /// table counts always yield an identical bracket. Fewer than 2 teams
    /// produce an empty bracket with zero rounds, which is a valid terminal
    /// state. A `table_count` of 0 is treated as 1.
    ///
    /// An even lineup is paired sequentially into round 0. An odd lineup
    /// starts with a bye-determination round instead: the first `n - 1`
    /// teams are paired sequentially and the last team is granted an
    /// automatic win, re-entering the bracket after round 1 has been played.
    pub fn new<I>(teams: I, table_count: usize) -> Self
    where
        I: IntoIterator<Item = TeamId>,
    {
        let teams: Vec<TeamId> = teams.into_iter().collect();
        let table_count = table_count.max(1);

        log::debug!(
            "Creating new bracket with {} teams across {} tables",
            teams.len(),
            table_count
        );

        if teams.len() < 2 {
            return Self { rounds: Vec::new() };
        }

        let n = teams.len();
        let odd = n % 2 == 1;

        let mut rounds = Vec::new();

        if odd {
            rounds.push(Round {
                round: 0,
                matches: bye_determination_matches(&teams, table_count),
            });
        }

        let start = usize::from(odd);
        let main_rounds = if odd { n - 1 } else { n }.ilog2_ceil();

        // Matches feeding the first main round: the real round 0 pairings
        // for an odd lineup, the lineup itself otherwise.
        let mut match_count = if odd { (n / 2).half_ceil() } else { n / 2 };

        for offset in 0..main_rounds {
            let round = start + offset;
            if offset > 0 {
                match_count = match_count.half_ceil();
            }

            let mut matches: Vec<Match> = (0..match_count)
                .map(|position| {
                    Match::pending(MatchId::Main { round, position }, round, position, table_count)
                })
                .collect();

            // The first round of an even bracket is seeded from the lineup
            // directly.
            if !odd && offset == 0 {
                for (position, pair) in teams.chunks(2).enumerate() {
                    matches[position].team1 = Some(pair[0].clone());
                    matches[position].team2 = Some(pair[1].clone());
                }
            }

            rounds.push(Round { round, matches });
        }

        log::debug!("Created new bracket with {} rounds", rounds.len());

        Self { rounds }
    }

    /// Returns the rounds of the bracket, in order. Round numbers equal
    /// their index.
    #[inline]
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Returns `true` if the bracket contains no rounds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Returns the match at `round`/`position`.
    pub fn get(&self, round: usize, position: usize) -> Option<&Match> {
        self.rounds.get(round)?.matches.get(position)
    }

    /// Returns the match with the given id.
    pub fn get_by_id(&self, id: &MatchId) -> Option<&Match> {
        let r#match = self.get(id.round(), id.position())?;

        (r#match.id == *id).then_some(r#match)
    }

    fn match_mut(&mut self, id: &MatchId) -> Option<&mut Match> {
        let r#match = self
            .rounds
            .get_mut(id.round())?
            .matches
            .get_mut(id.position())?;

        (r#match.id == *id).then_some(r#match)
    }

    /// Returns the tournament winner: the recorded winner of the final.
    ///
    /// Returns `None` while the final is undecided or when the bracket is
    /// empty.
    pub fn winner(&self) -> Option<&TeamId> {
        self.rounds.last()?.matches.first()?.winner.as_ref()
    }

    /// Returns `true` if a tournament winner exists.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.winner().is_some()
    }

    /// Returns all currently playable matches, ordered by round, then by
    /// position within the round.
    pub fn active_matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds
            .iter()
            .flat_map(|round| round.matches.iter().filter(|m| m.is_active()))
    }

    /// Returns `true` if the bracket was built from an odd team count and
    /// therefore starts with a bye-determination round.
    pub fn is_odd(&self) -> bool {
        self.rounds.first().map_or(false, |round| {
            round
                .matches
                .iter()
                .any(|m| matches!(m.id, MatchId::Bye { .. }))
        })
    }

    /// Records `winner` for the match with the given id and propagates it
    /// into the following rounds.
    ///
    /// Re-submitting the winner a match was already decided with is a no-op;
    /// in particular re-deriving the auto-advanced bye does not push the bye
    /// team anywhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatchNotFound`] if no match with the given id exists
    /// anywhere in the bracket, and [`Error::MatchAlreadyDecided`] if the
    /// match has a winner recorded that differs from `winner`. In both cases
    /// the bracket is left unmodified.
    pub fn process_match_result(&mut self, id: &MatchId, winner: TeamId) -> Result<()> {
        let odd = self.is_odd();
        let last = self.rounds.len().saturating_sub(1);

        let r#match = match self.match_mut(id) {
            Some(m) => m,
            None => return Err(Error::MatchNotFound { id: *id }),
        };

        if let Some(decided) = &r#match.winner {
            if *decided == winner {
                log::debug!("match {} already decided with the same winner", id);
                return Ok(());
            }

            return Err(Error::MatchAlreadyDecided {
                id: *id,
                winner: decided.clone(),
            });
        }

        let origin = r#match.round;
        let position = r#match.position;
        let bye = r#match.is_auto_bye();

        r#match.winner = Some(winner.clone());

        let rule = advance_rule(origin, last, odd, bye);
        log::debug!("Advancing winner of {} via {:?}", id, rule);

        match rule {
            Advance::Hold | Advance::Terminal => {}
            Advance::Compact => self.advance_compact(position, &winner),
            Advance::OpenFinalSlot => self.fill_final_slot(&winner),
            Advance::Halve => self.advance_halved(origin, position, &winner),
        }

        self.place_deferred_bye();

        Ok(())
    }

    /// Returns the winner of the auto-advanced bye match, if the bracket has
    /// one.
    fn bye_winner(&self) -> Option<&TeamId> {
        self.rounds
            .first()?
            .matches
            .iter()
            .find(|m| m.is_auto_bye())
            .and_then(|m| m.winner.as_ref())
    }

    /// Advances a round 0 winner of an odd bracket.
    ///
    /// Winners are compacted across the bye slot: the first one meets the
    /// bye team in round 1's single match, every later one seeds the final
    /// directly and waits there for the round 1 winner.
    fn advance_compact(&mut self, position: usize, winner: &TeamId) {
        let compact = self.rounds[0]
            .matches
            .iter()
            .filter(|m| m.team2.is_some())
            .position(|m| m.position == position);

        let compact = match compact {
            Some(compact) => compact,
            None => return,
        };

        if compact == 0 {
            let bye = self.bye_winner().cloned();

            if let Some(next) = self.rounds.get_mut(1).and_then(|r| r.matches.first_mut()) {
                next.team1 = bye;
                next.team2 = Some(winner.clone());
            }

            return;
        }

        self.fill_final_slot(winner);
    }

    /// Puts `winner` into the first open slot of the final.
    fn fill_final_slot(&mut self, winner: &TeamId) {
        let r#final = match self.rounds.last_mut().and_then(|r| r.matches.first_mut()) {
            Some(m) => m,
            None => return,
        };

        if r#final.team1.is_none() {
            r#final.team1 = Some(winner.clone());
        } else if r#final.team2.is_none() {
            r#final.team2 = Some(winner.clone());
        }
    }

    /// Regular advancement: the winner of `position` moves to
    /// `position / 2` in the next round, even positions into the first slot,
    /// odd positions into the second.
    fn advance_halved(&mut self, origin: usize, position: usize, winner: &TeamId) {
        let next = self
            .rounds
            .get_mut(origin + 1)
            .and_then(|r| r.matches.get_mut(position / 2));

        let next = match next {
            Some(next) => next,
            None => return,
        };

        if position % 2 == 0 {
            next.team1 = Some(winner.clone());
        } else {
            next.team2 = Some(winner.clone());
        }
    }

    /// Inserts the auto-advanced bye winner into the final once every match
    /// of the round preceding the final is decided.
    ///
    /// The bye team waits out exactly one main round this way instead of
    /// appearing as a phantom opponent earlier. Only an open slot is filled,
    /// the first one preferred; the final is never marked decided here.
    /// Nothing happens once the bye team occupies a slot in any main round:
    /// it already re-entered the bracket through the compact mapping, and a
    /// bye team that lost there must not resurface in the final.
    fn place_deferred_bye(&mut self) {
        if !self.is_odd() || self.rounds.len() < 2 {
            return;
        }

        let penultimate = &self.rounds[self.rounds.len() - 2];
        if !penultimate.matches.iter().all(Match::is_decided) {
            return;
        }

        let bye = match self.bye_winner() {
            Some(team) => team.clone(),
            None => return,
        };

        let seated = self.rounds[1..].iter().any(|round| {
            round
                .matches
                .iter()
                .any(|m| m.team1.as_ref() == Some(&bye) || m.team2.as_ref() == Some(&bye))
        });
        if seated {
            return;
        }

        let r#final = match self.rounds.last_mut().and_then(|r| r.matches.first_mut()) {
            Some(m) => m,
            None => return,
        };

        if r#final.team1.is_none() {
            log::debug!("Placing bye winner {} into the final", bye);
            r#final.team1 = Some(bye);
        } else if r#final.team2.is_none() {
            log::debug!("Placing bye winner {} into the final", bye);
            r#final.team2 = Some(bye);
        }
    }
}

/// Builds round 0 of an odd bracket: sequential pairings of the first
/// `n - 1` teams, then the auto-advanced bye holding the last team.
fn bye_determination_matches(teams: &[TeamId], table_count: usize) -> Vec<Match> {
    let pairs = teams.len() / 2;
    let mut matches = Vec::with_capacity(pairs + 1);

    for position in 0..pairs {
        let mut m = Match::pending(MatchId::Bye { position }, 0, position, table_count);
        m.team1 = Some(teams[position * 2].clone());
        m.team2 = Some(teams[position * 2 + 1].clone());
        matches.push(m);
    }

    // The last team has no opponent and advances on its own.
    let bye_team = teams[teams.len() - 1].clone();
    let mut bye = Match::pending(MatchId::Bye { position: pairs }, 0, pairs, table_count);
    bye.team1 = Some(bye_team.clone());
    bye.winner = Some(bye_team);
    matches.push(bye);

    matches
}
