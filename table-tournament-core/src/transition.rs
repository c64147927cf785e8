//! Advancement rules.
//!
//! Where the winner of a match goes depends only on the shape of the bracket
//! and the match it came from. [`advance_rule`] makes that mapping explicit
//! instead of burying it in inline conditionals, so the bye-deferral
//! behavior can be audited and tested in isolation.

/// The destination of the winner of a decided match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    /// The auto-advanced bye, resolved at construction. Nothing to
    /// propagate; the bye team re-enters the bracket when the first real
    /// round 0 winner is compacted into round 1, or through the deferred
    /// placement into the final as a fallback.
    Hold,
    /// A real match of the bye-determination round. Winners are compacted
    /// across the bye slot: the first one meets the bye team in round 1,
    /// every later one seeds the final directly.
    Compact,
    /// A round 1 match in an odd bracket. The winner fills the first open
    /// slot of the final, converging there with the deferred round 0
    /// winners.
    OpenFinalSlot,
    /// Regular advancement to `position / 2` in the next round.
    Halve,
    /// A match of the last round. Recording the winner ends the tournament.
    Terminal,
}

/// Returns the advancement rule for the winner of a match in round `origin`.
///
/// `last` is the number of the bracket's last round, `odd` whether the
/// bracket was built from an odd team count and `bye` whether the match is
/// the auto-advanced bye.
pub(crate) fn advance_rule(origin: usize, last: usize, odd: bool, bye: bool) -> Advance {
    if bye {
        return Advance::Hold;
    }

    if origin >= last {
        return Advance::Terminal;
    }

    match (origin, odd) {
        (0, true) => Advance::Compact,
        (1, true) => Advance::OpenFinalSlot,
        _ => Advance::Halve,
    }
}

#[cfg(test)]
mod tests {
    use super::{advance_rule, Advance};

    #[test]
    fn test_advance_rule_even() {
        // 4 teams: rounds 0 and 1.
        assert_eq!(advance_rule(0, 1, false, false), Advance::Halve);
        assert_eq!(advance_rule(1, 1, false, false), Advance::Terminal);

        // 8 teams: rounds 0, 1 and 2. Round 1 is a regular round.
        assert_eq!(advance_rule(0, 2, false, false), Advance::Halve);
        assert_eq!(advance_rule(1, 2, false, false), Advance::Halve);
        assert_eq!(advance_rule(2, 2, false, false), Advance::Terminal);
    }

    #[test]
    fn test_advance_rule_odd() {
        // 5 teams: bye round 0, round 1 and the final round 2.
        assert_eq!(advance_rule(0, 2, true, true), Advance::Hold);
        assert_eq!(advance_rule(0, 2, true, false), Advance::Compact);
        assert_eq!(advance_rule(1, 2, true, false), Advance::OpenFinalSlot);
        assert_eq!(advance_rule(2, 2, true, false), Advance::Terminal);
    }

    #[test]
    fn test_advance_rule_odd_minimal() {
        // 3 teams: round 1 is already the final.
        assert_eq!(advance_rule(0, 1, true, true), Advance::Hold);
        assert_eq!(advance_rule(0, 1, true, false), Advance::Compact);
        assert_eq!(advance_rule(1, 1, true, false), Advance::Terminal);
    }
}
