//! Codec between a [`Bracket`] and its storage document.

use table_tournament_core::Bracket;

use crate::{Document, Result};

/// Encodes a bracket into its storage document: a plain nested structure of
/// rounds and matches that round-trips losslessly.
pub fn to_document(bracket: &Bracket) -> Result<Document> {
    Ok(serde_json::to_value(bracket)?)
}

/// Decodes a stored document back into a [`Bracket`].
///
/// A malformed document (missing rounds or matches, wrong shapes) is treated
/// as missing bracket data rather than an error: the document is discarded
/// with a warning and the caller falls back to prompting a bracket
/// regeneration.
pub fn from_document(document: &Document) -> Option<Bracket> {
    match serde_json::from_value(document.clone()) {
        Ok(bracket) => Some(bracket),
        Err(err) => {
            log::warn!("Discarding malformed bracket document: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use table_tournament_core::{Bracket, TeamId};

    use super::{from_document, to_document};

    fn lineup(n: usize) -> Vec<TeamId> {
        (1..=n).map(|i| TeamId(format!("team{}", i))).collect()
    }

    #[test]
    fn test_document_round_trip() {
        for n in [0, 2, 4, 5, 7, 8] {
            let mut bracket = Bracket::new(lineup(n), 2);

            let document = to_document(&bracket).unwrap();
            assert_eq!(from_document(&document), Some(bracket.clone()));

            // Round-trip again with results recorded.
            if n >= 2 {
                let first = bracket.rounds()[0].matches[0].id;
                bracket
                    .process_match_result(&first, TeamId::from("team1"))
                    .unwrap();

                let document = to_document(&bracket).unwrap();
                assert_eq!(from_document(&document), Some(bracket));
            }
        }
    }

    #[test]
    fn test_document_field_names() {
        let bracket = Bracket::new(lineup(3), 1);
        let document = to_document(&bracket).unwrap();

        let bye = &document["rounds"][0]["matches"][1];
        assert_eq!(bye["id"], json!("bye-match-1"));
        assert_eq!(bye["team1Id"], json!("team3"));
        assert_eq!(bye["winnerId"], json!("team3"));
        assert_eq!(bye["tableId"], json!(1));

        // Absent optionals are omitted entirely.
        assert!(bye.get("team2Id").is_none());
    }

    #[test]
    fn test_malformed_document() {
        assert_eq!(from_document(&json!(null)), None);
        assert_eq!(from_document(&json!({})), None);
        assert_eq!(from_document(&json!({ "rounds": 1 })), None);
        assert_eq!(from_document(&json!({ "rounds": [{ "round": 0 }] })), None);
        assert_eq!(
            from_document(&json!({
                "rounds": [{ "round": 0, "matches": [{ "id": "not-a-match-id" }] }]
            })),
            None
        );

        // An empty bracket is well-formed.
        assert_eq!(
            from_document(&json!({ "rounds": [] })),
            Some(Bracket::new(lineup(0), 1))
        );
    }
}
