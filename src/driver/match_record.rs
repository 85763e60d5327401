use serde::Deserialize;
use serde::Serialize;

/// a single turn's purchases. richer turn semantics (the cards themselves,
/// board state, ...) live in the hosting application and are not part of
/// this core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Turn {
    pub buys: Vec<String>,
}

/// one deck's participation in a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub points: i64,
    pub resigned: bool,
    pub turns: Vec<Turn>,
}

/// the match record contract the driver consumes. the hosting
/// application's richer match representation is an external collaborator;
/// this core only ever reads `decks`. `Serialize`/`Deserialize` back the
/// bundled [`JsonlScanner`](super::JsonlScanner), a convenience adapter, not
/// part of the core contract itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub decks: Vec<Deck>,
}
