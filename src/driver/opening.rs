use super::Deck;
use crate::RESIGN_SENTINEL;
use std::collections::HashSet;

/// a per-deck pseudo-player identifier: the sorted concatenation of the
/// first two turns' purchase lists, or [`RESIGN_SENTINEL`] if the deck
/// doesn't have two turns.
pub fn opening_id(deck: &Deck) -> String {
    if deck.turns.len() < 2 {
        return RESIGN_SENTINEL.to_string();
    }
    let mut buys = deck.turns[0]
        .buys
        .iter()
        .chain(deck.turns[1].buys.iter())
        .cloned()
        .collect::<Vec<_>>();
    buys.sort();
    buys.join(",")
}

/// a match is dubious if any opening identifier repeats
/// across its decks, or if any deck has fewer than two turns.
pub fn is_dubious(decks: &[Deck], openings: &[String]) -> bool {
    decks.iter().any(|d| d.turns.len() < 2) || has_duplicate(openings)
}

fn has_duplicate(openings: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(openings.len());
    !openings.iter().all(|o| seen.insert(o.clone()))
}

/// each deck's ordering key: `(-points, turn_count)`, with resignations
/// forced to -1000 points. lower is better.
fn ordering_key(deck: &Deck) -> (i64, usize) {
    let points = if deck.resigned { -1000 } else { deck.points };
    (-points, deck.turns.len())
}

/// dense ranks (ties share a rank, no gaps afterward) over `decks`' ordering
/// keys, lowest key first.
pub fn dense_ranks(decks: &[Deck]) -> Vec<i64> {
    let mut indices = (0..decks.len()).collect::<Vec<_>>();
    indices.sort_by_key(|&i| ordering_key(&decks[i]));

    let mut ranks = vec![0i64; decks.len()];
    let mut rank = 0i64;
    for window in indices.windows(2) {
        let (prev, next) = (window[0], window[1]);
        if ordering_key(&decks[next]) != ordering_key(&decks[prev]) {
            rank += 1;
        }
        ranks[next] = rank;
    }
    ranks
}
