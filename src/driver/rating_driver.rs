use super::Scanner;
use super::dense_ranks;
use super::is_dubious;
use super::opening_id;
use crate::rating;
use crate::rating::Parameters;
use crate::rating::TeamResult;
use crate::skill::SkillTable;
use crate::store::Store;
use std::collections::HashSet;

/// folds a stream of historical matches into two parallel skill tables
/// (players; opening identifiers), with incremental checkpointing.
pub struct RatingDriver<Sc, Sp, So>
where
    Sc: Scanner,
    Sp: Store,
    So: Store,
{
    scanner: Sc,
    players: SkillTable<Sp>,
    openings: SkillTable<So>,
    params: Parameters,
    max_games: usize,
    checkpoint_every: usize,
    player_keys_seen: HashSet<String>,
}

impl<Sc, Sp, So> RatingDriver<Sc, Sp, So>
where
    Sc: Scanner,
    Sp: Store,
    So: Store,
{
    pub fn new(
        scanner: Sc,
        players: SkillTable<Sp>,
        openings: SkillTable<So>,
        params: Parameters,
        max_games: usize,
        checkpoint_every: usize,
    ) -> Self {
        Self {
            scanner,
            players,
            openings,
            params,
            max_games,
            checkpoint_every,
            player_keys_seen: HashSet::new(),
        }
    }

    /// `--no-incremental`: reset the scanner cursor and drop the opening
    /// table, so the next run re-derives openings from scratch while player
    /// ratings carry forward.
    pub fn reset_incremental(&mut self, openings: SkillTable<So>) {
        self.scanner.reset();
        self.openings = openings;
    }

    pub fn players(&self) -> &SkillTable<Sp> {
        &self.players
    }

    pub fn openings(&self) -> &SkillTable<So> {
        &self.openings
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut processed = 0usize;
        let mut since_checkpoint = 0usize;
        let bar = (self.max_games < usize::MAX).then(|| crate::progress(self.max_games));

        while processed < self.max_games {
            let Some(record) = self.scanner.next() else {
                break;
            };
            processed += 1;
            if let Some(bar) = &bar {
                bar.inc(1);
            }

            if record.decks.len() < 2 {
                log::debug!("skipping match with fewer than two decks");
                continue;
            }

            let openings = record.decks.iter().map(opening_id).collect::<Vec<_>>();
            let dubious = is_dubious(&record.decks, &openings);
            let ranks = dense_ranks(&record.decks);

            let player_teams = record
                .decks
                .iter()
                .zip(&ranks)
                .map(|(deck, &rank)| {
                    self.player_keys_seen.insert(deck.name.clone());
                    TeamResult::solo(deck.name.clone(), rank)
                })
                .collect::<Vec<_>>();
            rating::update(&mut self.players, player_teams, &self.params)?;

            if dubious {
                log::debug!("dubious match: contributing only to the player table");
            } else {
                let opening_teams = record
                    .decks
                    .iter()
                    .zip(&ranks)
                    .zip(&openings)
                    .map(|((deck, &rank), opening)| {
                        TeamResult::new(
                            vec![opening.clone(), deck.name.clone()],
                            vec![0.5, 0.5],
                            rank,
                        )
                    })
                    .collect::<Vec<_>>();
                rating::update(&mut self.openings, opening_teams, &self.params)?;
            }

            since_checkpoint += 1;
            if since_checkpoint >= self.checkpoint_every {
                self.checkpoint()?;
                since_checkpoint = 0;
            }
        }

        if since_checkpoint > 0 {
            self.checkpoint()?;
        }
        if let Some(bar) = bar {
            bar.finish();
        }
        log::info!("{}", self.scanner.status_msg());
        Ok(())
    }

    /// flush both tables, inflate uncertainty, and persist the scanner
    /// cursor only after the matching flush succeeds.
    fn checkpoint(&mut self) -> anyhow::Result<()> {
        self.players.flush()?;
        self.openings.flush()?;
        self.players.inflate_uncertainty(0.01, |_| true);
        let seen = &self.player_keys_seen;
        self.openings.inflate_uncertainty(0.01, |key| seen.contains(key));
        self.scanner.save()?;
        log::info!("checkpoint flushed");
        Ok(())
    }
}
