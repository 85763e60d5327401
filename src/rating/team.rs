use super::Parameters;
use crate::SWEEP_ITERATIONS;
use crate::graph::Arena;
use crate::graph::Likelihood;
use crate::graph::Prior;
use crate::graph::Sum;
use crate::graph::Truncate;
use crate::graph::VarId;
use crate::gaussian::Gaussian;
use crate::skill::SkillTable;
use crate::store::Store;
use anyhow::bail;
use anyhow::ensure;

/// a single team's ranked result: `members[i]` contributed
/// `contributions[i]` to the team performance sum. lower `rank` is better;
/// equal ranks denote a draw.
#[derive(Debug, Clone)]
pub struct TeamResult {
    pub members: Vec<String>,
    pub contributions: Vec<f64>,
    pub rank: i64,
}

impl TeamResult {
    pub fn new(members: Vec<String>, contributions: Vec<f64>, rank: i64) -> Self {
        Self {
            members,
            contributions,
            rank,
        }
    }

    /// the single-player convenience path: one member, full contribution.
    pub fn solo(member: impl Into<String>, rank: i64) -> Self {
        Self::new(vec![member.into()], vec![1.0], rank)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.members.is_empty(), "team result has no members");
        ensure!(
            self.members.len() == self.contributions.len(),
            "team result has {} members but {} contributions",
            self.members.len(),
            self.contributions.len()
        );
        for (member, &c) in self.members.iter().zip(&self.contributions) {
            ensure!(
                c.is_finite() && c != 0.0,
                "member {member} has a non-finite or zero contribution"
            );
        }
        Ok(())
    }
}

/// runs the team-aware rating update procedure: builds a factor graph from
/// `results`, runs the scheduled message-passing sweep, and writes the
/// resulting `(mu, sigma)` back into `table`.
pub fn update<S: Store>(
    table: &mut SkillTable<S>,
    mut results: Vec<TeamResult>,
    params: &Parameters,
) -> anyhow::Result<()> {
    if results.is_empty() {
        bail!("cannot rate a match with no teams");
    }
    for result in &results {
        result.validate()?;
    }

    // step 1: stable sort by rank ascending, winner first.
    results.sort_by_key(|r| r.rank);

    // step 2: flatten players in team order, recording team boundaries.
    let mut players = Vec::new();
    let mut contributions = Vec::new();
    let mut team_bounds = Vec::with_capacity(results.len());
    for team in &results {
        let start = players.len();
        players.extend(team.members.iter().cloned());
        contributions.extend(team.contributions.iter().copied());
        team_bounds.push((start, players.len()));
    }

    // step 3: allocate one skill/performance variable per player, one
    // team-performance variable per team, one difference variable per
    // adjacent pair of teams.
    let mut arena = Arena::new();
    let skill_vars = players.iter().map(|_| arena.create()).collect::<Vec<VarId>>();
    let perf_vars = players.iter().map(|_| arena.create()).collect::<Vec<VarId>>();
    let team_vars = results.iter().map(|_| arena.create()).collect::<Vec<VarId>>();
    let diff_vars = (0..results.len().saturating_sub(1))
        .map(|_| arena.create())
        .collect::<Vec<VarId>>();

    // step 4: wire factors.
    let priors = players
        .iter()
        .zip(&skill_vars)
        .map(|(name, &v)| {
            let record = table.get(name);
            let sigma = record.sigma + record.gamma;
            Prior::new(&mut arena, v, Gaussian::from_mu_sigma(record.mu, sigma))
        })
        .collect::<Vec<_>>();

    let likelihoods = skill_vars
        .iter()
        .zip(&perf_vars)
        .map(|(&s, &p)| Likelihood::new(&mut arena, s, p, params.beta * params.beta))
        .collect::<Vec<_>>();

    let perf_sums = team_bounds
        .iter()
        .zip(&team_vars)
        .map(|(&(start, end), &t)| {
            Sum::new(&mut arena, t, &perf_vars[start..end], contributions[start..end].to_vec())
        })
        .collect::<Vec<_>>();

    let diff_sums = (0..diff_vars.len())
        .map(|k| Sum::new(&mut arena, diff_vars[k], &[team_vars[k], team_vars[k + 1]], vec![1.0, -1.0]))
        .collect::<Vec<_>>();

    let truncations = (0..diff_vars.len())
        .map(|k| {
            let draw = results[k].rank == results[k + 1].rank;
            Truncate::new(&mut arena, diff_vars[k], params.epsilon, draw)
        })
        .collect::<Vec<_>>();

    // step 5: downward sweep.
    for prior in &priors {
        prior.start(&mut arena);
    }
    for likelihood in &likelihoods {
        likelihood.update_value(&mut arena);
    }
    for sum in &perf_sums {
        sum.update_sum(&mut arena);
    }

    // step 6: fixed-point loop over the team-difference layer.
    for _ in 0..SWEEP_ITERATIONS {
        for sum in &diff_sums {
            sum.update_sum(&mut arena);
        }
        for truncation in &truncations {
            truncation.update(&mut arena);
        }
        for sum in &diff_sums {
            sum.update_term(&mut arena, 0);
            sum.update_term(&mut arena, 1);
        }
    }

    // step 7: upward sweep.
    for (sum, &(start, end)) in perf_sums.iter().zip(&team_bounds) {
        for i in 0..(end - start) {
            sum.update_term(&mut arena, i);
        }
    }
    for likelihood in &likelihoods {
        likelihood.update_mean(&mut arena);
    }

    // step 8: write back.
    for (name, &s) in players.iter().zip(&skill_vars) {
        let (mu, sigma) = arena.value(s).mu_sigma();
        table.set_mu(name, mu);
        table.set_sigma(name, sigma);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::player_policy;
    use crate::store::MemoryStore;

    fn fresh_table() -> SkillTable<MemoryStore> {
        SkillTable::new(MemoryStore::new(), player_policy(), crate::INITIAL_SIGMA)
    }

    fn reference_params() -> Parameters {
        Parameters::builder()
            .beta(25.0 / 6.0)
            .draw_probability(0.10)
            .gamma(25.0 / 300.0)
            .build()
            .unwrap()
    }

    #[test]
    fn rejects_empty_match() {
        let mut table = fresh_table();
        let err = update(&mut table, vec![], &reference_params());
        assert!(err.is_err());
    }

    #[test]
    fn rejects_mismatched_contributions() {
        let mut table = fresh_table();
        let bad = TeamResult::new(vec!["a".into(), "b".into()], vec![1.0], 0);
        let err = update(&mut table, vec![bad, TeamResult::solo("c", 1)], &reference_params());
        assert!(err.is_err());
    }

    #[test]
    fn two_player_win_moves_winner_up_loser_down_symmetrically() {
        let mut table = fresh_table();
        let results = vec![TeamResult::solo("a", 0), TeamResult::solo("b", 1)];
        update(&mut table, results, &reference_params()).unwrap();
        let a = table.get("a");
        let b = table.get("b");
        assert!(a.mu > 25.0);
        assert!(b.mu < 25.0);
        assert!((a.mu - 25.0 - (25.0 - b.mu)).abs() < 1e-3);
        assert!((a.mu - 29.396).abs() < 1e-2);
        assert!((a.sigma - 7.171).abs() < 1e-2);
    }

    #[test]
    fn two_player_equal_skill_draw_keeps_means_shrinks_sigma() {
        let mut table = fresh_table();
        let results = vec![TeamResult::solo("a", 0), TeamResult::solo("b", 0)];
        update(&mut table, results, &reference_params()).unwrap();
        let a = table.get("a");
        let b = table.get("b");
        assert!((a.mu - 25.0).abs() < 1e-6);
        assert!((b.mu - 25.0).abs() < 1e-6);
        assert!(a.sigma < crate::INITIAL_SIGMA);
        assert_eq!(a.sigma, b.sigma);
    }

    #[test]
    fn three_player_ffa_orders_means_and_shrinks_middle_least() {
        let mut table = fresh_table();
        let results = vec![
            TeamResult::solo("first", 0),
            TeamResult::solo("second", 1),
            TeamResult::solo("third", 2),
        ];
        update(&mut table, results, &reference_params()).unwrap();
        let first = table.get("first");
        let second = table.get("second");
        let third = table.get("third");
        assert!(first.mu > second.mu);
        assert!(second.mu > third.mu);
        assert!((first.sigma - third.sigma).abs() < 1e-6);
        assert!(first.sigma < second.sigma);
    }

    #[test]
    fn team_match_shifts_all_members_equally() {
        let mut table = fresh_table();
        let winners = TeamResult::new(vec!["w1".into(), "w2".into()], vec![0.5, 0.5], 0);
        let losers = TeamResult::new(vec!["l1".into(), "l2".into()], vec![0.5, 0.5], 1);
        update(&mut table, vec![winners, losers], &reference_params()).unwrap();
        let w1 = table.get("w1").mu - 25.0;
        let w2 = table.get("w2").mu - 25.0;
        let l1 = 25.0 - table.get("l1").mu;
        let l2 = 25.0 - table.get("l2").mu;
        assert!(w1 > 0.0 && w2 > 0.0 && l1 > 0.0 && l2 > 0.0);
        assert!((w1 - w2).abs() < 1e-9);
        assert!((w1 - l1).abs() < 1e-9);
        assert!((w1 - l2).abs() < 1e-9);
    }

    #[test]
    fn repeated_identical_matches_monotonically_shrink_sigma() {
        let mut table = fresh_table();
        update(
            &mut table,
            vec![TeamResult::solo("a", 0), TeamResult::solo("b", 1)],
            &reference_params(),
        )
        .unwrap();
        let sigma_after_1 = table.get("a").sigma;
        update(
            &mut table,
            vec![TeamResult::solo("a", 0), TeamResult::solo("b", 1)],
            &reference_params(),
        )
        .unwrap();
        let sigma_after_2 = table.get("a").sigma;
        assert!(sigma_after_2 < sigma_after_1);
    }
}
