//! Rating Binary
//!
//! Folds a newline-delimited JSON match log into player and opening skill
//! tables, incrementally and resumably, against postgres as the durable
//! store.
//!
//! Options: --matches <path>, --no-incremental, --max-games N,
//! --checkpoint N, --draw-probability P

use clap::Parser;
use skillgraph::database::PostgresStore;
use skillgraph::driver::JsonlScanner;
use skillgraph::driver::RatingDriver;
use skillgraph::rating::Parameters;
use skillgraph::skill::SkillTable;
use skillgraph::skill::opening_policy;
use skillgraph::skill::player_policy;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// newline-delimited JSON match log to fold
    #[arg(long, required = true)]
    matches: std::path::PathBuf,

    /// discard the scanner cursor and opening table, re-deriving openings
    /// from scratch while player ratings carry forward
    #[arg(long)]
    no_incremental: bool,

    /// stop after this many matches this run (default: unbounded)
    #[arg(long, default_value_t = usize::MAX)]
    max_games: usize,

    /// flush to postgres and persist the cursor every N matches
    #[arg(long, default_value_t = 500)]
    checkpoint: usize,

    /// probability mass reserved for draws when deriving the truncation margin
    #[arg(long, default_value_t = skillgraph::DEFAULT_DRAW_PROBABILITY)]
    draw_probability: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    skillgraph::init();
    let args = Args::parse();

    let client = skillgraph::db().await;
    let handle = tokio::runtime::Handle::current();

    let params = Parameters::builder()
        .draw_probability(args.draw_probability)
        .build()?;

    let players = SkillTable::new(
        PostgresStore::new(client.clone(), handle.clone()),
        player_policy(),
        skillgraph::INITIAL_SIGMA,
    );
    let openings = SkillTable::new(
        PostgresStore::new(client.clone(), handle.clone()),
        opening_policy(),
        skillgraph::INITIAL_SIGMA,
    );

    let scanner = JsonlScanner::open(&args.matches)?;
    let mut driver = RatingDriver::new(scanner, players, openings, params, args.max_games, args.checkpoint);

    if args.no_incremental {
        let fresh_openings = SkillTable::new(
            PostgresStore::new(client.clone(), handle.clone()),
            opening_policy(),
            skillgraph::INITIAL_SIGMA,
        );
        driver.reset_incremental(fresh_openings);
    }

    // `driver.run()` is synchronous and reaches `PostgresStore::load`/`flush`,
    // which block on the same runtime via `Handle::block_on`. Calling it
    // directly here would block the async worker thread `main` is already
    // running on, which tokio forbids. `spawn_blocking` moves the whole
    // synchronous run onto a dedicated blocking-pool thread, where
    // `Handle::block_on` is safe to call.
    let driver = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        driver.run()?;
        Ok(driver)
    })
    .await??;

    log::info!("top players:");
    for (key, record) in driver.players().ordered().into_iter().take(10) {
        log::info!("  {key}: mu={:.3} sigma={:.3}", record.mu, record.sigma);
    }

    Ok(())
}
