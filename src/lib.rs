pub mod gaussian;
pub mod graph;
pub mod rating;
pub mod skill;
pub mod store;

#[cfg(feature = "postgres")]
pub mod database;

#[cfg(feature = "native")]
pub mod driver;

/// dimensional analysis types
pub type Precision = f64;
pub type PrecisionMean = f64;
pub type Mu = f64;
pub type Sigma = f64;

/// default prior sigma: a third of the skill range considered "meaningfully different"
pub const INITIAL_MU: Mu = 25.0;
pub const INITIAL_SIGMA: Sigma = 25.0 / 3.0;

/// default performance noise and per-game drift, derived from INITIAL_SIGMA
pub const DEFAULT_BETA: Sigma = INITIAL_SIGMA * 3.0 / 2.0;
pub const DEFAULT_GAMMA: Sigma = INITIAL_SIGMA / 100.0;
pub const DEFAULT_DRAW_PROBABILITY: f64 = 0.10;

/// opening-identifier sentinel for decks that resigned before two turns
pub const RESIGN_SENTINEL: &str = "resign";

/// fixed-point sweep width over the team-difference layer
pub const SWEEP_ITERATIONS: usize = 5;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// progress bar, styled the way every long-running pass in this crate reports itself
#[cfg(feature = "native")]
pub fn progress(n: usize) -> indicatif::ProgressBar {
    let tick = std::time::Duration::from_secs(1);
    let style = "{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan} {pos}/{len}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_style(style);
    progress.enable_steady_tick(tick);
    progress
}

/// initialize logging and exit on ctrl-c
#[cfg(feature = "native")]
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// get a database connection, run migrations, and return the client
#[cfg(feature = "postgres")]
pub async fn db() -> std::sync::Arc<tokio_postgres::Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .batch_execute(&database::schema::creates())
        .await
        .expect("create skill/checkpoint tables");
    std::sync::Arc::new(client)
}
