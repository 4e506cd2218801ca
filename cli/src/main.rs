use anyhow::Result;
use clap::Parser;
use sapper_core::GameSession;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

mod args;
mod render;
mod shell;

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    let args = args::Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}, config: {:?}", seed, config);

    let mut session = GameSession::new(config, seed)?;
    session.set_debug(args.debug);

    shell::run(session, Duration::from_secs(1))
}
