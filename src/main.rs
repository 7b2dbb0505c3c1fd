mod analytics;
mod config;
mod db;
mod error;
mod export;
mod logging;
mod models;
mod notifier;
mod run;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    logging::init(&config)?;
    let mut db = db::Database::open(&config.db_path)?;

    run::sweep_month_rollover(&mut db);

    match args.len() {
        1 => run::as_tui(&mut db),
        2.. => run::as_cli(&args, &mut db),
        _ => {
            eprintln!("Usage: spendwatch [command]");
            Ok(())
        }
    }
}
