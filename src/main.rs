use anyhow::Context;
use clap::Parser;

use lvl_chess::config::AppConfig;
use lvl_chess::console::console_loop::run_stdio_loop;
use lvl_chess::utils::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the variables directly.
    let _ = dotenvy::dotenv();

    let config = AppConfig::parse();
    init_tracing(&config.log_filter);

    run_stdio_loop(&config).context("console loop failed")
}
