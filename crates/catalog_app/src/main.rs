mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_engine::ReqwestJsonClient;
use catalog_logging::{catalog_error, LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

const DEBUG_ENV: &str = "BLOX_VALUES_DEBUG";

fn main() -> Result<()> {
    let level = if std::env::var_os(DEBUG_ENV).is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    catalog_logging::initialize(LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)), level);

    let config = config::load_from_env()?;
    let client =
        ReqwestJsonClient::new(config.fetch.clone()).context("failed to build http client")?;

    // One request in flight at a time; a current-thread runtime is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let summary = runtime
        .block_on(catalog_engine::run(&client, &config))
        .inspect_err(|err| catalog_error!("run failed: {}", err))?;

    println!("wrote {}", summary.output_path.display());
    println!("{}", summary.counts);
    Ok(())
}
