mod app;
mod color;
mod config;
mod draw;
mod entities;
mod input;
mod raster;
mod sim;
mod surface;
mod term;
mod vector;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;

fn init_logging(args: &config::Args) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    // stderr shares the screen with the tank
    if let Some(path) = &args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init().context("init logger")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = config::Args::parse();
    init_logging(&args)?;
    let settings = config::load(&args)?;
    app::run(settings)
}
