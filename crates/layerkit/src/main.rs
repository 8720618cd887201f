//! Layerkit extracts icons from the layers of Inkscape documents.

use clap::Parser;
use layerkit::{
    args::{Args, Command, RunCommand},
    config::Config,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match args.command {
        Command::Extract(args) => args.run(config)?,
    }
    Ok(())
}
