//! The command line arguments of layerkit
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{commands::Extract, config::Config};

/// A command which can be run with the loaded configuration
pub trait RunCommand {
    /// # Errors
    ///
    /// If any part of the lifecycle fails
    /// * Fails to read or parse the input
    /// * Fails to process the document
    /// * Fails to write or serialize the output
    fn run(self, config: Config) -> anyhow::Result<()>;
}

#[derive(Parser, Debug)]
#[clap(
    bin_name = "layerkit",
    name = "layerkit",
    author,
    version,
    about = "Isolate a layer from an SVG and trim the canvas",
    long_about = None
)]
/// The arguments of the layerkit binary
pub struct Args {
    #[clap(subcommand)]
    /// The command to run
    pub command: Command,
    /// A path to the config to use instead of `layerkitrc.json` or the user's config
    #[clap(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
/// The commands of the layerkit binary
pub enum Command {
    /// Extract a single layer from an Inkscape document
    Extract(Extract),
}
