use std::io::Write;

use clap::{Parser, Subcommand};

use crate::check::{CheckArgs, run_check};
use crate::error::Result;
use crate::logging;
use crate::normalize::{NormalizeArgs, run_normalize};
use crate::scaffold::{NewArgs, run_new};

#[derive(Debug, Parser)]
#[command(
    name = "tpl-doctor",
    about = "Check, normalize and scaffold invoice template interchange files",
    version
)]
pub struct Cli {
    /// Log at debug level to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import and validate a template file.
    Check(CheckArgs),

    /// Rewrite a template file with every default filled in.
    Normalize(NormalizeArgs),

    /// Write the default template to a new file.
    New(NewArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Check(args) => run_check(args, out),
        Commands::Normalize(args) => run_normalize(args, out),
        Commands::New(args) => run_new(args, out),
    }
}
