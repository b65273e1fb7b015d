use anyhow::Result;
use clap::Parser;

use srtplay::{app, cli, config, session};

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "srtplay starting");

    match args.command {
        cli::Command::Parse(cmd) => app::run_parse(cmd, &cfg),
        cli::Command::Merge(cmd) => app::run_merge(cmd, &cfg),
        cli::Command::SplitSentences(cmd) => app::run_split_sentences(cmd),
        cli::Command::Play(cmd) => session::run_play(cmd, &cfg),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
