use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "srtplay")]
#[command(about = "Step through a video sentence by sentence using its SRT subtitles.")]
pub struct Args {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a subtitle file and print its cues
    Parse(ParseCmd),
    /// Merge subtitle fragments into whole-sentence cues
    Merge(MergeCmd),
    /// Put every sentence of a text file in its own paragraph
    SplitSentences(SplitCmd),
    /// Interactive sentence-by-sentence player session
    Play(PlayCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct ParseCmd {
    /// Input file path, or '-' for stdin
    pub input: String,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Txt)]
    pub format: OutputFormat,

    /// Output file path (prints to stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Allow overwriting output file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct MergeCmd {
    /// Input SRT path, or '-' for stdin
    pub input: String,

    /// Output file path (defaults to <stem>.merged.srt)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Allow overwriting output file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct SplitCmd {
    /// Input text path, or '-' for stdin
    pub input: String,

    /// Output file path (defaults to <stem>.after.<ext>)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Allow overwriting output file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct PlayCmd {
    /// Media source to open (defaults to player.default_media)
    #[arg(long)]
    pub media: Option<String>,

    /// Subtitle file used when there is no saved session
    #[arg(long)]
    pub subtitles: Option<String>,

    /// Directory media and subtitle names resolve against
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    /// Directory holding the saved session
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Ignore any saved session and load the default subtitles
    #[arg(long)]
    pub fresh: bool,

    /// Keep the session in memory only
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One `[start --> end] text` line per cue
    Txt,
    /// One text line per cue
    Text,
    Srt,
    Json,
}
