//! Command-line interface definition.

use clap::Parser;
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.dtsdown.toml):
  Create this file in the source root to set defaults.

  [dtsdown]
  # Default target compiler version when --target is not given
  target = \"3.4\"

  # Extra folder names to skip (node_modules etc. are always skipped)
  exclude_folders = [\"vendor\", \"fixtures\"]
";

/// Downlevel TypeScript declaration files for older compilers.
#[derive(Parser, Debug)]
#[command(name = "dtsdown", version, after_help = CONFIG_HELP)]
pub struct Cli {
    /// Source directory containing the declaration files.
    pub src: PathBuf,

    /// Output directory; the input layout is mirrored underneath it.
    pub target_dir: PathBuf,

    /// Target compiler version, e.g. "3.4" or "3.6.1".
    /// Defaults to the oldest supported baseline (3.4).
    #[arg(short = 't', long = "target", value_name = "VERSION")]
    pub target: Option<String>,

    /// Extra folder names to skip while collecting input files.
    #[arg(long, value_name = "FOLDER")]
    pub exclude: Vec<String>,

    /// Output raw JSON summary instead of human-readable text.
    #[arg(long)]
    pub json: bool,

    /// Print a per-rule rewrite-count table after the run.
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose output (shows files being processed).
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: show only the summary line.
    #[arg(long)]
    pub quiet: bool,
}
