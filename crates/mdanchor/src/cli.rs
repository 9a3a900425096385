use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "mdanchor",
    version,
    about = "Insert HTML anchor tags into Markdown files for changed lines based on git diff"
)]
pub struct Cli {
    /// Base commit, tag, or branch to diff against (compares base..HEAD)
    #[arg(long, env = "MDANCHOR_BASE")]
    pub base: Option<String>,

    /// Target directory to limit the diff (e.g. docs)
    #[arg(long, env = "MDANCHOR_DIR")]
    pub dir: Option<String>,

    /// Path to write a Markdown list of links to changed anchors
    #[arg(long)]
    pub change_list_file: Option<String>,

    /// Use word-level (porcelain) diffing for sub-line change spans
    #[arg(long)]
    pub word_diff: bool,

    /// Print parsed changes as JSON instead of rewriting files
    #[arg(long)]
    pub json: bool,

    /// Report what would be annotated without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Restore files rewritten by a previous run
    #[arg(long)]
    pub restore: bool,

    /// Specify configuration file path
    #[arg(long, env = "MDANCHOR_CONFIG")]
    pub config: Option<String>,

    /// Log level
    #[arg(long, env = "MDANCHOR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
