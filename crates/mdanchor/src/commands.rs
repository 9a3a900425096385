use anyhow::{Context, Result};

use mdanchor_diff::WordDiffMode;

use crate::cli::Cli;
use crate::config::Config;
use crate::session::{AnnotateOptions, AnnotateSession};

pub fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    let base = config
        .base
        .clone()
        .context("no base revision given; pass --base or set it in mdanchor.toml")?;
    let mode = if config.word_diff {
        WordDiffMode::Porcelain
    } else {
        WordDiffMode::None
    };

    let options = AnnotateOptions {
        base,
        dir: config.dir.clone(),
        change_list_file: config.change_list_file.clone(),
        mode,
    };
    let session = AnnotateSession::prepare(options)?;

    if cli.restore {
        let restored = session.restore()?;
        println!("Restored {restored} file(s)");
        return Ok(());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(session.changes())?);
        return Ok(());
    }

    let report = session.annotate_in_place(cli.dry_run)?;
    for file in &report.files {
        let verb = if cli.dry_run { "would annotate" } else { "annotated" };
        println!("{verb} {} ({} anchor(s))", file.path, file.anchors);
    }
    if report.files.is_empty() {
        println!("No Markdown changes found");
    }
    Ok(())
}
