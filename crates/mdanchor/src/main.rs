mod cli;
mod commands;
mod config;
mod session;

use clap::Parser;

fn main() {
    let args = cli::Cli::parse();
    init_tracing(&args.log_level);

    match commands::execute(args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("mdanchor error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(level: &str) {
    let level: tracing::Level = level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
