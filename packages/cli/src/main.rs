use clap::Parser;
use tracing_subscriber::EnvFilter;

use httpfuse_cli::Args;

fn main() {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = httpfuse_cli::run(args) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
