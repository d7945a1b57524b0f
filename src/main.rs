use anyhow::Result;
use clap::Parser;
use kmparse::cli::{AppContext, Cli, Commands};
use kmparse::infra::{load_config, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config().unwrap_or_default();
    logging::init(logging::level_for(cli.verbose, cli.quiet, &config.log_level));

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Some(Commands::Init(args)) => kmparse::infra::config::init(args, &ctx),
        Some(Commands::Completions(args)) => kmparse::completion::run(args, &ctx),
        None => kmparse::convert_run(cli.parse, &ctx),
    }
}
