use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "kmparse")]
#[command(
    about = "Parses Kotlin metadata annotations from smali files into human readable class information"
)]
#[command(version, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub parse: ParseArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress status lines and other non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Build and print the metadata tree without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a kmparse.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ParseArgs {
    /// Smali file, or directory to search for smali files
    #[arg(value_name = "SOURCE", required = true)]
    pub source: Option<PathBuf>,

    /// Destination directory; results go to DEST/KotlinClassMetadata
    #[arg(value_name = "DEST")]
    pub destination: Option<PathBuf>,

    /// Force parsing of all files even when input contains a smali directory
    #[arg(short, long)]
    pub all: bool,

    /// Delete the output directory before writing
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn positional_source_and_destination() {
        let cli = Cli::parse_from(["kmparse", "-a", "-f", "apk_out", "dest"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.parse.source, Some(PathBuf::from("apk_out")));
        assert_eq!(cli.parse.destination, Some(PathBuf::from("dest")));
        assert!(cli.parse.all);
        assert!(cli.parse.force);
    }

    #[test]
    fn source_is_required_without_subcommand() {
        assert!(Cli::try_parse_from(["kmparse"]).is_err());
    }

    #[test]
    fn subcommands_do_not_need_source() {
        let cli = Cli::parse_from(["kmparse", "init", "--force"]);
        assert!(matches!(cli.command, Some(Commands::Init(InitArgs { force: true, .. }))));

        let cli = Cli::parse_from(["kmparse", "completions", "zsh", "--stdout"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Completions(CompletionsArgs { shell: Shell::Zsh, stdout: true, .. }))
        ));
    }

    #[test]
    fn global_flags_and_verbosity() {
        let cli = Cli::parse_from(["kmparse", "--quiet", "--dry-run", "-vv", "src"]);
        assert!(cli.quiet);
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
    }
}
