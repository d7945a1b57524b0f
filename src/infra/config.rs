use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};

/// Config file names, first existing one wins
const CONFIG_FILES: [&str; 4] = ["kmparse.toml", "kmparse.yaml", "kmparse.json", ".kmparse.toml"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Destination used when DEST is not given (defaults to the working directory)
    pub default_destination: Option<PathBuf>,

    /// Same as always passing --all
    pub all_files: bool,

    /// Same as always passing --force
    pub force: bool,

    /// Log level when neither -v nor RUST_LOG is given
    pub log_level: String,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            default_destination: None,
            all_files: false,
            force: false,
            log_level: "warn".to_string(),
        }
    }
}

pub fn load_config() -> Result<Config>
{
    load_config_from(Path::new("."))
}

/// Layer the first config file found in `dir` under `KMPARSE_*` variables.
pub fn load_config_from(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    if let Some(path) = CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
    {
        builder = builder.add_source(config::File::from(path));
    }

    builder = builder.add_source(config::Environment::with_prefix("KMPARSE").separator("__"));

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILES[0]);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("Would create {}:\n{toml_string}", config_path.display());
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() -> Result<()>
    {
        let tmp = TempDir::new()?;
        let config = load_config_from(tmp.path())?;
        assert!(!config.force);
        assert_eq!(config.default_destination, None);
        Ok(())
    }

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()>
    {
        let tmp = TempDir::new()?;
        std::fs::write(
            tmp.path()
                .join("kmparse.toml"),
            "all_files = true\nlog_level = \"debug\"\n",
        )?;

        let config = load_config_from(tmp.path())?;
        assert!(config.all_files);
        assert!(!config.force);
        assert_eq!(config.log_level, "debug");
        Ok(())
    }

    #[test]
    fn default_config_round_trips_through_toml() -> Result<()>
    {
        let text = toml::to_string_pretty(&Config::default())?;
        let parsed: Config = toml::from_str(&text)?;
        assert_eq!(parsed, Config::default());
        Ok(())
    }
}
