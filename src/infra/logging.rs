use std::env;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Pick the crate log level: `-v` flags first, then `--quiet`, then config.
pub fn level_for(
    verbose: u8,
    quiet: bool,
    configured: &str,
) -> Level
{
    match verbose
    {
        0 if quiet => Level::ERROR,
        0 => configured
            .trim()
            .parse()
            .unwrap_or(Level::WARN),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the stderr subscriber once. `RUST_LOG` wins when set.
pub fn init(level: Level)
{
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = if env::var_os("RUST_LOG").is_some()
        {
            EnvFilter::from_default_env()
        }
        else
        {
            EnvFilter::new(format!("kmparse={level}"))
        };

        // A second subscriber (e.g. from a test harness) is not an error
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init();
    });
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn verbosity_overrides_config()
    {
        assert_eq!(level_for(0, false, "info"), Level::INFO);
        assert_eq!(level_for(1, false, "info"), Level::DEBUG);
        assert_eq!(level_for(3, true, "info"), Level::TRACE);
        assert_eq!(level_for(0, true, "debug"), Level::ERROR);
    }

    #[test]
    fn unknown_levels_fall_back_to_warn()
    {
        assert_eq!(level_for(0, false, "ERROR"), Level::ERROR);
        assert_eq!(level_for(0, false, " Debug "), Level::DEBUG);
        assert_eq!(level_for(0, false, "loud"), Level::WARN);
        assert_eq!(level_for(0, false, ""), Level::WARN);
    }
}
