//! passmenu - pick a pass entry from dmenu and copy or type it.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use passmenu::cli::{execute, output, Cli};
use passmenu::core::constants;
use passmenu::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse_with_menu_args();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("passmenu=debug")
        } else {
            EnvFilter::new("passmenu=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::StoreMissing(_)) => {
                Some("use --store <DIR> or set PASSWORD_STORE_DIR")
            }
            Error::Config(ConfigError::MissingBinary { tool: "pass", .. }) => {
                Some("install pass or point to it with --pass <PATH>")
            }
            Error::Config(ConfigError::MissingBinary { tool: "dmenu", .. }) => {
                Some("install dmenu or point to it with --dmenu <PATH>")
            }
            Error::Config(ConfigError::CaptureGroups { .. }) => {
                Some("wrap the username part of the pattern in ( )")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
